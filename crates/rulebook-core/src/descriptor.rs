//! Rule descriptors: field name to ordered rules
//!
//! A descriptor is the normalized form of a caller's declaration. Each field
//! maps to a non-empty sequence of rules whose order is the evaluation order
//! for that field; fields keep their declaration order.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{Result, Rule, SchemaError};

/// A single rule or a sequence of rules declared for one field
#[derive(Debug, Clone)]
pub enum RuleEntry {
    /// One rule, lifted to a one-element sequence
    One(Rule),
    /// Rules checked in order
    Many(Vec<Rule>),
}

impl RuleEntry {
    /// Normalize to a sequence
    pub fn into_rules(self) -> Vec<Rule> {
        match self {
            RuleEntry::One(rule) => vec![rule],
            RuleEntry::Many(rules) => rules,
        }
    }
}

impl From<Rule> for RuleEntry {
    fn from(rule: Rule) -> Self {
        RuleEntry::One(rule)
    }
}

impl From<Vec<Rule>> for RuleEntry {
    fn from(rules: Vec<Rule>) -> Self {
        RuleEntry::Many(rules)
    }
}

impl<const N: usize> From<[Rule; N]> for RuleEntry {
    fn from(rules: [Rule; N]) -> Self {
        RuleEntry::Many(rules.into())
    }
}

/// Normalized rules per field, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    rules: IndexMap<String, Vec<Rule>>,
}

impl Descriptor {
    /// Empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare rules for `field`, replacing any earlier declaration
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, entry: impl Into<RuleEntry>) -> Self {
        self.insert(field, entry);
        self
    }

    /// Declare rules for `field`, replacing any earlier declaration.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, entry: impl Into<RuleEntry>) {
        self.rules.insert(field.into(), entry.into().into_rules());
    }

    /// Normalize a JSON descriptor.
    ///
    /// The descriptor must be an object. Each value is a rule object or an
    /// array of rule objects.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Configuration`] when the descriptor is null,
    /// an array or any other non-object, and propagates errors from
    /// [`Rule::from_json`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => {
                return Err(SchemaError::configuration(
                    "Cannot configure a schema with no rules",
                ))
            }
            Value::Object(map) => map,
            _ => return Err(SchemaError::configuration("Rules must be an object")),
        };

        let mut descriptor = Descriptor::new();
        for (field, entry) in map {
            let rules = match entry {
                Value::Array(items) => items
                    .iter()
                    .map(|item| Rule::from_json(field, item))
                    .collect::<Result<Vec<_>>>()?,
                other => vec![Rule::from_json(field, other)?],
            };
            descriptor.rules.insert(field.clone(), rules);
        }
        Ok(descriptor)
    }

    /// Rules declared for `field`
    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.rules.get(field).map(Vec::as_slice)
    }

    /// Whether `field` has any declaration
    pub fn contains(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    /// Field names in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Fields and their rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no field is declared
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Copy of this descriptor whose rules sit under `prefix`.
    ///
    /// Every rule's `full_field` becomes `prefix.key`.
    #[must_use]
    pub fn nested_under(&self, prefix: &str) -> Self {
        let rules = self
            .rules
            .iter()
            .map(|(key, rules)| {
                let full_field = format!("{prefix}.{key}");
                let rules = rules
                    .iter()
                    .map(|rule| {
                        let mut rule = rule.clone();
                        rule.full_field = Some(full_field.clone());
                        rule
                    })
                    .collect();
                (key.clone(), rules)
            })
            .collect();
        Self { rules }
    }
}

impl<K: Into<String>, E: Into<RuleEntry>> FromIterator<(K, E)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut descriptor = Descriptor::new();
        for (field, entry) in iter {
            descriptor.insert(field, entry);
        }
        descriptor
    }
}
