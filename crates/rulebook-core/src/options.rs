//! Per-call validation options

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which fields stop at their first failing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldFirst {
    /// `true` applies to every field, `false` to none
    All(bool),
    /// Only the named fields
    Only(Vec<String>),
}

impl Default for FieldFirst {
    fn default() -> Self {
        FieldFirst::All(false)
    }
}

impl FieldFirst {
    /// Whether `field` is covered
    pub fn covers(&self, field: &str) -> bool {
        match self {
            FieldFirst::All(all) => *all,
            FieldFirst::Only(fields) => fields.iter().any(|f| f == field),
        }
    }
}

/// Options for a single `validate` call.
///
/// Deserializes from both snake_case and camelCase keys, so option blobs
/// written for other rule engines load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Stop every field at its first failing rule
    pub first: bool,
    /// Stop the selected fields at their first failing rule
    #[serde(alias = "fieldFirst", alias = "firstFields")]
    pub field_first: FieldFirst,
    /// Validate only these fields, in this order
    pub keys: Option<Vec<String>>,
    /// Partial message catalog merged for this call only
    pub messages: Option<Value>,
}

impl ValidateOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop every field at its first failing rule
    #[must_use]
    pub fn first(mut self, first: bool) -> Self {
        self.first = first;
        self
    }

    /// Select which fields stop at their first failing rule
    #[must_use]
    pub fn field_first(mut self, field_first: FieldFirst) -> Self {
        self.field_first = field_first;
        self
    }

    /// Restrict validation to `keys`
    #[must_use]
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Override messages for this call
    #[must_use]
    pub fn messages(mut self, messages: Value) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Whether `field` stops scheduling further rules once one fails
    pub fn stops_on_first_error(&self, field: &str) -> bool {
        self.first || self.field_first.covers(field)
    }

    /// Options a nested schema inherits from this call.
    ///
    /// Short-circuit flags carry over. Key selection names parent fields and
    /// message overrides are already folded into the inherited catalog, so
    /// neither is passed down.
    #[must_use]
    pub fn for_nested(&self) -> Self {
        Self {
            first: self.first,
            field_first: self.field_first.clone(),
            keys: None,
            messages: None,
        }
    }
}
