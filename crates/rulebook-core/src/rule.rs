//! Rule declarations

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::validator::{from_fn, Context};
use crate::{Descriptor, Issue, Result, SchemaError, ValidateOptions, Validator};

/// Value transform applied before a rule is checked
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Type assumed when a rule names none and has no pattern
pub const DEFAULT_TYPE: &str = "string";

/// One validation directive for a field.
///
/// `field` and `full_field` are stamped by the engine when the rule is
/// scheduled; declarations normally leave them empty.
#[derive(Clone, Default)]
pub struct Rule {
    /// Declared or resolved type name
    pub rule_type: Option<String>,
    /// Whether the field must be present and non-empty
    pub required: bool,
    /// Message that replaces whatever the validator reported
    pub message: Option<String>,
    /// Pattern the value must match
    pub pattern: Option<Regex>,
    /// Exact length (strings, arrays) or value (numbers)
    pub len: Option<f64>,
    /// Lower bound
    pub min: Option<f64>,
    /// Upper bound
    pub max: Option<f64>,
    /// Allowed values
    pub one_of: Option<Vec<Value>>,
    /// Reject strings made only of whitespace
    pub whitespace: bool,
    /// Custom validator, used instead of the registered one
    pub validator: Option<Arc<dyn Validator>>,
    /// Transform applied to the value before checking
    pub transform: Option<Transform>,
    /// Sub-schema for object and array values
    pub fields: Option<Descriptor>,
    /// Rule applied to every element of an object or array value
    pub default_field: Option<Box<Rule>>,
    /// Options for the nested validation of this rule's value
    pub options: Option<ValidateOptions>,
    /// Key the rule is declared under
    pub field: String,
    /// Dot-joined path from the validation root
    pub full_field: Option<String>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("rule_type", &self.rule_type)
            .field("required", &self.required)
            .field("message", &self.message)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("len", &self.len)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("one_of", &self.one_of)
            .field("whitespace", &self.whitespace)
            .field("validator", &self.validator.is_some())
            .field("transform", &self.transform.is_some())
            .field("fields", &self.fields)
            .field("default_field", &self.default_field)
            .field("options", &self.options)
            .field("field", &self.field)
            .field("full_field", &self.full_field)
            .finish()
    }
}

impl Rule {
    /// Empty rule; resolves to the default type
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule of the given type
    pub fn of_type(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: Some(rule_type.into()),
            ..Self::default()
        }
    }

    /// String rule
    pub fn string() -> Self {
        Self::of_type("string")
    }

    /// Number rule
    pub fn number() -> Self {
        Self::of_type("number")
    }

    /// Integer rule
    pub fn integer() -> Self {
        Self::of_type("integer")
    }

    /// Boolean rule
    pub fn boolean() -> Self {
        Self::of_type("boolean")
    }

    /// Object rule
    pub fn object() -> Self {
        Self::of_type("object")
    }

    /// Array rule
    pub fn array() -> Self {
        Self::of_type("array")
    }

    /// Rule whose only behaviour is a custom validator
    pub fn custom(validator: impl Validator + 'static) -> Self {
        Self {
            validator: Some(Arc::new(validator)),
            ..Self::default()
        }
    }

    /// Rule whose only behaviour is a synchronous closure
    pub fn custom_fn<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>) -> Vec<Issue> + Send + Sync + 'static,
    {
        Self::custom(from_fn(f))
    }

    /// Mark the field as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Replace reported errors with `message`
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Require the value to match `pattern`
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Exact length or value
    #[must_use]
    pub fn len(mut self, len: f64) -> Self {
        self.len = Some(len);
        self
    }

    /// Lower bound
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Upper bound
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Allowed values
    #[must_use]
    pub fn one_of<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Reject whitespace-only strings
    #[must_use]
    pub fn whitespace(mut self) -> Self {
        self.whitespace = true;
        self
    }

    /// Use a custom validator
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Use a synchronous closure as the validator
    #[must_use]
    pub fn validator_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Context<'_>) -> Vec<Issue> + Send + Sync + 'static,
    {
        self.validator(from_fn(f))
    }

    /// Transform the value before it is checked
    #[must_use]
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Validate the value against a nested descriptor
    #[must_use]
    pub fn fields(mut self, fields: Descriptor) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Apply `rule` to every element of the value
    #[must_use]
    pub fn default_field(mut self, rule: Rule) -> Self {
        self.default_field = Some(Box::new(rule));
        self
    }

    /// Options for nested validation
    #[must_use]
    pub fn options(mut self, options: ValidateOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Dot-joined path, falling back to the bare field name
    pub fn full_field(&self) -> &str {
        self.full_field.as_deref().unwrap_or(&self.field)
    }

    /// Type name, falling back to the default type
    pub fn type_name(&self) -> &str {
        self.rule_type.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    /// Whether values of this rule may hold a nested schema
    pub fn is_container(&self) -> bool {
        matches!(self.type_name(), "object" | "array")
    }

    /// Whether the rule declares a nested schema
    pub fn has_sub_schema(&self) -> bool {
        self.fields.is_some() || self.default_field.is_some()
    }

    /// Parse a rule object.
    ///
    /// Recognised keys: `type`, `required`, `message`, `pattern`, `len`,
    /// `min`, `max`, `enum`, `whitespace`, `fields`, `defaultField`
    /// (or `default_field`) and `options`. Other keys are ignored.
    ///
    /// A `pattern` given as text with no `type` makes a `string` rule, so
    /// non-string values still fail the type check.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Configuration`] when `value` is not an object or
    /// a recognised key holds the wrong kind of value, and
    /// [`SchemaError::InvalidPattern`] when `pattern` does not compile.
    pub fn from_json(field: &str, value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            SchemaError::configuration(format!("rule for field `{field}` must be an object"))
        })?;

        let mut rule = Rule::new();

        for (key, entry) in map {
            match key.as_str() {
                "type" => rule.rule_type = Some(expect_str(field, key, entry)?.to_string()),
                "required" => rule.required = expect_bool(field, key, entry)?,
                "message" => rule.message = Some(expect_str(field, key, entry)?.to_string()),
                "pattern" => {
                    let source = expect_str(field, key, entry)?;
                    let pattern = Regex::new(source).map_err(|source| SchemaError::InvalidPattern {
                        field: field.to_string(),
                        source,
                    })?;
                    rule.pattern = Some(pattern);
                }
                "len" => rule.len = Some(expect_number(field, key, entry)?),
                "min" => rule.min = Some(expect_number(field, key, entry)?),
                "max" => rule.max = Some(expect_number(field, key, entry)?),
                "enum" => {
                    let values = entry.as_array().ok_or_else(|| invalid(field, key, "an array"))?;
                    rule.one_of = Some(values.clone());
                }
                "whitespace" => rule.whitespace = expect_bool(field, key, entry)?,
                "fields" => rule.fields = Some(Descriptor::from_json(entry)?),
                "defaultField" | "default_field" => {
                    rule.default_field = Some(Box::new(Rule::from_json(field, entry)?));
                }
                "options" => rule.options = Some(serde_json::from_value(entry.clone())?),
                _ => {}
            }
        }

        // Pattern text is a constraint on strings, not a type of its own.
        if rule.pattern.is_some() && rule.rule_type.is_none() {
            rule.rule_type = Some(DEFAULT_TYPE.to_string());
        }

        Ok(rule)
    }
}

fn invalid(field: &str, key: &str, expected: &str) -> SchemaError {
    SchemaError::configuration(format!("`{key}` of rule for field `{field}` must be {expected}"))
}

fn expect_str<'v>(field: &str, key: &str, value: &'v Value) -> Result<&'v str> {
    value.as_str().ok_or_else(|| invalid(field, key, "a string"))
}

fn expect_bool(field: &str, key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| invalid(field, key, "a boolean"))
}

fn expect_number(field: &str, key: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| invalid(field, key, "a number"))
}
