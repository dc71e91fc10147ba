//! Error records surfaced to callers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Rule;

/// A single violation, attributed to the field that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Human-readable message
    pub message: String,
    /// Dot-joined path of the offending field
    pub field: String,
}

impl ErrorRecord {
    /// Create a record for an explicit field path
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }

    /// Create a record attributed to `rule`'s full path
    pub fn for_rule(rule: &Rule, message: impl Into<String>) -> Self {
        Self::new(rule.full_field(), message)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw entry reported by a validator, before it is attributed to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Bare message; the field is filled in from the rule
    Message(String),
    /// Fully or partly formed record
    Record(ErrorRecord),
}

impl Issue {
    /// Turn this entry into a record, filling in the rule's path when the
    /// entry carries none.
    pub fn complement(self, rule: &Rule) -> ErrorRecord {
        match self {
            Issue::Message(message) => ErrorRecord::for_rule(rule, message),
            Issue::Record(mut record) => {
                if record.field.is_empty() {
                    record.field = rule.full_field().to_string();
                }
                record
            }
        }
    }
}

impl From<String> for Issue {
    fn from(message: String) -> Self {
        Issue::Message(message)
    }
}

impl From<&str> for Issue {
    fn from(message: &str) -> Self {
        Issue::Message(message.to_string())
    }
}

impl From<ErrorRecord> for Issue {
    fn from(record: ErrorRecord) -> Self {
        Issue::Record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_at(field: &str, full: Option<&str>) -> Rule {
        let mut rule = Rule::string();
        rule.field = field.to_string();
        rule.full_field = full.map(str::to_string);
        rule
    }

    #[test]
    fn test_message_takes_full_path() {
        let rule = rule_at("city", Some("address.city"));
        let record = Issue::from("city is required").complement(&rule);
        assert_eq!(record.field, "address.city");
        assert_eq!(record.message, "city is required");
    }

    #[test]
    fn test_record_keeps_its_field() {
        let rule = rule_at("name", None);
        let record = Issue::from(ErrorRecord::new("other", "bad")).complement(&rule);
        assert_eq!(record.field, "other");

        let record = Issue::from(ErrorRecord::new("", "bad")).complement(&rule);
        assert_eq!(record.field, "name");
    }

    #[test]
    fn test_display() {
        let record = ErrorRecord::new("age", "age is required");
        assert_eq!(record.to_string(), "age: age is required");
    }
}
