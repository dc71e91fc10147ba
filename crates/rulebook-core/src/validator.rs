//! Validator trait and the context handed to each validator call

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::{ErrorRecord, Issue, Messages, Rule, ValidateOptions};

/// Everything a validator sees for one (field, rule) task.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Resolved rule, with `field` and `full_field` stamped
    pub rule: &'a Rule,
    /// Value under test, after any transforms
    pub value: &'a Value,
    /// Object the value was read from
    pub source: &'a Value,
    /// Options of the current call
    pub options: &'a ValidateOptions,
    /// Effective message catalog
    pub messages: &'a Messages,
}

impl<'a> Context<'a> {
    /// Same context with a different value under test
    #[must_use]
    pub fn with_value(self, value: &'a Value) -> Self {
        Self { value, ..self }
    }

    /// Name of the rule's resolved type
    pub fn rule_type(&self) -> &'a str {
        self.rule.type_name()
    }

    /// Format the catalog template at `path` as an issue for this rule
    pub fn issue(&self, path: &str, args: &[&dyn fmt::Display]) -> Issue {
        Issue::Record(ErrorRecord::for_rule(self.rule, self.messages.render(path, args)))
    }
}

/// Asynchronous validator for one rule type.
///
/// Failures are reported only through the returned issue list; an empty list
/// means the value passed. A validator that panics is not shielded and the
/// panic reaches the caller of `validate`.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Check `ctx.value` against `ctx.rule`
    async fn validate(&self, ctx: &Context<'_>) -> Vec<Issue>;
}

/// Validator backed by a synchronous closure
pub struct FnValidator<F>(F);

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&Context<'_>) -> Vec<Issue> + Send + Sync,
{
    async fn validate(&self, ctx: &Context<'_>) -> Vec<Issue> {
        (self.0)(ctx)
    }
}

/// Wrap a closure as a [`Validator`]
pub fn from_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&Context<'_>) -> Vec<Issue> + Send + Sync,
{
    FnValidator(f)
}
