//! Per-task resolution: run one validator, normalize what it reports and
//! descend into nested schemas.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use rulebook_core::value::is_truthy;
use rulebook_core::{Context, Descriptor, ErrorRecord, Messages, Result, Rule, ValidateOptions};

use crate::registry::Registry;
use crate::schema::Schema;
use crate::task::Task;

/// Shared state for resolving the tasks of one validation call
pub(crate) struct Resolver<'a> {
    pub source: &'a Value,
    pub options: &'a ValidateOptions,
    pub messages: &'a Messages,
    pub registry: &'a Arc<Registry>,
}

impl Resolver<'_> {
    /// Errors produced by `task`, nested errors included.
    ///
    /// # Errors
    ///
    /// Configuration errors raised while validating a nested schema.
    pub async fn resolve(&self, task: &Task) -> Result<Vec<ErrorRecord>> {
        let rule = &task.rule;
        let ctx = Context {
            rule,
            value: &task.value,
            source: self.source,
            options: self.options,
            messages: self.messages,
        };
        let issues = task.validator.validate(&ctx).await;

        let mut errors: Vec<ErrorRecord> = match &rule.message {
            Some(message) if !issues.is_empty() => vec![ErrorRecord::for_rule(rule, message.clone())],
            _ => issues.into_iter().map(|issue| issue.complement(rule)).collect(),
        };

        if !errors.is_empty() && self.options.stops_on_first_error(&rule.field) {
            return Ok(errors);
        }

        let present = is_truthy(&task.value);
        if !(rule.is_container() && rule.has_sub_schema() && (rule.required || present)) {
            return Ok(errors);
        }

        if !present {
            let message = rule
                .message
                .clone()
                .unwrap_or_else(|| self.messages.render("required", &[&rule.field]));
            return Ok(vec![ErrorRecord::for_rule(rule, message)]);
        }

        let rules = nested_rules(rule, &task.value);
        debug!(field = rule.full_field(), fields = rules.len(), "descending into nested schema");

        let schema = Schema::nested(rules, self.messages.clone(), Arc::clone(self.registry));
        let options = rule
            .options
            .clone()
            .unwrap_or_else(|| self.options.for_nested());
        let report = schema.validate(&task.value, options).await?;
        if let (Some(nested), _) = report.into_parts() {
            errors.extend(nested);
        }
        Ok(errors)
    }
}

/// Rules for the children of `value`.
///
/// The rule's default child rule covers every array index or object key of
/// the value; explicit child rules replace it for the keys they name. Every
/// child path sits under the parent's full path.
fn nested_rules(rule: &Rule, value: &Value) -> Descriptor {
    let mut rules = Descriptor::new();

    if let Some(default) = &rule.default_field {
        match value {
            Value::Array(items) => {
                for index in 0..items.len() {
                    rules.insert(index.to_string(), (**default).clone());
                }
            }
            Value::Object(map) => {
                for key in map.keys() {
                    rules.insert(key.clone(), (**default).clone());
                }
            }
            _ => {}
        }
    }

    if let Some(fields) = &rule.fields {
        for (key, declared) in fields.iter() {
            rules.insert(key, declared.to_vec());
        }
    }

    rules.nested_under(rule.full_field())
}
