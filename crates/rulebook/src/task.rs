//! Task construction for one validation call

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use rulebook_core::value::{lookup, write_field};
use rulebook_core::{Descriptor, Result, Rule, SchemaError, ValidateOptions, Validator};

use crate::registry::Registry;

/// One scheduled (field, rule) unit
pub(crate) struct Task {
    /// Rule with type, field and path resolved
    pub rule: Rule,
    /// Validator the rule resolved to
    pub validator: Arc<dyn Validator>,
    /// Value under test, after transforms
    pub value: Value,
}

/// Tasks grouped by field, in the order fields were selected
pub(crate) type Series = IndexMap<String, Vec<Task>>;

/// Build the task series for `source`.
///
/// The caller's `source` is only borrowed. The first transform takes a
/// private copy, and every later transform in the same call writes to that
/// copy. The returned source is the one validators see.
///
/// Every rule type is checked first, nested ones included, so a
/// configuration error is returned before any validator runs.
pub(crate) fn build_series<'s>(
    rules: &Descriptor,
    source: &'s Value,
    options: &ValidateOptions,
    registry: &Registry,
) -> Result<(Series, Cow<'s, Value>)> {
    check_types(rules, registry)?;

    let mut source = Cow::Borrowed(source);
    let mut series = Series::new();

    let keys: Vec<&str> = match &options.keys {
        Some(keys) => keys.iter().map(String::as_str).collect(),
        None => rules.keys().collect(),
    };

    for key in keys {
        let Some(declared) = rules.get(key) else {
            debug!(field = key, "no rules declared for selected key");
            continue;
        };
        let mut value = lookup(&source, key).cloned().unwrap_or(Value::Null);

        for declared in declared {
            if let Some(transform) = &declared.transform {
                value = transform(&value);
                if matches!(source, Cow::Borrowed(_)) {
                    trace!(field = key, "copying source before first transform");
                }
                write_field(source.to_mut(), key, value.clone());
            }

            let mut rule = declared.clone();
            rule.field = key.to_string();
            if rule.full_field.is_none() {
                rule.full_field = Some(key.to_string());
            }
            rule.rule_type = Some(resolve_type(&rule, registry)?);

            let Some(validator) = resolve_validator(&rule, registry) else {
                debug!(field = key, rule_type = rule.type_name(), "rule has no validator, skipping");
                continue;
            };

            series.entry(key.to_string()).or_default().push(Task {
                rule,
                validator,
                value: value.clone(),
            });
        }
    }

    Ok((series, source))
}

/// Resolve a rule's type name.
///
/// An explicit type wins; a rule with a pattern and no type is a `pattern`
/// rule; anything else is a `string` rule.
///
/// # Errors
///
/// [`SchemaError::UnknownType`] when the rule has no custom validator and
/// names a type the registry does not know.
pub(crate) fn resolve_type(rule: &Rule, registry: &Registry) -> Result<String> {
    let rule_type = match &rule.rule_type {
        Some(rule_type) => Some(rule_type.clone()),
        None if rule.pattern.is_some() => Some("pattern".to_string()),
        None => None,
    };

    if let Some(rule_type) = &rule_type {
        if rule.validator.is_none() && !registry.contains(rule_type) {
            return Err(SchemaError::UnknownType(rule_type.clone()));
        }
    }

    Ok(rule_type.unwrap_or_else(|| rule.type_name().to_string()))
}

/// Resolve the type of every rule in `rules`, descending into nested
/// `fields` and default child rules.
///
/// # Errors
///
/// The first [`SchemaError::UnknownType`] found.
pub(crate) fn check_types(rules: &Descriptor, registry: &Registry) -> Result<()> {
    for (_, declared) in rules.iter() {
        for rule in declared {
            check_rule(rule, registry)?;
        }
    }
    Ok(())
}

fn check_rule(rule: &Rule, registry: &Registry) -> Result<()> {
    resolve_type(rule, registry)?;
    if let Some(fields) = &rule.fields {
        check_types(fields, registry)?;
    }
    if let Some(default) = &rule.default_field {
        check_rule(default, registry)?;
    }
    Ok(())
}

/// The rule's own validator, or the registry default for its type
pub(crate) fn resolve_validator(rule: &Rule, registry: &Registry) -> Option<Arc<dyn Validator>> {
    rule.validator
        .clone()
        .or_else(|| registry.lookup(rule.type_name()))
}
