//! Rule checks shared by the built-in validators
//!
//! Each check inspects one aspect of a rule (presence, type, bounds, allowed
//! values, pattern, whitespace) and appends any violation to `errors`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use rulebook_core::value::{self, has_field, is_empty_value};
use rulebook_core::{Context, Issue};

/// Common validation patterns
pub mod patterns {
    /// Email address
    pub const EMAIL: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

    /// Absolute http(s) or ftp URL
    pub const URL: &str = r"^(?:https?|ftp)://[^\s/$.?#].[^\s]*$";

    /// Hex colour, with or without leading `#`
    pub const HEX: &str = r"^(?i)#?([a-f0-9]{6}|[a-f0-9]{3})$";
}

/// Longest email address accepted
const MAX_EMAIL_LEN: usize = 320;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(patterns::EMAIL).expect("email pattern compiles");
    static ref URL: Regex = Regex::new(patterns::URL).expect("url pattern compiles");
    static ref HEX: Regex = Regex::new(patterns::HEX).expect("hex pattern compiles");
}

/// Whether the field should be checked at all: it is required or present
pub(crate) fn should_check(ctx: &Context<'_>) -> bool {
    ctx.rule.required || has_field(ctx.source, &ctx.rule.field)
}

/// Required: the field must be present and non-empty for `kind`
pub(crate) fn required(ctx: &Context<'_>, errors: &mut Vec<Issue>, kind: &str) {
    let rule = ctx.rule;
    if rule.required && (!has_field(ctx.source, &rule.field) || is_empty_value(ctx.value, kind)) {
        errors.push(ctx.issue("required", &[&rule.full_field()]));
    }
}

/// Whitespace: strings must hold something other than whitespace
pub(crate) fn whitespace(ctx: &Context<'_>, errors: &mut Vec<Issue>) {
    if let Value::String(s) = ctx.value {
        if s.trim().is_empty() {
            errors.push(ctx.issue("whitespace", &[&ctx.rule.full_field()]));
        }
    }
}

/// Type: the value must be of the rule's type
pub(crate) fn type_check(ctx: &Context<'_>, errors: &mut Vec<Issue>) {
    let rule_type = ctx.rule_type();
    if ctx.rule.required && ctx.value.is_null() {
        required(ctx, errors, rule_type);
        return;
    }

    let matches = match rule_type {
        "integer" => is_integer(ctx.value),
        "float" => ctx.value.is_number() && !is_integer(ctx.value),
        "number" => ctx.value.is_number(),
        "array" => ctx.value.is_array(),
        "object" => ctx.value.is_object(),
        "regexp" => ctx.value.as_str().is_some_and(|s| Regex::new(s).is_ok()),
        "date" => parse_date(ctx.value).is_some(),
        "email" => ctx
            .value
            .as_str()
            .is_some_and(|s| s.len() <= MAX_EMAIL_LEN && EMAIL.is_match(s)),
        "url" => ctx.value.as_str().is_some_and(|s| URL.is_match(s)),
        "hex" => ctx.value.as_str().is_some_and(|s| HEX.is_match(s)),
        "string" => ctx.value.is_string(),
        "boolean" => ctx.value.is_boolean(),
        // Functions never appear in data values.
        "method" => false,
        _ => true,
    };

    if !matches {
        let path = format!("types.{rule_type}");
        errors.push(ctx.issue(&path, &[&ctx.rule.full_field(), &rule_type]));
    }
}

/// Range: `len`, `min` and `max` on numbers, string lengths and array lengths
pub(crate) fn range(ctx: &Context<'_>, errors: &mut Vec<Issue>) {
    let rule = ctx.rule;
    #[allow(clippy::cast_precision_loss)]
    let (key, measured) = match ctx.value {
        Value::Number(n) => ("number", n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => ("string", s.chars().count() as f64),
        Value::Array(items) => ("array", items.len() as f64),
        _ => return,
    };
    let field = rule.full_field();

    if let Some(len) = rule.len {
        if (measured - len).abs() > f64::EPSILON {
            errors.push(ctx.issue(&format!("{key}.len"), &[&field, &len]));
        }
        return;
    }

    match (rule.min, rule.max) {
        (Some(min), None) if measured < min => {
            errors.push(ctx.issue(&format!("{key}.min"), &[&field, &min]));
        }
        (None, Some(max)) if measured > max => {
            errors.push(ctx.issue(&format!("{key}.max"), &[&field, &max]));
        }
        (Some(min), Some(max)) if measured < min || measured > max => {
            errors.push(ctx.issue(&format!("{key}.range"), &[&field, &min, &max]));
        }
        _ => {}
    }
}

/// Enum: the value must be one of the allowed values
pub(crate) fn one_of(ctx: &Context<'_>, errors: &mut Vec<Issue>) {
    let Some(allowed) = &ctx.rule.one_of else {
        return;
    };
    if !allowed.contains(ctx.value) {
        let listed = allowed.iter().map(value::display).collect::<Vec<_>>().join(", ");
        errors.push(ctx.issue("enum", &[&ctx.rule.full_field(), &listed]));
    }
}

/// Pattern: the value, read as text, must match the rule's pattern
pub(crate) fn pattern(ctx: &Context<'_>, errors: &mut Vec<Issue>) {
    let Some(pattern) = &ctx.rule.pattern else {
        return;
    };
    let text = match ctx.value {
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) => ctx.value.to_string(),
        _ => return,
    };
    if !pattern.is_match(&text) {
        errors.push(ctx.issue(
            "pattern.mismatch",
            &[&ctx.rule.full_field(), &text, &pattern.as_str()],
        ));
    }
}

/// Whether a number has no fractional part
pub(crate) fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// Parse a date value into epoch milliseconds.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and
/// numeric epoch milliseconds.
pub(crate) fn parse_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.timestamp_millis()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc().timestamp_millis())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc().timestamp_millis())
            }),
        _ => None,
    }
}
