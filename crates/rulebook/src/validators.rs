//! Built-in validators, one per default rule type

use async_trait::async_trait;
use serde_json::Value;

use rulebook_core::value::is_empty_value;
use rulebook_core::{Context, Issue, Validator};

use crate::rules;

/// Default validator for each built-in rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Strings, with length, pattern and whitespace checks
    String,
    /// Numbers, with range checks
    Number,
    /// Booleans
    Boolean,
    /// Strings holding a valid regular expression
    Regexp,
    /// Whole numbers, with range checks
    Integer,
    /// Numbers with a fractional part, with range checks
    Float,
    /// Arrays, with length checks
    Array,
    /// Objects
    Object,
    /// One of the rule's allowed values
    Enum,
    /// Strings matching the rule's pattern
    Pattern,
    /// Dates given as RFC 3339 or `YYYY-MM-DD` strings, or epoch millis
    Date,
    /// URLs
    Url,
    /// Hex colours
    Hex,
    /// Email addresses
    Email,
    /// Presence only
    Required,
    /// Anything, subject to `required`
    Any,
}

impl Builtin {
    /// Every built-in validator
    pub const ALL: [Builtin; 16] = [
        Builtin::String,
        Builtin::Number,
        Builtin::Boolean,
        Builtin::Regexp,
        Builtin::Integer,
        Builtin::Float,
        Builtin::Array,
        Builtin::Object,
        Builtin::Enum,
        Builtin::Pattern,
        Builtin::Date,
        Builtin::Url,
        Builtin::Hex,
        Builtin::Email,
        Builtin::Required,
        Builtin::Any,
    ];

    /// Rule type name this validator is registered under
    pub fn type_name(self) -> &'static str {
        match self {
            Builtin::String => "string",
            Builtin::Number => "number",
            Builtin::Boolean => "boolean",
            Builtin::Regexp => "regexp",
            Builtin::Integer => "integer",
            Builtin::Float => "float",
            Builtin::Array => "array",
            Builtin::Object => "object",
            Builtin::Enum => "enum",
            Builtin::Pattern => "pattern",
            Builtin::Date => "date",
            Builtin::Url => "url",
            Builtin::Hex => "hex",
            Builtin::Email => "email",
            Builtin::Required => "required",
            Builtin::Any => "any",
        }
    }

    /// Run the checks for this type synchronously
    pub fn check(self, ctx: &Context<'_>) -> Vec<Issue> {
        let mut errors = Vec::new();
        if !rules::should_check(ctx) {
            return errors;
        }
        let required = ctx.rule.required;

        match self {
            Builtin::String => {
                if is_empty_value(ctx.value, "string") && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, "string");
                if !is_empty_value(ctx.value, "string") {
                    rules::type_check(ctx, &mut errors);
                    rules::range(ctx, &mut errors);
                    rules::pattern(ctx, &mut errors);
                    if ctx.rule.whitespace {
                        rules::whitespace(ctx, &mut errors);
                    }
                }
            }

            Builtin::Number | Builtin::Integer | Builtin::Float => {
                // An empty string counts as no number at all.
                let blank = Value::Null;
                let ctx = if ctx.value.as_str() == Some("") {
                    ctx.with_value(&blank)
                } else {
                    *ctx
                };
                if is_empty_value(ctx.value, ctx.rule_type()) && !required {
                    return errors;
                }
                rules::required(&ctx, &mut errors, ctx.rule_type());
                if !ctx.value.is_null() {
                    rules::type_check(&ctx, &mut errors);
                    rules::range(&ctx, &mut errors);
                }
            }

            Builtin::Boolean | Builtin::Regexp | Builtin::Object => {
                if is_empty_value(ctx.value, ctx.rule_type()) && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, ctx.rule_type());
                if !ctx.value.is_null() {
                    rules::type_check(ctx, &mut errors);
                }
            }

            Builtin::Array => {
                if ctx.value.is_null() && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, "array");
                if !ctx.value.is_null() {
                    rules::type_check(ctx, &mut errors);
                    rules::range(ctx, &mut errors);
                }
            }

            Builtin::Enum => {
                if is_empty_value(ctx.value, ctx.rule_type()) && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, ctx.rule_type());
                if !ctx.value.is_null() {
                    rules::one_of(ctx, &mut errors);
                }
            }

            Builtin::Pattern => {
                if is_empty_value(ctx.value, "string") && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, "string");
                if !is_empty_value(ctx.value, "string") {
                    rules::pattern(ctx, &mut errors);
                }
            }

            Builtin::Date | Builtin::Url | Builtin::Hex | Builtin::Email => {
                let kind = ctx.rule_type();
                if is_empty_value(ctx.value, kind) && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, kind);
                if !is_empty_value(ctx.value, kind) {
                    rules::type_check(ctx, &mut errors);
                }
            }

            Builtin::Required => {
                // Empty strings and arrays count as missing; objects never do.
                let kind = match ctx.value {
                    Value::String(_) => "string",
                    Value::Array(_) => "array",
                    _ => "object",
                };
                rules::required(ctx, &mut errors, kind);
            }

            Builtin::Any => {
                if is_empty_value(ctx.value, ctx.rule_type()) && !required {
                    return errors;
                }
                rules::required(ctx, &mut errors, ctx.rule_type());
            }
        }

        errors
    }
}

#[async_trait]
impl Validator for Builtin {
    async fn validate(&self, ctx: &Context<'_>) -> Vec<Issue> {
        self.check(ctx)
    }
}
