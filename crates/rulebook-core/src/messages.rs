//! Message catalog and template formatting
//!
//! The catalog is a nested JSON object of template strings keyed by
//! validator kind (`required`, `string.min`, `types.email`, ...). Templates
//! use positional `%s` placeholders filled by [`format`].

use std::fmt::{self, Write as _};
use std::sync::Arc;

use lazy_static::lazy_static;
use serde_json::{json, Value};

lazy_static! {
    static ref DEFAULT_CATALOG: Arc<Value> = Arc::new(default_catalog());
}

fn default_catalog() -> Value {
    json!({
        "default": "Validation error on field %s",
        "required": "%s is required",
        "enum": "%s must be one of %s",
        "whitespace": "%s cannot be empty",
        "date": {
            "format": "%s date %s is invalid for format %s",
            "parse": "%s date could not be parsed, %s is invalid ",
            "invalid": "%s date %s is invalid"
        },
        "types": {
            "string": "%s is not a %s",
            "method": "%s is not a %s (function)",
            "array": "%s is not an %s",
            "object": "%s is not an %s",
            "number": "%s is not a %s",
            "date": "%s is not a %s",
            "boolean": "%s is not a %s",
            "integer": "%s is not an %s",
            "float": "%s is not a %s",
            "regexp": "%s is not a valid %s",
            "email": "%s is not a valid %s",
            "url": "%s is not a valid %s",
            "hex": "%s is not a valid %s"
        },
        "string": {
            "len": "%s must be exactly %s characters",
            "min": "%s must be at least %s characters",
            "max": "%s cannot be longer than %s characters",
            "range": "%s must be between %s and %s characters"
        },
        "number": {
            "len": "%s must equal %s",
            "min": "%s cannot be less than %s",
            "max": "%s cannot be greater than %s",
            "range": "%s must be between %s and %s"
        },
        "array": {
            "len": "%s must be exactly %s in length",
            "min": "%s cannot be less than %s in length",
            "max": "%s cannot be greater than %s in length",
            "range": "%s must be between %s and %s in length"
        },
        "pattern": {
            "mismatch": "%s value %s does not match pattern %s"
        }
    })
}

/// Effective message catalog.
///
/// Clones share storage; the first [`Messages::merge`] on an instance takes
/// a private copy, so overriding one schema's messages never leaks into
/// another.
#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    catalog: Arc<Value>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            catalog: Arc::clone(&DEFAULT_CATALOG),
        }
    }
}

impl Messages {
    /// Fresh default catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Default catalog with `overrides` merged on top
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut messages = Self::new();
        messages.merge(overrides);
        messages
    }

    /// Whether this instance still shares the built-in default catalog
    pub fn is_default(&self) -> bool {
        Arc::ptr_eq(&self.catalog, &DEFAULT_CATALOG)
    }

    /// Look up a template by dotted path, e.g. `"string.min"`
    pub fn get(&self, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(self.catalog.as_ref(), |node, key| node.get(key))
            .and_then(Value::as_str)
    }

    /// Template at `path`, or the `default` template when it is missing
    pub fn template(&self, path: &str) -> &str {
        self.get(path)
            .or_else(|| self.get("default"))
            .unwrap_or("Validation error on field %s")
    }

    /// Format the template at `path` with positional arguments
    pub fn render(&self, path: &str, args: &[&dyn fmt::Display]) -> String {
        format(self.template(path), args)
    }

    /// Deep-merge `overrides` onto this catalog.
    ///
    /// Nested objects merge key by key; any other value replaces what was
    /// there. Overrides that are not objects are ignored.
    pub fn merge(&mut self, overrides: &Value) {
        if !overrides.is_object() {
            return;
        }
        merge_into(Arc::make_mut(&mut self.catalog), overrides);
    }

    /// The catalog as a JSON value
    pub fn as_value(&self) -> &Value {
        &self.catalog
    }
}

fn merge_into(target: &mut Value, overrides: &Value) {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                let nested = value.is_object() && target.get(key).is_some_and(Value::is_object);
                if !nested {
                    target.insert(key.clone(), value.clone());
                } else if let Some(existing) = target.get_mut(key) {
                    merge_into(existing, value);
                }
            }
        }
        (target, overrides) => *target = overrides.clone(),
    }
}

/// Substitute positional placeholders in `template`.
///
/// `%s`, `%d` and `%j` each consume the next argument; `%%` renders a single
/// `%`. Placeholders beyond the supplied arguments are left as written.
pub fn format(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('s' | 'd' | 'j')) => {
                chars.next();
                match args.next() {
                    Some(arg) => {
                        let _ = write!(out, "{arg}");
                    }
                    None => {
                        out.push('%');
                        out.push(spec);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    out
}
