//! Helpers for inspecting input values
//!
//! Inputs are plain `serde_json::Value` trees. An absent field and an
//! explicit `null` are both treated as "no value".

use serde_json::Value;

/// Types whose empty string counts as an empty value.
const STRING_LIKE: &[&str] = &["string", "url", "hex", "email", "date", "pattern"];

/// Look up a child of `source` by key.
///
/// Objects resolve by key, arrays by decimal index. Any other value has no
/// children.
pub fn lookup<'a>(source: &'a Value, key: &str) -> Option<&'a Value> {
    match source {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Whether `source` has a child named `key`.
pub fn has_field(source: &Value, key: &str) -> bool {
    lookup(source, key).is_some()
}

/// Write `value` into `source` at `key`.
///
/// Returns `false` when `source` cannot hold the key (a scalar, or an array
/// index out of bounds).
pub fn write_field(source: &mut Value, key: &str, value: Value) -> bool {
    match source {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            true
        }
        Value::Array(items) => match key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Truthiness of a value: null, `false`, zero and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `value` counts as empty for a rule of `rule_type`.
///
/// Null is always empty. `""` is empty for string-like types and `[]` is
/// empty for arrays.
pub fn is_empty_value(value: &Value, rule_type: &str) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => rule_type == "array" && items.is_empty(),
        Value::String(s) => s.is_empty() && STRING_LIKE.contains(&rule_type),
        _ => false,
    }
}

/// Render a value the way it reads inside a message: strings bare, the rest
/// as JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_object_and_array() {
        let source = json!({"name": "ann", "tags": ["a", "b"]});
        assert_eq!(lookup(&source, "name"), Some(&json!("ann")));
        assert_eq!(lookup(&source, "missing"), None);

        let tags = lookup(&source, "tags").unwrap();
        assert_eq!(lookup(tags, "1"), Some(&json!("b")));
        assert_eq!(lookup(tags, "2"), None);
        assert_eq!(lookup(tags, "x"), None);
        assert_eq!(lookup(&json!("scalar"), "0"), None);
    }

    #[test]
    fn test_write_field() {
        let mut source = json!({"a": 1});
        assert!(write_field(&mut source, "b", json!(2)));
        assert_eq!(source, json!({"a": 1, "b": 2}));

        let mut items = json!([1, 2]);
        assert!(write_field(&mut items, "0", json!(9)));
        assert!(!write_field(&mut items, "5", json!(9)));
        assert_eq!(items, json!([9, 2]));

        assert!(!write_field(&mut json!(3), "a", json!(1)));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(0.5)));
    }

    #[test]
    fn test_empty_value_depends_on_type() {
        assert!(is_empty_value(&Value::Null, "number"));
        assert!(is_empty_value(&json!(""), "string"));
        assert!(is_empty_value(&json!(""), "email"));
        assert!(!is_empty_value(&json!(""), "number"));
        assert!(is_empty_value(&json!([]), "array"));
        assert!(!is_empty_value(&json!([]), "object"));
        assert!(!is_empty_value(&json!(0), "number"));
    }
}
