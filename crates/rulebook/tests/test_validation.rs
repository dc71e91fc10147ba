use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rulebook::prelude::*;
use rulebook::FieldFirst;
use serde_json::{json, Value};

async fn validate(schema: &Schema, source: &Value) -> ValidationReport {
    schema
        .validate(source, ValidateOptions::default())
        .await
        .expect("schema is well formed")
}

fn messages(report: &ValidationReport) -> Vec<&str> {
    report
        .errors()
        .unwrap_or_default()
        .iter()
        .map(|e| e.message.as_str())
        .collect()
}

struct Even;

#[async_trait]
impl Validator for Even {
    async fn validate(&self, ctx: &Context<'_>) -> Vec<Issue> {
        match ctx.value.as_i64() {
            Some(n) if n % 2 == 0 => Vec::new(),
            _ => vec![Issue::from(format!("{} must be even", ctx.rule.full_field()))],
        }
    }
}

#[test]
fn test_descriptor_must_be_a_mapping() {
    for bad in [json!(null), json!([]), json!([{"type": "string"}]), json!("name"), json!(1)] {
        assert!(
            matches!(Schema::from_json(&bad), Err(SchemaError::Configuration(_))),
            "accepted {bad}"
        );
    }
    assert!(Schema::from_json(&json!({})).is_ok());
    assert!(Schema::from_json(&json!({"name": {"type": "string"}})).is_ok());
}

#[tokio::test]
async fn test_valid_source_has_no_errors_or_fields() {
    let schema = Schema::from_json(&json!({
        "name": {"type": "string", "required": true},
        "age": [{"type": "number"}, {"type": "integer", "min": 0}]
    }))
    .unwrap();

    let report = validate(&schema, &json!({"name": "ada", "age": 36})).await;
    assert_eq!(report.into_parts(), (None, None));
}

#[tokio::test]
async fn test_required_age() {
    let schema = Schema::from_json(&json!({"age": [{"type": "number", "required": true}]})).unwrap();

    let report = validate(&schema, &json!({})).await;
    let expected = ErrorRecord::new("age", "age is required");
    assert_eq!(report.errors().unwrap(), &[expected.clone()]);
    assert_eq!(report.fields().unwrap().len(), 1);
    assert_eq!(report.field("age").unwrap(), &[expected]);
}

#[tokio::test]
async fn test_short_name() {
    let schema = Schema::from_json(&json!({"name": [{"type": "string", "min": 3}]})).unwrap();

    let report = validate(&schema, &json!({"name": "ab"})).await;
    assert_eq!(
        report.errors().unwrap(),
        &[ErrorRecord::new("name", "name must be at least 3 characters")]
    );
}

#[tokio::test]
async fn test_fields_group_errors_in_declaration_order() {
    let schema = Schema::new(
        Descriptor::new()
            .field("email", [Rule::of_type("email"), Rule::string().max(5.0)])
            .field("age", Rule::integer())
            .field("ok", Rule::string()),
    );

    let report = validate(&schema, &json!({"email": "not-an-email", "age": 1.5, "ok": "x"})).await;

    assert_eq!(
        messages(&report),
        vec![
            "email is not a valid email",
            "email cannot be longer than 5 characters",
            "age is not an integer",
        ]
    );

    let fields = report.fields().unwrap();
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["email", "age"]);
    let regrouped: Vec<ErrorRecord> = fields.values().flatten().cloned().collect();
    assert_eq!(report.errors().unwrap(), regrouped.as_slice());
}

#[tokio::test]
async fn test_validate_is_idempotent() {
    let schema = Schema::new(
        Descriptor::new()
            .field("name", Rule::string().min(3.0))
            .field("tags", Rule::array().min(1.0)),
    );
    let source = json!({"name": "x", "tags": []});

    let first = validate(&schema, &source).await;
    let second = validate(&schema, &source).await;
    assert_eq!(first, second);
    assert_eq!(first.error_count(), 2);
}

#[tokio::test]
async fn test_transforms_never_touch_caller_source() {
    let schema = Schema::new(
        Descriptor::new()
            .field(
                "name",
                Rule::string()
                    .min(3.0)
                    .transform(|v| json!(v.as_str().unwrap_or_default().trim())),
            )
            .field(
                "code",
                Rule::string()
                    .pattern(regex::Regex::new("^[A-Z]+$").unwrap())
                    .transform(|v| json!(v.as_str().unwrap_or_default().to_uppercase())),
            ),
    );
    let source = json!({"name": "  ab  ", "code": "abc"});
    let before = source.clone();

    let report = validate(&schema, &source).await;

    assert_eq!(source, before);
    // The trimmed value is the one checked; the uppercased code passes.
    assert_eq!(
        report.errors().unwrap(),
        &[ErrorRecord::new("name", "name must be at least 3 characters")]
    );
}

#[tokio::test]
async fn test_first_stops_each_field_at_its_first_error() {
    let schema = Schema::new(
        Descriptor::new()
            .field("a", [Rule::number(), Rule::integer()])
            .field("b", [Rule::string().min(5.0), Rule::string().pattern(regex::Regex::new("^z").unwrap())])
            .field("c", Rule::string()),
    );
    let source = json!({"a": "one", "b": "abc", "c": "fine"});

    let all = validate(&schema, &source).await;
    assert_eq!(all.error_count(), 4);

    let first = schema
        .validate(&source, ValidateOptions::new().first(true))
        .await
        .unwrap();
    assert_eq!(
        messages(&first),
        vec!["a is not a number", "b must be at least 5 characters"]
    );
}

#[tokio::test]
async fn test_field_first_list_only_stops_named_fields() {
    let schema = Schema::new(
        Descriptor::new()
            .field("a", [Rule::string().min(5.0), Rule::string().max(1.0)])
            .field("b", [Rule::string().min(5.0), Rule::string().max(1.0)]),
    );
    let options = ValidateOptions::new().field_first(FieldFirst::Only(vec!["a".into()]));

    let report = schema
        .validate(&json!({"a": "abc", "b": "abc"}), options)
        .await
        .unwrap();
    assert_eq!(report.field("a").unwrap().len(), 1);
    assert_eq!(report.field("b").unwrap().len(), 2);
}

#[tokio::test]
async fn test_rule_message_replaces_reported_errors() {
    let schema = Schema::new(
        Descriptor::new().field(
            "age",
            [
                Rule::integer().min(18.0).message("adults only"),
                Rule::number().message("never shown"),
            ],
        ),
    );

    let report = validate(&schema, &json!({"age": 12})).await;
    assert_eq!(report.errors().unwrap(), &[ErrorRecord::new("age", "adults only")]);
}

#[tokio::test]
async fn test_keys_limit_validated_fields() {
    let schema = Schema::new(
        Descriptor::new()
            .field("a", Rule::string().required())
            .field("b", Rule::string().required())
            .field("c", Rule::string().required()),
    );

    let report = schema
        .validate(&json!({}), ValidateOptions::new().keys(["c", "a", "unknown"]))
        .await
        .unwrap();
    assert_eq!(messages(&report), vec!["c is required", "a is required"]);
}

#[tokio::test]
async fn test_options_from_json() {
    let schema = Schema::new(
        Descriptor::new().field("a", [Rule::string().min(5.0), Rule::string().max(1.0)]),
    );
    let options: ValidateOptions = serde_json::from_value(json!({
        "fieldFirst": true,
        "messages": {"string": {"min": "%s needs %s or more"}}
    }))
    .unwrap();

    let report = schema.validate(&json!({"a": "abc"}), options).await.unwrap();
    assert_eq!(messages(&report), vec!["a needs 5 or more"]);
}

#[tokio::test]
async fn test_registered_type_is_shared() {
    let registry = Arc::new(Registry::default());
    let built_before = Schema::with_registry(
        Descriptor::new().field("n", Rule::of_type("even")),
        Arc::clone(&registry),
    );

    registry.register("even", Even);

    let built_after = Schema::with_registry(
        Descriptor::new().field("m", Rule::of_type("even").required()),
        Arc::clone(&registry),
    );

    assert!(validate(&built_before, &json!({"n": 4})).await.is_valid());
    assert_eq!(
        messages(&validate(&built_before, &json!({"n": 3})).await),
        vec!["n must be even"]
    );
    assert_eq!(
        messages(&validate(&built_after, &json!({"m": 7})).await),
        vec!["m must be even"]
    );
}

#[tokio::test]
async fn test_unknown_type_without_validator_fails() {
    let schema = Schema::from_json(&json!({"n": {"type": "even"}})).unwrap();
    let err = schema
        .validate(&json!({"n": 2}), ValidateOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown rule type even");
}

#[tokio::test]
async fn test_custom_validator_on_rule() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let schema = Schema::new(Descriptor::new().field(
        "password",
        [
            Rule::string().required(),
            Rule::custom_fn(move |ctx| {
                seen.fetch_add(1, Ordering::SeqCst);
                let confirm = ctx.source.get("confirm");
                if confirm == Some(ctx.value) {
                    Vec::new()
                } else {
                    vec![Issue::from("passwords differ")]
                }
            }),
        ],
    ));

    let report = validate(&schema, &json!({"password": "a", "confirm": "b"})).await;
    assert_eq!(report.errors().unwrap(), &[ErrorRecord::new("password", "passwords differ")]);
    assert!(validate(&schema, &json!({"password": "a", "confirm": "a"})).await.is_valid());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_into_result() {
    let schema = Schema::new(Descriptor::new().field("name", Rule::string().required()));
    let errors = validate(&schema, &json!({"name": ""}))
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(errors, vec![ErrorRecord::new("name", "name is required")]);
}

#[tokio::test]
async fn test_required_type_treats_empty_array_as_missing() {
    let schema = Schema::from_json(&json!({"tags": {"type": "required", "required": true}})).unwrap();

    let report = validate(&schema, &json!({"tags": []})).await;
    assert_eq!(report.errors().unwrap(), &[ErrorRecord::new("tags", "tags is required")]);
    assert!(validate(&schema, &json!({"tags": ["a"]})).await.is_valid());
    assert!(validate(&schema, &json!({"tags": {}})).await.is_valid());
}

#[tokio::test]
async fn test_json_pattern_without_type_checks_strings() {
    let schema = Schema::from_json(&json!({"code": {"pattern": "^[0-9]+$"}})).unwrap();

    let report = validate(&schema, &json!({"code": 123})).await;
    assert_eq!(report.errors().unwrap(), &[ErrorRecord::new("code", "code is not a string")]);
    assert_eq!(
        messages(&validate(&schema, &json!({"code": "12a"})).await),
        vec!["code value 12a does not match pattern ^[0-9]+$"]
    );
    assert!(validate(&schema, &json!({"code": "123"})).await.is_valid());
}
