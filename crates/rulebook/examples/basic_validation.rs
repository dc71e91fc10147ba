//! Example: validating a sign-up form with nested and custom rules
//!
//! Run with `RUST_LOG=rulebook=debug` to see scheduling decisions.

use std::sync::Arc;

use async_trait::async_trait;
use rulebook::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Usernames already taken, checked asynchronously as a lookup service would
struct Available {
    taken: Vec<&'static str>,
}

#[async_trait]
impl Validator for Available {
    async fn validate(&self, ctx: &Context<'_>) -> Vec<Issue> {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        match ctx.value.as_str() {
            Some(name) if self.taken.iter().any(|taken| *taken == name) => {
                vec![Issue::from(format!("{} `{name}` is taken", ctx.rule.full_field()))]
            }
            _ => Vec::new(),
        }
    }
}

fn print_report(label: &str, report: &ValidationReport) {
    match report.fields() {
        None => println!("✅ {label}: valid"),
        Some(fields) => {
            println!("❌ {label}: {} error(s)", report.error_count());
            for (field, errors) in fields {
                for error in errors {
                    println!("   {field}: {}", error.message);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Rulebook Validation Examples ===\n");

    // Example 1: Schema from a JSON descriptor
    let registry = Arc::new(Registry::default());
    registry.register("available", Available { taken: vec!["admin", "root"] });

    let descriptor = json!({
        "username": [
            {"type": "string", "required": true, "min": 3, "max": 20},
            {"type": "available"}
        ],
        "email": {"type": "email", "required": true},
        "age": {"type": "integer", "min": 13},
        "address": {
            "type": "object",
            "required": true,
            "fields": {
                "city": {"type": "string", "required": true},
                "zip": {"type": "string", "pattern": "^\\d{5}$"}
            }
        },
        "tags": {"type": "array", "defaultField": {"type": "string", "max": 10}}
    });
    let schema = Schema::with_registry(Descriptor::from_json(&descriptor)?, Arc::clone(&registry));

    let valid = json!({
        "username": "alice_doe",
        "email": "alice@example.com",
        "age": 25,
        "address": {"city": "Oslo", "zip": "01500"},
        "tags": ["rust", "async"]
    });
    print_report("valid user", &schema.validate(&valid, ValidateOptions::default()).await?);

    let invalid = json!({
        "username": "admin",
        "email": "not-an-email",
        "age": 9.5,
        "address": {"zip": "abc"},
        "tags": ["fine", "far-too-long-for-a-tag"]
    });
    print_report("invalid user", &schema.validate(&invalid, ValidateOptions::default()).await?);

    // Example 2: Stop each field at its first error
    let report = schema
        .validate(&invalid, ValidateOptions::new().first(true))
        .await?;
    print_report("invalid user, first error only", &report);

    // Example 3: Programmatic rules with a transform and custom messages
    let mut signup = Schema::with_registry(
        Descriptor::new()
            .field(
                "nickname",
                Rule::string()
                    .required()
                    .min(2.0)
                    .transform(|v| json!(v.as_str().unwrap_or_default().trim())),
            )
            .field("plan", Rule::of_type("enum").one_of(["free", "pro"])),
        registry,
    );
    signup.merge_messages(&json!({"enum": "%s must be %s"}));

    let form = json!({"nickname": "  b  ", "plan": "gold"});
    let report = signup.validate(&form, ValidateOptions::default()).await?;
    print_report("signup form", &report);
    println!("   input left untouched: {form}");

    println!("\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
