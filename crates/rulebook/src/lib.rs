//! Asynchronous, declarative rule-schema validation
//!
//! A [`Schema`] maps field names to ordered [`Rule`]s. Validating a value runs
//! every rule through its [`Validator`], descends into nested objects and
//! arrays, and collects every violation into a [`ValidationReport`] instead of
//! stopping at the first one.
//!
//! ```no_run
//! use rulebook::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> rulebook::Result<()> {
//! let schema = Schema::new(
//!     Descriptor::new()
//!         .field("name", Rule::string().required().min(3.0))
//!         .field("age", Rule::integer().min(0.0)),
//! );
//!
//! let report = schema
//!     .validate(&json!({"name": "al", "age": 31}), ValidateOptions::default())
//!     .await?;
//! assert_eq!(report.error_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Field results are always reported in declaration order, whichever
//! validator finishes first.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod registry;
pub mod report;
pub mod rules;
pub mod schema;
pub mod validators;

mod resolver;
mod scheduler;
mod task;

pub use rulebook_core::*;

pub use registry::Registry;
pub use report::ValidationReport;
pub use rules::patterns;
pub use schema::Schema;
pub use validators::Builtin;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Context, Descriptor, ErrorRecord, FieldFirst, Issue, Registry, Result, Rule, Schema,
        SchemaError, ValidateOptions, ValidationReport, Validator,
    };
}
