//! Core rule, message and validator types for the rulebook validation engine
//!
//! This crate holds the value model every part of the engine shares: rule
//! declarations and their normalization into descriptors, the message
//! catalog, error records, call options and the asynchronous
//! [`Validator`] trait. Execution lives in the `rulebook` crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod descriptor;
pub mod error;
pub mod issue;
pub mod messages;
pub mod options;
pub mod rule;
pub mod validator;
pub mod value;

// Re-export core traits and types
pub use descriptor::{Descriptor, RuleEntry};
pub use error::{Result, SchemaError};
pub use issue::{ErrorRecord, Issue};
pub use messages::{format, Messages};
pub use options::{FieldFirst, ValidateOptions};
pub use rule::{Rule, Transform};
pub use validator::{from_fn, Context, FnValidator, Validator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Context, Descriptor, ErrorRecord, Issue, Messages, Result, Rule, SchemaError,
        ValidateOptions, Validator,
    };
}
