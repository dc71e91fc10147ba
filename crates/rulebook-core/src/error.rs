//! Error types for schema configuration

use thiserror::Error;

/// Configuration error raised while defining a schema or building its tasks.
///
/// These always indicate a programming mistake in the rules themselves.
/// Data that fails validation is never reported through this type.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Missing or malformed descriptor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rule type with neither a custom validator nor a registered default
    #[error("Unknown rule type {0}")]
    UnknownType(String),

    /// Pattern that does not compile
    #[error("Invalid pattern for field `{field}`: {source}")]
    InvalidPattern {
        /// Field the rule was declared on
        field: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchemaError {
    /// Build a configuration error from any message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
