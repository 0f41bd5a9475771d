//! Error types for schema loading and repair configuration
//!
//! Validation findings are never errors; they are collected as data in a
//! [`ValidationReport`](crate::validate::ValidationReport). The variants here
//! cover input that cannot be interpreted as a schema at all, plus I/O.

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema loading errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema format at {path}: {message}")]
    InvalidFormat { path: String, message: String },

    #[error("Unknown repair strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unsupported schema file extension: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaError {
    /// Shorthand for an [`SchemaError::InvalidFormat`] at a dotted path
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::InvalidFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}
