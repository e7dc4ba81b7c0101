//! Error types for the script filter schemas

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while mapping the shapes to and from their external forms
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Missing environment variable: {name}")]
    MissingVariable { name: String },

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidVariable { name: String, value: String },

    #[error("Unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid host version: {0}")]
    InvalidVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
