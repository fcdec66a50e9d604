//! Error types for field-path edits and schema migration.

use thiserror::Error;

/// Errors raised when applying a field-path edit to a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field path: {0}")]
    UnknownPath(String),

    #[error("field path nests deeper than two levels: {0}")]
    TooDeep(String),

    #[error("field {path} expects {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid value for {path}: {reason}")]
    InvalidInput { path: String, reason: String },
}

/// Errors raised while upgrading a stored record to the current schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("unsupported egress endpoint entry: {0}")]
    InvalidEgressEntry(String),

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
