//! Form error types.

use thiserror::Error;

pub type FormResult<T> = Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Field(#[from] nsconf_core::FieldError),

    #[error("row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
