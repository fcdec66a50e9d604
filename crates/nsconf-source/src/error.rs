//! Data source error types.

use std::path::PathBuf;

use nsconf_core::SchemaError;
use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Namespace with id \"{0}\" not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid namespace document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("namespace record {index} could not be upgraded: {source}")]
    Migration {
        index: usize,
        #[source]
        source: SchemaError,
    },

    #[error("file source requires a data file path")]
    MissingPath,
}
