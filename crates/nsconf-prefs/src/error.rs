use std::path::PathBuf;

use thiserror::Error;

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}
