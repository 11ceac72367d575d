use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnipvaultError {
    /// A required field was missing or empty.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Snippet store at {} is not valid JSON: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl SnipvaultError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SnipvaultError::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        SnipvaultError::Validation(format!("{} is required", field))
    }
}

pub type Result<T> = std::result::Result<T, SnipvaultError>;
