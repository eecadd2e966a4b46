use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Configuration error ({}): {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Invalid front matter - file={}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid document - file={}: {reason}", path.display())]
    Validation { path: PathBuf, reason: String },

    #[error("No such document: {0}")]
    NotFound(String),

    #[error("Identifier {full_path} is used by more than one document - file={}", path.display())]
    Collision { full_path: String, path: PathBuf },

    #[error("IO error - file={}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::Config { path: path.into(), reason: reason.into() }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::Parse { path: path.into(), reason: reason.into() }
    }

    pub fn validation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::Validation { path: path.into(), reason: reason.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IndexError::Io { path: path.into(), source }
    }

    /// Whether this is the expected "no such document" outcome rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound(_))
    }
}
