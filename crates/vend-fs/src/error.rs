//! Error types for vend-fs

use std::path::PathBuf;

use crate::document::Format;

/// Result type for vend-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vend-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: Format,
        message: String,
    },

    #[error("Failed to serialize {format} document for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: Format,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Symbolic links are not supported on this platform")]
    SymlinksUnsupported,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
