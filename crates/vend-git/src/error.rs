//! Error types for vend-git

use std::path::PathBuf;

/// Result type for vend-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vend-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] vend_fs::Error),

    #[error("Not a git working tree: {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Revision '{rev}' not found")]
    RevisionNotFound { rev: String },

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Failed to fetch '{rev}' from {url}: {message}")]
    FetchFailed {
        url: String,
        rev: String,
        message: String,
    },
}
