//! Error types for vend-core

use std::path::PathBuf;

use crate::shell::ShellError;

/// Result type for vend-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing sources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source or manifest is malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A working tree path exists (or is required) but is not a repository
    #[error("Not a valid repository: {path}")]
    InvalidRepository { path: PathBuf },

    /// A working tree has local modifications that an operation would lose
    #[error("Uncommitted changes in {path}")]
    UncommittedChanges { path: PathBuf },

    /// Something other than a symbolic link sits where a link should go
    #[error("Preexisting link location at {path}")]
    LinkOccupied { path: PathBuf },

    /// A post-sync script exited with a failure
    #[error("Command '{command}' failed in {dir}")]
    ScriptFailure { command: String, dir: PathBuf },

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("No manifest found in {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Source not found in manifest: {name}")]
    SourceNotFound { name: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from vend-fs
    #[error(transparent)]
    Fs(#[from] vend_fs::Error),

    /// Version control error from vend-git
    #[error(transparent)]
    Git(#[from] vend_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reporting groups for [`Error`].
///
/// Callers that only need to tell "fix your manifest" from "commit your
/// work" apart match on the kind instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Repository,
    LocalChanges,
    Script,
    Other,
}

impl Error {
    /// The reporting group this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. }
            | Self::ManifestNotFound { .. }
            | Self::SourceNotFound { .. } => ErrorKind::Config,
            Self::InvalidRepository { .. } | Self::Git(_) => ErrorKind::Repository,
            Self::UncommittedChanges { .. } | Self::LinkOccupied { .. } => {
                ErrorKind::LocalChanges
            }
            Self::ScriptFailure { .. } | Self::Shell(_) => ErrorKind::Script,
            Self::Fs(vend_fs::Error::ConfigParse { .. })
            | Self::Fs(vend_fs::Error::UnsupportedFormat { .. }) => ErrorKind::Config,
            Self::Fs(_) | Self::Io(_) => ErrorKind::Other,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
