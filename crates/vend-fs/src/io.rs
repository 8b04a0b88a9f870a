//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file or directory tree.
///
/// Symbolic links are removed themselves, never followed. Missing paths are
/// not an error.
pub fn remove_path(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_entry();
    let metadata = match fs::symlink_metadata(&native_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    if metadata.file_type().is_symlink() {
        return crate::link::remove_symlink(path);
    }

    let result = if metadata.is_dir() {
        fs::remove_dir_all(&native_path)
    } else {
        fs::remove_file(&native_path)
    };
    result.map_err(|e| Error::io(&native_path, e))
}

/// Create a directory and all of its parents.
pub fn create_dir_all(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}
