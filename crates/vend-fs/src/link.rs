//! Symbolic link capability
//!
//! Links are an optional platform feature. Callers check
//! [`symlinks_supported`] (or carry their own capability flag) and skip link
//! creation instead of failing when it is unavailable.

use std::fs;
use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Whether this build can create symbolic links.
pub fn symlinks_supported() -> bool {
    cfg!(any(unix, windows))
}

/// Check whether `path` is itself a symbolic link (dangling or not).
pub fn is_symlink(path: &NormalizedPath) -> bool {
    fs::symlink_metadata(path.to_entry())
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Check whether anything occupies `path`, including a dangling link.
pub fn is_occupied(path: &NormalizedPath) -> bool {
    fs::symlink_metadata(path.to_entry()).is_ok()
}

/// Create a directory symbolic link at `link` whose content is `target`.
///
/// `target` is stored verbatim, so relative targets resolve against the
/// link's parent directory.
pub fn create_symlink(target: &Path, link: &NormalizedPath) -> Result<()> {
    let native_link = link.to_entry();
    tracing::debug!(link = %link, target = %target.display(), "Creating symbolic link");
    platform_symlink(target, &native_link).map_err(|e| Error::io(&native_link, e))
}

/// Remove a symbolic link without touching what it points to.
pub fn remove_symlink(link: &NormalizedPath) -> Result<()> {
    let native_link = link.to_entry();
    match fs::remove_file(&native_link) {
        Ok(()) => Ok(()),
        // Windows directory links must be removed as directories
        #[cfg(windows)]
        Err(_) => fs::remove_dir(&native_link).map_err(|e| Error::io(&native_link, e)),
        #[cfg(not(windows))]
        Err(e) => Err(Error::io(&native_link, e)),
    }
}

#[cfg(unix)]
fn platform_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn platform_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn platform_symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        Error::SymlinksUnsupported.to_string(),
    ))
}
