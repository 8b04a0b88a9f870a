//! Normalized path handling for cross-platform compatibility

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Working trees, link targets and manifest locations are all carried as
/// `NormalizedPath` so that messages and comparisons look the same on every
/// platform. Conversion to a native `PathBuf` happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Native path naming the entry itself.
    ///
    /// Trailing separators are dropped: `link/` would make the OS resolve a
    /// symbolic link to the directory it points at.
    pub fn to_entry(&self) -> PathBuf {
        match self.inner.trim_end_matches('/') {
            "" => self.to_native(),
            trimmed => PathBuf::from(trimmed),
        }
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let segment_normalized = segment_normalized.trim_start_matches("./");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check if this path exists on the filesystem.
    ///
    /// A dangling symbolic link does not count as existing.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Resolve to an absolute, canonical path.
    ///
    /// The path must exist. Uses `dunce` so Windows paths stay free of the
    /// `\\?\` prefix.
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.to_native();
        dunce::canonicalize(&native)
            .map(Self::new)
            .map_err(|e| Error::io(native, e))
    }

    /// Make the path absolute without touching the filesystem beyond
    /// reading the process working directory for relative input.
    pub fn absolute(&self) -> Result<Self> {
        let native = self.to_native();
        if native.is_absolute() {
            return Ok(self.clone());
        }
        let cwd = std::env::current_dir().map_err(|e| Error::io(&native, e))?;
        Ok(Self::new(cwd.join(native)))
    }
}

/// Compute the path of `to` relative to the directory `from`.
///
/// Both paths should be absolute (or both relative to the same base).
/// Returns `.` when they are the same directory.
pub fn relative_path(from: impl AsRef<Path>, to: impl AsRef<Path>) -> PathBuf {
    let from: Vec<Component<'_>> = from
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
