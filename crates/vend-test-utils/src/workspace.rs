//! [`TestWorkspace`] builder for project directories with a manifest.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary project directory with helpers for writing a `vend.yml`
/// manifest and asserting on the resulting tree.
///
/// # Example
///
/// ```rust,no_run
/// use vend_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_manifest("location: deps\nsources: []\n");
/// ws.assert_file_exists("vend.yml");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the project.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `vend.yml` with the given YAML content.
    pub fn write_manifest(&self, yaml: &str) {
        fs::write(self.root().join("vend.yml"), yaml).unwrap();
    }

    /// Write a manifest declaring a single source.
    pub fn write_single_source(&self, name: &str, repo: &str, rev: &str) {
        self.write_manifest(&format!(
            "location: vend_sources\nsources:\n  - name: {name}\n    repo: {repo}\n    rev: {rev}\n"
        ));
    }

    /// Read `vend.yml` back.
    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.root().join("vend.yml")).unwrap()
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write_file(&self, relative: &str, content: &str) {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
