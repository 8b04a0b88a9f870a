//! The project manifest (`vend.yml`, or its TOML and JSON forms)

use serde::{Deserialize, Serialize};
use vend_fs::NormalizedPath;
use vend_fs::document::{read_document, write_document};

use crate::error::{Error, Result};
use crate::source::Source;

/// File names searched for in a project root, first match wins.
pub const MANIFEST_NAMES: [&str; 5] = [
    "vend.yml",
    "vend.yaml",
    ".vend.yml",
    "vend.toml",
    "vend.json",
];

/// Directory under the project root holding working trees by default.
pub const DEFAULT_LOCATION: &str = "vend_sources";

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// Declared and locked sources of a project.
///
/// ```yaml
/// location: vend_sources
/// sources:
///   - name: dep
///     repo: https://example/repo.git
///     rev: v1.0
/// sources_locked: []
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub sources_locked: Vec<Source>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            location: default_location(),
            sources: Vec::new(),
            sources_locked: Vec::new(),
        }
    }
}

impl Manifest {
    /// Locate the manifest file in `root`.
    pub fn find(root: &NormalizedPath) -> Option<NormalizedPath> {
        MANIFEST_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Load and validate the manifest at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_native(),
            });
        }
        let manifest: Self = read_document(path)?;
        if manifest.location.trim().is_empty() {
            return Err(Error::invalid_config(format!(
                "'location' is empty in {path}"
            )));
        }
        tracing::debug!(
            path = %path,
            sources = manifest.sources.len(),
            locked = manifest.sources_locked.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Write the manifest to `path` atomically, in the format its extension
    /// names.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        write_document(path, self)?;
        tracing::debug!(path = %path, "Saved manifest");
        Ok(())
    }

    /// Directory holding the working trees for a project at `root`.
    pub fn sources_root(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.location)
    }

    /// Declared source named `name`.
    pub fn find_source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name() == name)
    }

    /// Merge `locked` into `sources_locked`.
    ///
    /// Entries replace existing ones of the same name. The result follows
    /// the declaration order of `sources`; locked entries without a
    /// declaration keep their relative order at the end.
    pub fn merge_locked(&mut self, locked: Vec<Source>) {
        let mut merged = std::mem::take(&mut self.sources_locked);
        for source in locked {
            match merged.iter_mut().find(|s| s.same_name(&source)) {
                Some(existing) => *existing = source,
                None => merged.push(source),
            }
        }

        let position = |source: &Source| {
            self.sources
                .iter()
                .position(|s| s.same_name(source))
                .unwrap_or(usize::MAX)
        };
        // Stable sort keeps undeclared entries in their existing order
        merged.sort_by_key(|s| position(s));
        self.sources_locked = merged;
    }
}
