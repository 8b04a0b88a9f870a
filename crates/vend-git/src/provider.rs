//! Version control capability consumed by the synchronization engine

use crate::Result;
use vend_fs::NormalizedPath;

/// Primitives the engine needs from a version control system.
///
/// Every method names the working tree it operates on explicitly; nothing
/// depends on the process working directory, so one implementation can serve
/// several sources concurrently.
pub trait VersionControl: Send + Sync {
    /// Clone `url` into the (not yet existing) directory `dir`.
    fn clone_into(&self, url: &str, dir: &NormalizedPath) -> Result<()>;

    /// Whether `dir` itself is the root of a valid working tree.
    fn is_valid_repository(&self, dir: &NormalizedPath) -> bool;

    /// Name of the checked-out branch, or `None` on a detached HEAD.
    fn current_branch(&self, dir: &NormalizedPath) -> Result<Option<String>>;

    /// Full hash of the checked-out commit.
    fn current_hash(&self, dir: &NormalizedPath) -> Result<String>;

    /// A tag pointing exactly at the checked-out commit, if any.
    fn current_tag(&self, dir: &NormalizedPath) -> Result<Option<String>>;

    /// URL of the `origin` remote.
    fn remote_url(&self, dir: &NormalizedPath) -> Result<String>;

    /// Uncommitted changes as short status lines (`M README.md`,
    /// `?? notes.txt`).
    ///
    /// Untracked files are listed only when `include_untracked` is set.
    fn changes(&self, dir: &NormalizedPath, include_untracked: bool) -> Result<Vec<String>>;

    /// Whether [`VersionControl::changes`] reports anything.
    fn has_changes(&self, dir: &NormalizedPath, include_untracked: bool) -> Result<bool> {
        Ok(!self.changes(dir, include_untracked)?.is_empty())
    }

    /// Fetch refs needed for `rev` from `url`.
    fn fetch(&self, dir: &NormalizedPath, url: &str, rev: &str) -> Result<()>;

    /// Check out `rev`.
    ///
    /// With `fetch`, a branch is moved to the freshly fetched remote tip.
    /// With `clean`, untracked files are removed and tracked modifications
    /// discarded.
    fn update_to(&self, dir: &NormalizedPath, rev: &str, fetch: bool, clean: bool) -> Result<()>;
}
