//! `git2`-backed [`VersionControl`] implementation

use git2::{FetchOptions, build::RepoBuilder};
use vend_fs::NormalizedPath;

use crate::helpers::{self, Target};
use crate::{Error, Result, provider::VersionControl};

/// Version control client built on libgit2.
///
/// Stateless: every call opens the repository it is pointed at, so one
/// client can be shared across threads and sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitClient;

impl GitClient {
    /// Create a new client.
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for GitClient {
    fn clone_into(&self, url: &str, dir: &NormalizedPath) -> Result<()> {
        tracing::info!(url = %url, dir = %dir, "Cloning repository");

        if let Some(parent) = dir.parent() {
            vend_fs::io::create_dir_all(&parent)?;
        }

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(helpers::remote_callbacks());

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);
        builder
            .clone(url, &dir.to_native())
            .map_err(|e| Error::CloneFailed {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;
        Ok(())
    }

    fn is_valid_repository(&self, dir: &NormalizedPath) -> bool {
        helpers::open_worktree(dir).is_ok()
    }

    fn current_branch(&self, dir: &NormalizedPath) -> Result<Option<String>> {
        let repo = helpers::open_worktree(dir)?;
        helpers::get_current_branch(&repo)
    }

    fn current_hash(&self, dir: &NormalizedPath) -> Result<String> {
        let repo = helpers::open_worktree(dir)?;
        Ok(helpers::head_commit_id(&repo)?.to_string())
    }

    fn current_tag(&self, dir: &NormalizedPath) -> Result<Option<String>> {
        let repo = helpers::open_worktree(dir)?;
        helpers::tag_at_head(&repo)
    }

    fn remote_url(&self, dir: &NormalizedPath) -> Result<String> {
        let repo = helpers::open_worktree(dir)?;
        let remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
            name: "origin".to_string(),
        })?;
        remote
            .url()
            .map(str::to_string)
            .ok_or_else(|| Error::RemoteNotFound {
                name: "origin".to_string(),
            })
    }

    fn changes(&self, dir: &NormalizedPath, include_untracked: bool) -> Result<Vec<String>> {
        let repo = helpers::open_worktree(dir)?;
        helpers::changed_paths(&repo, include_untracked)
    }

    fn fetch(&self, dir: &NormalizedPath, url: &str, rev: &str) -> Result<()> {
        tracing::info!(url = %url, rev = %rev, "Fetching revision");
        let repo = helpers::open_worktree(dir)?;
        helpers::fetch_all(&repo, url, rev)
    }

    fn update_to(&self, dir: &NormalizedPath, rev: &str, fetch: bool, clean: bool) -> Result<()> {
        let repo = helpers::open_worktree(dir)?;
        let target = helpers::resolve_target(&repo, rev, fetch)?;
        match &target {
            Target::Branch { name, commit } => {
                tracing::info!(branch = %name, commit = %commit, "Checking out branch")
            }
            Target::Detached(commit) => {
                tracing::info!(rev = %rev, commit = %commit, "Checking out detached revision")
            }
        }
        helpers::checkout_target(&repo, &target, clean)
    }
}
