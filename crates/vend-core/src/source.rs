//! Source dependencies and their synchronization
//!
//! A [`Source`] names one external repository, the revision it should sit
//! at, an optional symbolic link exposing it, and scripts to run after it is
//! synchronized. The operations here converge a single working tree:
//!
//! 1. [`Source::update_files`] clones or updates the tree
//! 2. [`Source::create_link`] exposes it at the requested path
//! 3. [`Source::run_scripts`] runs post-sync commands in it
//!
//! [`Source::identify`] and [`Source::lock`] inspect a tree without
//! changing it.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vend_fs::{NormalizedPath, io, link, relative_path};

use crate::context::SyncContext;
use crate::error::{Error, Result};
use crate::reporter::Style;

/// Revision used when a source does not name one.
pub const DEFAULT_REV: &str = "master";

/// Raw manifest entry, validated into a [`Source`].
#[derive(Debug, Deserialize)]
struct SourceEntry {
    #[serde(default)]
    repo: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_rev")]
    rev: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    scripts: Vec<String>,
}

fn default_rev() -> String {
    DEFAULT_REV.to_string()
}

/// A dependency on one external repository.
///
/// `repo` and `name` are never empty; construction and deserialization both
/// reject such entries. Equality compares every field; use
/// [`Source::same_name`] and [`Source::cmp_by_name`] for the name-only
/// identity the manifest uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SourceEntry")]
pub struct Source {
    name: String,
    repo: String,
    rev: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scripts: Vec<String>,
}

impl TryFrom<SourceEntry> for Source {
    type Error = Error;

    fn try_from(entry: SourceEntry) -> Result<Self> {
        Ok(Source::new(entry.repo, entry.name)?
            .with_rev(entry.rev)
            .with_link(entry.link)
            .with_scripts(entry.scripts))
    }
}

/// Options for [`Source::update_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Proceed even if the working tree has uncommitted changes.
    pub force: bool,
    /// Always fetch, and move branches to the fetched remote tip.
    pub fetch: bool,
    /// Discard local modifications and untracked files.
    pub clean: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            force: false,
            fetch: false,
            clean: true,
        }
    }
}

/// What [`Source::create_link`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The source has no `link`.
    NotRequested,
    /// Symbolic links are disabled for this context.
    Skipped,
    /// A link now exists at this path.
    Created(NormalizedPath),
}

/// Revision found in a working tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Revision {
    Commit(String),
    Dirty,
    Unknown,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit(hash) => write!(f, "{hash}"),
            Self::Dirty => write!(f, "{}", Source::DIRTY),
            Self::Unknown => write!(f, "{}", Source::UNKNOWN),
        }
    }
}

/// Where a source's working tree is and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub path: NormalizedPath,
    pub url: String,
    pub revision: Revision,
}

impl Source {
    /// Revision marker for a tree with uncommitted changes.
    pub const DIRTY: &'static str = "<dirty>";
    /// Revision marker for a tree that could not be inspected.
    pub const UNKNOWN: &'static str = "<unknown>";
    /// URL marker for a tree that does not exist.
    pub const MISSING: &'static str = "<missing>";

    /// Create a source tracking [`DEFAULT_REV`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `repo` or `name` is empty.
    pub fn new(repo: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let repo = repo.into();
        let name = name.into();
        if repo.is_empty() {
            return Err(Error::invalid_config(format!(
                "'repo' missing on source '{name}'"
            )));
        }
        if name.is_empty() {
            return Err(Error::invalid_config(format!(
                "'name' missing on source from '{repo}'"
            )));
        }
        Ok(Self {
            name,
            repo,
            rev: default_rev(),
            link: None,
            scripts: Vec::new(),
        })
    }

    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = rev.into();
        self
    }

    /// Set the link path; trailing separators are dropped and an empty path
    /// means no link.
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link
            .map(|l| l.trim_end_matches(['/', '\\']).to_string())
            .filter(|l| !l.is_empty());
        self
    }

    pub fn with_scripts(mut self, scripts: Vec<String>) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn rev(&self) -> &str {
        &self.rev
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Order sources by name only.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }

    /// Whether two sources share a name, whatever else differs.
    pub fn same_name(&self, other: &Self) -> bool {
        self.name == other.name
    }

    /// Keep the first source of each name, preserving order.
    pub fn dedup_by_name(sources: impl IntoIterator<Item = Source>) -> Vec<Source> {
        let mut unique: Vec<Source> = Vec::new();
        for source in sources {
            if !unique.iter().any(|s| s.same_name(&source)) {
                unique.push(source);
            }
        }
        unique
    }

    /// Working tree of this source inside `ctx`.
    pub fn working_tree(&self, ctx: &SyncContext) -> NormalizedPath {
        ctx.root().join(&self.name)
    }

    /// Where the link lives: `link` itself when absolute, otherwise under
    /// `link_root`. `None` when the source has no link.
    pub fn link_target(&self, link_root: &NormalizedPath) -> Option<NormalizedPath> {
        let link = self.link.as_deref()?;
        Some(if Path::new(link).is_absolute() {
            NormalizedPath::new(link)
        } else {
            link_root.join(link)
        })
    }

    /// Clone or update the working tree to `rev`.
    ///
    /// A missing tree is cloned first. An existing tree must be a valid
    /// repository and, unless `force`, free of uncommitted changes (untracked
    /// files count when `clean`). Fetching is skipped when the tree already
    /// sits at `rev` by branch, hash or tag, unless `fetch` demands it.
    pub fn update_files(&self, ctx: &SyncContext, options: &UpdateOptions) -> Result<()> {
        tracing::info!(source = %self.name, "Updating source files...");
        let git = ctx.git();
        let dir = self.working_tree(ctx);

        if !dir.exists() {
            io::create_dir_all(ctx.root())?;
            git.clone_into(&self.repo, &dir)?;
        }

        if !git.is_valid_repository(&dir) {
            return Err(invalid_repository(&dir));
        }

        if !options.force {
            tracing::debug!(dir = %dir, "Confirming there are no uncommitted changes...");
            let changes = git.changes(&dir, options.clean)?;
            if !changes.is_empty() {
                ctx.reporter().show(&changes, Style::Changes);
                return Err(Error::UncommittedChanges {
                    path: absolute(&dir),
                });
            }
        }

        if options.fetch || !self.is_checked_out(ctx, &dir)? {
            git.fetch(&dir, &self.repo, &self.rev)?;
        } else {
            tracing::debug!(rev = %self.rev, "Already at revision, skipping fetch");
        }

        git.update_to(&dir, &self.rev, options.fetch, options.clean)?;
        Ok(())
    }

    fn is_checked_out(&self, ctx: &SyncContext, dir: &NormalizedPath) -> Result<bool> {
        let git = ctx.git();
        if git.current_branch(dir)?.as_deref() == Some(self.rev.as_str()) {
            return Ok(true);
        }
        if git.current_hash(dir)? == self.rev {
            return Ok(true);
        }
        Ok(git.current_tag(dir)?.as_deref() == Some(self.rev.as_str()))
    }

    /// Expose the working tree through a symbolic link at
    /// `link_root/link`.
    ///
    /// The link content is relative, so the project can move as a whole. An
    /// existing symbolic link is always replaced; any other entry is removed
    /// only with `force`.
    pub fn create_link(
        &self,
        ctx: &SyncContext,
        link_root: &NormalizedPath,
        force: bool,
    ) -> Result<LinkOutcome> {
        let Some(target) = self.link_target(link_root) else {
            return Ok(LinkOutcome::NotRequested);
        };
        if !ctx.symlinks() {
            tracing::warn!(source = %self.name, link = %target, "Symbolic links unavailable, skipping link");
            return Ok(LinkOutcome::Skipped);
        }
        tracing::info!(source = %self.name, "Creating a symbolic link...");

        if link::is_symlink(&target) {
            link::remove_symlink(&target)?;
        } else if link::is_occupied(&target) {
            if !force {
                return Err(Error::LinkOccupied {
                    path: absolute(&target),
                });
            }
            io::remove_path(&target)?;
        }

        let parent = match target.parent() {
            Some(parent) => parent,
            None => link_root.clone(),
        };
        io::create_dir_all(&parent)?;

        let parent = resolved(&parent)?;
        let tree = resolved(&self.working_tree(ctx))?;
        let content = relative_path(parent.to_native(), tree.to_native());
        link::create_symlink(&content, &target)?;

        Ok(LinkOutcome::Created(target))
    }

    /// Run every script in order inside the working tree.
    ///
    /// Stops at the first failing script; its output is reported and the
    /// remaining scripts never run.
    pub fn run_scripts(&self, ctx: &SyncContext) -> Result<()> {
        if self.scripts.is_empty() {
            return Ok(());
        }
        tracing::info!(source = %self.name, "Running install scripts...");

        let dir = self.working_tree(ctx);
        if !ctx.git().is_valid_repository(&dir) {
            return Err(invalid_repository(&dir));
        }

        for script in &self.scripts {
            match ctx.shell().run(script, &dir) {
                Ok(lines) => ctx.reporter().show(&lines, Style::ShellOutput),
                Err(error @ crate::shell::ShellError::Spawn { .. }) => {
                    return Err(Error::Shell(error));
                }
                Err(error) => {
                    ctx.reporter().show(error.output(), Style::ShellError);
                    return Err(Error::ScriptFailure {
                        command: script.clone(),
                        dir: absolute(&dir),
                    });
                }
            }
        }
        Ok(())
    }

    /// Report where the working tree is, its remote and its revision.
    ///
    /// A missing tree yields [`Revision::Unknown`] when `allow_missing`; a
    /// tree with changes (untracked files included) yields
    /// [`Revision::Dirty`] when `allow_dirty`.
    pub fn identify(
        &self,
        ctx: &SyncContext,
        allow_dirty: bool,
        allow_missing: bool,
    ) -> Result<Identity> {
        let git = ctx.git();
        let dir = self.working_tree(ctx);

        if !dir.is_dir() {
            if allow_missing {
                return Ok(Identity {
                    path: NormalizedPath::new(absolute(ctx.root())),
                    url: Self::MISSING.to_string(),
                    revision: Revision::Unknown,
                });
            }
            return Err(invalid_repository(&dir));
        }

        if !git.is_valid_repository(&dir) {
            return Err(invalid_repository(&dir));
        }

        let path = NormalizedPath::new(absolute(&dir));
        let url = git.remote_url(&dir)?;

        let changes = git.changes(&dir, true)?;
        if !changes.is_empty() {
            if !allow_dirty {
                ctx.reporter().show(&changes, Style::Changes);
                return Err(Error::UncommittedChanges {
                    path: path.to_native(),
                });
            }
            ctx.reporter().show(&[Self::DIRTY.to_string()], Style::Dirty);
            return Ok(Identity {
                path,
                url,
                revision: Revision::Dirty,
            });
        }

        let hash = git.current_hash(&dir)?;
        ctx.reporter().show(std::slice::from_ref(&hash), Style::Rev);
        Ok(Identity {
            path,
            url,
            revision: Revision::Commit(hash),
        })
    }

    /// A copy of this source pinned to `rev`, or to the working tree's
    /// current commit when `rev` is `None`.
    ///
    /// Without `rev` the tree must exist and be clean. Scripts are kept so
    /// installing from the locked copy runs the same steps.
    pub fn lock(&self, ctx: &SyncContext, rev: Option<&str>) -> Result<Source> {
        let rev = match rev {
            Some(rev) => rev.to_string(),
            None => self.identify(ctx, false, false)?.revision.to_string(),
        };
        Ok(self.clone().with_rev(rev))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ '{}' in '{}'", self.repo, self.rev, self.name)?;
        if let Some(link) = &self.link {
            write!(f, " <- '{link}'")?;
        }
        Ok(())
    }
}

fn absolute(path: &NormalizedPath) -> std::path::PathBuf {
    path.absolute().unwrap_or_else(|_| path.clone()).to_native()
}

fn invalid_repository(dir: &NormalizedPath) -> Error {
    Error::InvalidRepository {
        path: absolute(dir),
    }
}

/// Canonical form of `path`, falling back to the absolute path for entries
/// that do not exist yet.
fn resolved(path: &NormalizedPath) -> Result<NormalizedPath> {
    match path.canonicalize() {
        Ok(canonical) => Ok(canonical),
        Err(_) => Ok(path.absolute()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use vend_git::VersionControl;

    /// In-memory version control that records calls.
    #[derive(Debug, Default)]
    struct FakeGit {
        state: Mutex<FakeState>,
    }

    #[derive(Debug, Default)]
    struct FakeState {
        branch: Option<String>,
        hash: String,
        tag: Option<String>,
        dirty: bool,
        clones: usize,
        fetches: usize,
        updates: Vec<String>,
    }

    impl FakeGit {
        fn at(branch: Option<&str>, hash: &str, tag: Option<&str>) -> Self {
            Self {
                state: Mutex::new(FakeState {
                    branch: branch.map(str::to_string),
                    hash: hash.to_string(),
                    tag: tag.map(str::to_string),
                    ..FakeState::default()
                }),
            }
        }

        fn set_dirty(&self, dirty: bool) {
            self.state.lock().unwrap().dirty = dirty;
        }

        fn fetches(&self) -> usize {
            self.state.lock().unwrap().fetches
        }

        fn clones(&self) -> usize {
            self.state.lock().unwrap().clones
        }

        fn updates(&self) -> Vec<String> {
            self.state.lock().unwrap().updates.clone()
        }
    }

    impl VersionControl for FakeGit {
        fn clone_into(&self, _url: &str, dir: &NormalizedPath) -> vend_git::Result<()> {
            std::fs::create_dir_all(dir.to_native()).unwrap();
            self.state.lock().unwrap().clones += 1;
            Ok(())
        }

        fn is_valid_repository(&self, dir: &NormalizedPath) -> bool {
            dir.is_dir()
        }

        fn current_branch(&self, _dir: &NormalizedPath) -> vend_git::Result<Option<String>> {
            Ok(self.state.lock().unwrap().branch.clone())
        }

        fn current_hash(&self, _dir: &NormalizedPath) -> vend_git::Result<String> {
            Ok(self.state.lock().unwrap().hash.clone())
        }

        fn current_tag(&self, _dir: &NormalizedPath) -> vend_git::Result<Option<String>> {
            Ok(self.state.lock().unwrap().tag.clone())
        }

        fn remote_url(&self, _dir: &NormalizedPath) -> vend_git::Result<String> {
            Ok("https://example/repo.git".to_string())
        }

        fn changes(
            &self,
            _dir: &NormalizedPath,
            _include_untracked: bool,
        ) -> vend_git::Result<Vec<String>> {
            if self.state.lock().unwrap().dirty {
                Ok(vec!["M lib.txt".to_string()])
            } else {
                Ok(Vec::new())
            }
        }

        fn fetch(&self, _dir: &NormalizedPath, _url: &str, _rev: &str) -> vend_git::Result<()> {
            self.state.lock().unwrap().fetches += 1;
            Ok(())
        }

        fn update_to(
            &self,
            _dir: &NormalizedPath,
            rev: &str,
            _fetch: bool,
            _clean: bool,
        ) -> vend_git::Result<()> {
            let mut state = self.state.lock().unwrap();
            state.updates.push(rev.to_string());
            state.tag = Some(rev.to_string());
            Ok(())
        }
    }

    fn context(git: Arc<FakeGit>) -> (TempDir, SyncContext) {
        let temp = TempDir::new().unwrap();
        let ctx = SyncContext::new(temp.path())
            .with_git(git)
            .with_reporter(Arc::new(RecordingReporter::new()));
        (temp, ctx)
    }

    fn dep(rev: &str) -> Source {
        Source::new("https://example/repo.git", "dep")
            .unwrap()
            .with_rev(rev)
    }

    #[test]
    fn test_new_defaults() {
        let source = Source::new("https://example/repo.git", "dep").unwrap();
        assert_eq!(source.rev(), "master");
        assert_eq!(source.link(), None);
        assert!(source.scripts().is_empty());
    }

    #[test]
    fn test_new_rejects_empty_repo() {
        let result = Source::new("", "dep");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_rejects_empty_name() {
        let result = Source::new("https://example/repo.git", "");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    proptest! {
        #[test]
        fn prop_construction_requires_repo_and_name(repo in ".{0,12}", name in ".{0,12}") {
            let result = Source::new(repo.clone(), name.clone());
            if repo.is_empty() || name.is_empty() {
                prop_assert!(matches!(result, Err(Error::InvalidConfig { .. })), "expected InvalidConfig error");
            } else {
                let source = result.unwrap();
                prop_assert_eq!(source.repo(), repo.as_str());
                prop_assert_eq!(source.name(), name.as_str());
            }
        }
    }

    #[test]
    fn test_display() {
        let plain = dep("v1.0");
        assert_eq!(
            plain.to_string(),
            "'https://example/repo.git' @ 'v1.0' in 'dep'"
        );

        let linked = plain.with_link(Some("deps/dep".into()));
        assert_eq!(
            linked.to_string(),
            "'https://example/repo.git' @ 'v1.0' in 'dep' <- 'deps/dep'"
        );
    }

    #[rstest::rstest]
    #[case("deps/dep/", Some("deps/dep"))]
    #[case("deps\\dep\\", Some("deps\\dep"))]
    #[case("deps/dep", Some("deps/dep"))]
    #[case("/", None)]
    #[case("", None)]
    fn test_with_link_drops_trailing_separators(
        #[case] link: &str,
        #[case] expected: Option<&str>,
    ) {
        let source = dep("main").with_link(Some(link.to_string()));
        assert_eq!(source.link(), expected);
    }

    #[test]
    fn test_deserialized_link_drops_trailing_separator() {
        let source: Source =
            serde_yaml::from_str("repo: https://example/repo.git\nname: dep\nlink: deps/dep/\n")
                .unwrap();
        assert_eq!(source.link(), Some("deps/dep"));
        assert_eq!(
            source.link_target(&NormalizedPath::new("/project")),
            Some(NormalizedPath::new("/project/deps/dep"))
        );
    }

    #[test]
    fn test_name_identity_vs_structural_equality() {
        let a = dep("v1.0");
        let b = Source::new("https://other/repo.git", "dep").unwrap();
        let c = Source::new("https://other/repo.git", "another").unwrap();

        assert!(a.same_name(&b));
        assert_ne!(a, b);
        assert_eq!(a.cmp_by_name(&b), Ordering::Equal);
        assert_eq!(c.cmp_by_name(&a), Ordering::Less);
    }

    #[test]
    fn test_dedup_by_name_keeps_first() {
        let first = dep("v1.0");
        let second = dep("v2.0");
        let other = Source::new("https://example/other.git", "other").unwrap();

        let unique = Source::dedup_by_name(vec![first.clone(), other.clone(), second]);

        assert_eq!(unique, vec![first, other]);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let source: Source =
            serde_yaml::from_str("name: dep\nrepo: https://example/repo.git\n").unwrap();
        assert_eq!(source.rev(), DEFAULT_REV);
    }

    #[test]
    fn test_deserialize_validates() {
        let result: std::result::Result<Source, _> = serde_yaml::from_str("name: dep\nrepo: ''\n");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("'repo' missing"), "{message}");
    }

    #[test]
    fn test_revision_display() {
        assert_eq!(Revision::Commit("abc".into()).to_string(), "abc");
        assert_eq!(Revision::Dirty.to_string(), "<dirty>");
        assert_eq!(Revision::Unknown.to_string(), "<unknown>");
    }

    #[test]
    fn test_update_files_clones_missing_tree() {
        let git = Arc::new(FakeGit::at(Some("main"), "abc", None));
        let (_temp, ctx) = context(git.clone());

        dep("v1.0")
            .update_files(&ctx, &UpdateOptions::default())
            .unwrap();

        assert_eq!(git.clones(), 1);
        assert_eq!(git.fetches(), 1);
        assert_eq!(git.updates(), vec!["v1.0"]);
    }

    #[test]
    fn test_update_files_twice_fetches_once() {
        let git = Arc::new(FakeGit::at(Some("main"), "abc", None));
        let (_temp, ctx) = context(git.clone());
        let source = dep("v1.0");

        source.update_files(&ctx, &UpdateOptions::default()).unwrap();
        source.update_files(&ctx, &UpdateOptions::default()).unwrap();

        assert_eq!(git.clones(), 1);
        assert_eq!(git.fetches(), 1);
        assert_eq!(git.updates(), vec!["v1.0", "v1.0"]);
    }

    #[rstest::rstest]
    #[case::branch(Some("main"), "abc", None, "main")]
    #[case::hash(None, "abc123", None, "abc123")]
    #[case::tag(None, "abc", Some("v1.0"), "v1.0")]
    fn test_update_files_skips_fetch_when_checked_out(
        #[case] branch: Option<&str>,
        #[case] hash: &str,
        #[case] tag: Option<&str>,
        #[case] rev: &str,
    ) {
        let git = Arc::new(FakeGit::at(branch, hash, tag));
        let (_temp, ctx) = context(git.clone());
        std::fs::create_dir_all(ctx.root().join("dep").to_native()).unwrap();

        dep(rev).update_files(&ctx, &UpdateOptions::default()).unwrap();

        assert_eq!(git.fetches(), 0);
    }

    #[test]
    fn test_update_files_fetch_flag_always_fetches() {
        let git = Arc::new(FakeGit::at(Some("main"), "abc", None));
        let (_temp, ctx) = context(git.clone());
        std::fs::create_dir_all(ctx.root().join("dep").to_native()).unwrap();
        let options = UpdateOptions {
            fetch: true,
            ..UpdateOptions::default()
        };

        dep("main").update_files(&ctx, &options).unwrap();

        assert_eq!(git.fetches(), 1);
    }

    #[test]
    fn test_update_files_dirty_gate() {
        let git = Arc::new(FakeGit::at(Some("main"), "abc", None));
        let (_temp, ctx) = context(git.clone());
        std::fs::create_dir_all(ctx.root().join("dep").to_native()).unwrap();
        git.set_dirty(true);

        let result = dep("main").update_files(&ctx, &UpdateOptions::default());
        assert!(matches!(result, Err(Error::UncommittedChanges { .. })));
        assert!(git.updates().is_empty());

        let forced = UpdateOptions {
            force: true,
            ..UpdateOptions::default()
        };
        dep("main").update_files(&ctx, &forced).unwrap();
        assert_eq!(git.updates(), vec!["main"]);
    }

    #[test]
    fn test_update_files_rejects_invalid_tree() {
        let git = Arc::new(FakeGit::default());
        let (_temp, ctx) = context(git);
        // A file where the tree should be is not a repository
        std::fs::write(ctx.root().join("dep").to_native(), "not a dir").unwrap();

        let result = dep("main").update_files(&ctx, &UpdateOptions::default());

        assert!(matches!(result, Err(Error::InvalidRepository { .. })));
    }

    #[test]
    fn test_lock_with_explicit_rev_keeps_other_fields() {
        let git = Arc::new(FakeGit::default());
        let (_temp, ctx) = context(git);
        let source = dep("main")
            .with_link(Some("deps/dep".into()))
            .with_scripts(vec!["make".into()]);

        let locked = source.lock(&ctx, Some("abc123")).unwrap();

        assert_eq!(locked.rev(), "abc123");
        assert_eq!(locked.name(), source.name());
        assert_eq!(locked.repo(), source.repo());
        assert_eq!(locked.link(), source.link());
        assert_eq!(locked.scripts(), source.scripts());
        assert_eq!(source.rev(), "main");
    }

    #[test]
    fn test_create_link_not_requested() {
        let git = Arc::new(FakeGit::default());
        let (_temp, ctx) = context(git);

        let outcome = dep("main").create_link(&ctx, ctx.root(), false).unwrap();

        assert_eq!(outcome, LinkOutcome::NotRequested);
    }

    #[test]
    fn test_create_link_skipped_without_capability() {
        let git = Arc::new(FakeGit::default());
        let (_temp, ctx) = context(git);
        let ctx = ctx.with_symlinks(false);
        let source = dep("main").with_link(Some("deps/dep".into()));

        let outcome = source.create_link(&ctx, ctx.root(), false).unwrap();

        assert_eq!(outcome, LinkOutcome::Skipped);
        assert!(!ctx.root().join("deps").exists());
    }
}
