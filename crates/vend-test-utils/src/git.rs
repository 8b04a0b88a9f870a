//! Git repository fixtures.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs.

use std::fs;
use std::path::Path;

use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE**: directory structure only, no object store.
/// `git2` refuses to open it, which makes it the fixture of choice for
/// "directory exists but is not a valid repository" cases.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` (no initial commit).
///
/// Realism level: **REAL**: valid git object store, empty history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Signature used for every fixture commit.
pub fn test_signature() -> Signature<'static> {
    Signature::now("Test User", "test@test.com")
        .unwrap_or_else(|e| panic!("test_signature: {e}"))
}

/// An upstream repository that tests clone from.
///
/// Realism level: **REAL WITH HISTORY**: initialised on `main` with a
/// `README.md` commit. The URL is the local filesystem path, which both
/// `git2` and the `git` CLI accept as a clone source.
///
/// # Example
///
/// ```rust,no_run
/// use vend_test_utils::git::OriginRepo;
///
/// let origin = OriginRepo::new();
/// let v1 = origin.commit_file("lib.txt", "v1", "Release 1");
/// origin.tag("v1.0");
/// assert_eq!(origin.head_hash(), v1);
/// ```
pub struct OriginRepo {
    repo: Repository,
    temp_dir: TempDir,
}

impl Default for OriginRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginRepo {
    /// Create an origin repository on `main` with one commit.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("OriginRepo: tempdir: {e}"));
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(temp_dir.path(), &opts)
            .unwrap_or_else(|e| panic!("OriginRepo: failed to init repository: {e}"));

        let origin = Self { repo, temp_dir };
        origin.commit_file("README.md", "# Origin\n", "Initial commit");
        origin
    }

    /// Filesystem path of the repository.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// URL to use as a source `repo`.
    pub fn url(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }

    /// Access the underlying `git2` repository.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Write `relative` with `content` and commit it on the current branch.
    ///
    /// Returns the full hash of the new commit.
    pub fn commit_file(&self, relative: &str, content: &str, message: &str) -> String {
        let full_path = self.path().join(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("commit_file: create {}: {e}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("commit_file: write {}: {e}", full_path.display()));

        let mut index = self.repo.index().expect("commit_file: open index");
        index
            .add_path(Path::new(relative))
            .expect("commit_file: stage file");
        index.write().expect("commit_file: write index");
        let tree_id = index.write_tree().expect("commit_file: write tree");
        let tree = self.repo.find_tree(tree_id).expect("commit_file: find tree");

        let signature = test_signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("commit_file: commit")
            .to_string()
    }

    /// Create a lightweight tag at HEAD and return the tagged hash.
    pub fn tag(&self, name: &str) -> String {
        let head = self.head_commit();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap_or_else(|e| panic!("tag: failed to create {name}: {e}"));
        head.id().to_string()
    }

    /// Create a branch at HEAD without switching to it.
    pub fn branch(&self, name: &str) {
        let head = self.head_commit();
        self.repo
            .branch(name, &head, false)
            .unwrap_or_else(|e| panic!("branch: failed to create {name}: {e}"));
    }

    /// Switch the origin's HEAD to an existing branch.
    pub fn checkout_branch(&self, name: &str) {
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .unwrap_or_else(|e| panic!("checkout_branch: {name}: {e}"));
        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
            .unwrap_or_else(|e| panic!("checkout_branch: checkout {name}: {e}"));
    }

    /// Full hash of the current HEAD commit.
    pub fn head_hash(&self) -> String {
        self.head_commit().id().to_string()
    }

    fn head_commit(&self) -> git2::Commit<'_> {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .unwrap_or_else(|e| panic!("OriginRepo: HEAD has no commit: {e}"))
    }
}

/// Clone `url` into `dest` with `git2`, bypassing the code under test.
///
/// # Panics
/// Panics if the clone fails.
pub fn clone_repo(url: &str, dest: &Path) -> Repository {
    Repository::clone(url, dest)
        .unwrap_or_else(|e| panic!("clone_repo: failed to clone {url}: {e}"))
}
