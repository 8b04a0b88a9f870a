//! Shared git2 helper functions
//!
//! These functions encapsulate the git2 patterns behind [`crate::GitClient`]:
//! opening a working tree, inspecting HEAD, fetching and checking out a
//! revision.

use std::cell::Cell;

use git2::{
    AutotagOption, BranchType, Cred, CredentialType, FetchOptions, Oid, RemoteCallbacks,
    Repository, Status, StatusOptions, build::CheckoutBuilder,
};
use vend_fs::NormalizedPath;

use crate::{Error, Result};

/// Refspecs fetched for every update: all branches into `origin/*` and
/// all tags.
pub const FETCH_REFSPECS: [&str; 2] = [
    "+refs/heads/*:refs/remotes/origin/*",
    "+refs/tags/*:refs/tags/*",
];

const MAX_AUTH_ATTEMPTS: u32 = 3;

/// Where a revision resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A branch to check out attached, at the given commit.
    Branch { name: String, commit: Oid },
    /// A tag or commit to check out with a detached HEAD.
    Detached(Oid),
}

/// Open the working tree rooted exactly at `dir`.
///
/// Parent directories are not searched, so a plain directory nested inside
/// some other repository is still rejected.
pub fn open_worktree(dir: &NormalizedPath) -> Result<Repository> {
    let not_a_repository = || Error::NotARepository {
        path: dir.to_native(),
    };
    let repo = Repository::open(dir.to_native()).map_err(|_| not_a_repository())?;
    if repo.is_bare() {
        return Err(not_a_repository());
    }
    Ok(repo)
}

/// Get the current branch name from a repository.
///
/// Returns the branch name if HEAD points to a branch, or `None` if HEAD is detached.
pub fn get_current_branch(repo: &Repository) -> Result<Option<String>> {
    let head = repo.head()?;

    if head.is_branch() {
        Ok(head.shorthand().map(str::to_string))
    } else {
        Ok(None)
    }
}

/// Id of the commit HEAD points at.
pub fn head_commit_id(repo: &Repository) -> Result<Oid> {
    Ok(repo.head()?.peel_to_commit()?.id())
}

/// First tag, by name, that peels to the HEAD commit.
pub fn tag_at_head(repo: &Repository) -> Result<Option<String>> {
    let head = head_commit_id(repo)?;
    let names = repo.tag_names(None)?;
    let mut names: Vec<&str> = names.iter().flatten().collect();
    names.sort_unstable();

    for name in names {
        if let Ok(object) = repo.revparse_single(&format!("refs/tags/{name}"))
            && let Ok(commit) = object.peel_to_commit()
            && commit.id() == head
        {
            return Ok(Some(name.to_string()));
        }
    }
    Ok(None)
}

/// Short status lines for every entry that differs from HEAD.
///
/// Ignored files never count; untracked files count when requested.
pub fn changed_paths(repo: &Repository, include_untracked: bool) -> Result<Vec<String>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(include_untracked)
        .recurse_untracked_dirs(include_untracked)
        .include_ignored(false)
        .exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    Ok(statuses
        .iter()
        .filter(|entry| {
            let status = entry.status();
            status != Status::CURRENT && !status.contains(Status::IGNORED)
        })
        .map(|entry| {
            let path = entry.path().unwrap_or("<non-utf8 path>");
            format!("{} {path}", status_code(entry.status()))
        })
        .collect())
}

fn status_code(status: Status) -> &'static str {
    if status.contains(Status::WT_NEW) {
        "??"
    } else if status.contains(Status::INDEX_NEW) {
        "A"
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        "D"
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        "R"
    } else {
        "M"
    }
}

/// Credential callbacks delegating to the SSH agent and git credential
/// helpers.
pub fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let attempts = Cell::new(0u32);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_AUTH_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }
        Cred::default()
    });
    callbacks
}

/// Fetch every branch and tag from `url` into `repo`.
pub fn fetch_all(repo: &Repository, url: &str, rev: &str) -> Result<()> {
    let mut remote = repo.remote_anonymous(url)?;

    let mut opts = FetchOptions::new();
    opts.remote_callbacks(remote_callbacks());
    opts.download_tags(AutotagOption::All);

    remote
        .fetch(&FETCH_REFSPECS, Some(&mut opts), Some(&format!("vend: fetch {rev}")))
        .map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            rev: rev.to_string(),
            message: e.message().to_string(),
        })
}

/// Resolve `rev` to something that can be checked out.
///
/// Order: the remote branch when `prefer_remote`, the local branch, the
/// remote branch, a tag, then any revspec git understands (hashes included).
pub fn resolve_target(repo: &Repository, rev: &str, prefer_remote: bool) -> Result<Target> {
    let remote = repo
        .find_reference(&format!("refs/remotes/origin/{rev}"))
        .ok()
        .and_then(|r| r.peel_to_commit().ok())
        .map(|c| c.id());
    let local = repo
        .find_branch(rev, BranchType::Local)
        .ok()
        .and_then(|b| b.get().peel_to_commit().ok())
        .map(|c| c.id());

    let branch_commit = match (prefer_remote, local, remote) {
        (true, _, Some(commit)) => Some(commit),
        (_, Some(commit), _) => Some(commit),
        (_, None, Some(commit)) => Some(commit),
        _ => None,
    };
    if let Some(commit) = branch_commit {
        return Ok(Target::Branch {
            name: rev.to_string(),
            commit,
        });
    }

    if let Ok(tag) = repo.find_reference(&format!("refs/tags/{rev}"))
        && let Ok(commit) = tag.peel_to_commit()
    {
        return Ok(Target::Detached(commit.id()));
    }

    if let Ok(object) = repo.revparse_single(rev)
        && let Ok(commit) = object.peel_to_commit()
    {
        return Ok(Target::Detached(commit.id()));
    }

    Err(Error::RevisionNotFound {
        rev: rev.to_string(),
    })
}

/// Check out `target` and move HEAD to it.
///
/// With `clean` the working tree is forced to match the target (tracked
/// modifications reset, untracked and ignored files removed); otherwise a
/// safe checkout keeps local modifications and fails on conflicts.
pub fn checkout_target(repo: &Repository, target: &Target, clean: bool) -> Result<()> {
    let commit_id = match target {
        Target::Branch { commit, .. } => *commit,
        Target::Detached(commit) => *commit,
    };
    let commit = repo.find_commit(commit_id)?;

    let mut checkout = CheckoutBuilder::new();
    if clean {
        checkout.force().remove_untracked(true).remove_ignored(true);
    } else {
        checkout.safe();
    }
    repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;

    match target {
        Target::Branch { name, commit } => {
            let refname = format!("refs/heads/{name}");
            repo.reference(&refname, *commit, true, &format!("vend: update {name}"))?;
            repo.set_head(&refname)?;
        }
        Target::Detached(commit) => {
            repo.set_head_detached(*commit)?;
        }
    }

    Ok(())
}
