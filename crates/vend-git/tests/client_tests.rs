//! Tests for GitClient against real repositories

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vend_fs::NormalizedPath;
use vend_git::{Error, GitClient, VersionControl};
use vend_test_utils::git::{OriginRepo, fake_git_dir, real_git_repo};

fn cloned(origin: &OriginRepo) -> (TempDir, NormalizedPath) {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("sources").join("dep"));
    VersionControl::clone_into(&GitClient::new(), &origin.url(), &dir).unwrap();
    (temp, dir)
}

#[test]
fn test_clone_creates_parent_directories_and_checks_out_default_branch() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    assert!(dir.join("README.md").is_file());
    assert!(git.is_valid_repository(&dir));
    assert_eq!(git.current_branch(&dir).unwrap(), Some("main".to_string()));
    assert_eq!(git.current_hash(&dir).unwrap(), origin.head_hash());
    assert_eq!(git.remote_url(&dir).unwrap(), origin.url());
}

#[test]
fn test_clone_bad_url_fails() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("dep"));

    let result = VersionControl::clone_into(&GitClient::new(), "/definitely/not/a/repo", &dir);

    assert!(matches!(result, Err(Error::CloneFailed { .. })));
}

#[test]
fn test_plain_directory_is_not_valid() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path());
    assert!(!GitClient::new().is_valid_repository(&dir));
}

#[test]
fn test_fake_git_dir_is_not_valid() {
    let temp = TempDir::new().unwrap();
    fake_git_dir(temp.path());
    assert!(!GitClient::new().is_valid_repository(&NormalizedPath::new(temp.path())));
}

#[test]
fn test_subdirectory_of_repository_is_not_valid() {
    let temp = TempDir::new().unwrap();
    real_git_repo(temp.path());
    let nested = temp.path().join("nested");
    fs::create_dir(&nested).unwrap();

    assert!(!GitClient::new().is_valid_repository(&NormalizedPath::new(&nested)));
}

#[test]
fn test_remote_url_without_origin() {
    let temp = TempDir::new().unwrap();
    real_git_repo(temp.path());

    let result = GitClient::new().remote_url(&NormalizedPath::new(temp.path()));

    assert!(matches!(result, Err(Error::RemoteNotFound { name }) if name == "origin"));
}

#[test]
fn test_current_tag() {
    let origin = OriginRepo::new();
    origin.tag("v1.0");
    let (_temp, dir) = cloned(&origin);

    assert_eq!(
        GitClient::new().current_tag(&dir).unwrap(),
        Some("v1.0".to_string())
    );
}

#[test]
fn test_current_tag_none_when_head_untagged() {
    let origin = OriginRepo::new();
    origin.tag("v1.0");
    origin.commit_file("lib.txt", "after tag", "After tag");
    let (_temp, dir) = cloned(&origin);

    assert_eq!(GitClient::new().current_tag(&dir).unwrap(), None);
}

#[test]
fn test_has_changes_tracked_modification() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    assert!(!git.has_changes(&dir, true).unwrap());

    fs::write(dir.join("README.md").to_native(), "modified").unwrap();

    assert!(git.has_changes(&dir, false).unwrap());
    assert!(git.has_changes(&dir, true).unwrap());
}

#[test]
fn test_has_changes_untracked_only_counts_when_requested() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    fs::write(dir.join("scratch.txt").to_native(), "new").unwrap();

    assert!(!git.has_changes(&dir, false).unwrap());
    assert!(git.has_changes(&dir, true).unwrap());
}

#[test]
fn test_changes_lists_short_status() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    assert!(git.changes(&dir, true).unwrap().is_empty());

    fs::write(dir.join("README.md").to_native(), "modified").unwrap();
    fs::write(dir.join("scratch.txt").to_native(), "new").unwrap();

    assert_eq!(git.changes(&dir, false).unwrap(), vec!["M README.md"]);
    let mut all = git.changes(&dir, true).unwrap();
    all.sort();
    assert_eq!(all, vec!["?? scratch.txt", "M README.md"]);
}

#[test]
fn test_fetch_then_update_to_new_tag() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    let v2 = origin.commit_file("lib.txt", "v2", "Release 2");
    origin.tag("v2.0");

    git.fetch(&dir, &origin.url(), "v2.0").unwrap();
    git.update_to(&dir, "v2.0", false, true).unwrap();

    assert_eq!(git.current_hash(&dir).unwrap(), v2);
    assert_eq!(git.current_branch(&dir).unwrap(), None);
    assert_eq!(git.current_tag(&dir).unwrap(), Some("v2.0".to_string()));
    assert_eq!(fs::read_to_string(dir.join("lib.txt").to_native()).unwrap(), "v2");
}

#[test]
fn test_update_to_commit_hash() {
    let origin = OriginRepo::new();
    let first = origin.head_hash();
    origin.commit_file("lib.txt", "v2", "Second");
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    git.update_to(&dir, &first, false, true).unwrap();

    assert_eq!(git.current_hash(&dir).unwrap(), first);
    assert!(!dir.join("lib.txt").exists());
}

#[test]
fn test_update_branch_moves_only_with_fetch_flag() {
    let origin = OriginRepo::new();
    let first = origin.head_hash();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    let second = origin.commit_file("lib.txt", "v2", "Second");
    git.fetch(&dir, &origin.url(), "main").unwrap();

    git.update_to(&dir, "main", false, true).unwrap();
    assert_eq!(git.current_hash(&dir).unwrap(), first);

    git.update_to(&dir, "main", true, true).unwrap();
    assert_eq!(git.current_hash(&dir).unwrap(), second);
    assert_eq!(git.current_branch(&dir).unwrap(), Some("main".to_string()));
}

#[test]
fn test_update_creates_local_branch_from_remote() {
    let origin = OriginRepo::new();
    origin.branch("develop");
    origin.checkout_branch("develop");
    let develop = origin.commit_file("dev.txt", "dev", "Develop work");
    origin.checkout_branch("main");
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    git.update_to(&dir, "develop", false, true).unwrap();

    assert_eq!(git.current_branch(&dir).unwrap(), Some("develop".to_string()));
    assert_eq!(git.current_hash(&dir).unwrap(), develop);
}

#[test]
fn test_clean_update_discards_changes_and_untracked_files() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    fs::write(dir.join("README.md").to_native(), "modified").unwrap();
    fs::write(dir.join("scratch.txt").to_native(), "untracked").unwrap();

    git.update_to(&dir, "main", false, true).unwrap();

    assert_eq!(
        fs::read_to_string(dir.join("README.md").to_native()).unwrap(),
        "# Origin\n"
    );
    assert!(!dir.join("scratch.txt").exists());
    assert!(!git.has_changes(&dir, true).unwrap());
}

#[test]
fn test_safe_update_keeps_untracked_files() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);
    let git = GitClient::new();

    fs::write(dir.join("scratch.txt").to_native(), "untracked").unwrap();

    git.update_to(&dir, "main", false, false).unwrap();

    assert!(dir.join("scratch.txt").is_file());
}

#[test]
fn test_update_unknown_revision() {
    let origin = OriginRepo::new();
    let (_temp, dir) = cloned(&origin);

    let result = GitClient::new().update_to(&dir, "missing-branch", false, true);

    assert!(matches!(result, Err(Error::RevisionNotFound { .. })));
}
