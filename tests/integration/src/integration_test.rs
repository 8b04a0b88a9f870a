//! End-to-end integration tests for the synchronization flow
//!
//! These tests exercise the complete flow across crates:
//! manifest loading -> clone/update -> link -> scripts -> identify/lock.

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vend_core::{
    InstallOptions, RecordingReporter, Revision, Source, SyncContext, UpdateOptions, Workspace,
};
use vend_fs::NormalizedPath;
use vend_git::GitClient;
use vend_test_utils::git::OriginRepo;
use vend_test_utils::workspace::TestWorkspace;

#[test]
fn test_clone_tag_and_identify() {
    let origin = OriginRepo::new();
    let tagged = origin.commit_file("lib.txt", "v1", "Release 1");
    origin.tag("v1.0");
    origin.commit_file("lib.txt", "v2-dev", "Start v2");

    let temp = TempDir::new().unwrap();
    let ctx = SyncContext::new(temp.path());
    let source = Source::new(origin.url(), "dep").unwrap().with_rev("v1.0");

    source
        .update_files(&ctx, &UpdateOptions::default())
        .unwrap();
    let identity = source.identify(&ctx, false, false).unwrap();

    assert_eq!(identity.revision, Revision::Commit(tagged));
    assert_eq!(identity.path, NormalizedPath::new(temp.path().join("dep")));
}

#[test]
fn test_install_lock_update_reinstall() {
    let origin = OriginRepo::new();
    let first = origin.head_hash();
    let ws = TestWorkspace::new();
    ws.write_single_source("dep", &origin.url(), "main");
    let reporter = Arc::new(RecordingReporter::new());
    let mut workspace = Workspace::open(ws.root())
        .unwrap()
        .with_context(SyncContext::new(ws.root()).with_reporter(reporter.clone()));

    workspace.install(&InstallOptions::default()).unwrap();
    workspace.lock(&[]).unwrap();

    let second = origin.commit_file("lib.txt", "v2", "Second");
    workspace.update(&InstallOptions::default(), false).unwrap();
    let listed = workspace.list(false).unwrap();
    assert_eq!(listed[0].revision, Revision::Commit(second));

    // Locked revisions win over the moved branch
    workspace.install(&InstallOptions::default()).unwrap();
    let listed = workspace.list(false).unwrap();
    assert_eq!(listed[0].revision, Revision::Commit(first.clone()));
    ws.assert_file_not_exists("vend_sources/dep/lib.txt");

    let reloaded = Workspace::open(ws.root()).unwrap();
    assert_eq!(reloaded.manifest().sources_locked[0].rev(), first);
}

#[test]
fn test_independent_roots_sync_concurrently() {
    let origins: Vec<OriginRepo> = (0..4).map(|_| OriginRepo::new()).collect();
    // Repository handles are not Sync, so hand threads plain values
    let upstreams: Vec<(String, String)> = origins
        .iter()
        .map(|origin| (origin.url(), origin.head_hash()))
        .collect();
    let temp = TempDir::new().unwrap();
    let git = Arc::new(GitClient::new());

    thread::scope(|scope| {
        for (i, (url, head)) in upstreams.iter().enumerate() {
            let ctx = SyncContext::new(temp.path().join(format!("root{i}"))).with_git(git.clone());
            scope.spawn(move || {
                let source = Source::new(url.clone(), "dep").unwrap().with_rev("main");
                source
                    .update_files(&ctx, &UpdateOptions::default())
                    .unwrap();
                let identity = source.identify(&ctx, false, false).unwrap();
                assert_eq!(identity.revision, Revision::Commit(head.clone()));
            });
        }
    });

    for i in 0..4 {
        assert!(temp.path().join(format!("root{i}/dep/README.md")).is_file());
    }
}
