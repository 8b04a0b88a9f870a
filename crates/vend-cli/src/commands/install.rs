//! Install and update commands

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use vend_core::{InstallOptions, Reporter, SyncContext, SystemShell, Workspace};

use super::display_result;
use crate::cli::SyncArgs;
use crate::error::Result;

fn install_options(sync: &SyncArgs) -> InstallOptions {
    InstallOptions {
        names: sync.names.clone(),
        force: sync.force,
        keep_changes: sync.keep_changes,
        skip_scripts: sync.no_scripts,
        parallel: sync.parallel,
        ..InstallOptions::default()
    }
}

/// Open the project with scripts bounded by `--timeout`, when given.
fn sync_workspace(root: &Path, reporter: Arc<dyn Reporter>, sync: &SyncArgs) -> Result<Workspace> {
    let mut context = SyncContext::new(root).with_reporter(reporter);
    if let Some(seconds) = sync.timeout {
        let shell = SystemShell::new().with_timeout(Duration::from_secs(seconds));
        context = context.with_shell(Arc::new(shell));
    }
    Ok(Workspace::open(root)?.with_context(context))
}

/// Run the install command
pub fn run_install(
    root: &Path,
    reporter: Arc<dyn Reporter>,
    sync: &SyncArgs,
    fetch: bool,
    skip_lock: bool,
) -> Result<()> {
    let workspace = sync_workspace(root, reporter.clone(), sync)?;
    let options = InstallOptions {
        fetch,
        skip_lock,
        ..install_options(sync)
    };

    let count = workspace.install(&options)?;
    display_result(reporter.as_ref(), "install", "Installed", count, false)
}

/// Run the update command
pub fn run_update(
    root: &Path,
    reporter: Arc<dyn Reporter>,
    sync: &SyncArgs,
    lock: bool,
) -> Result<()> {
    let mut workspace = sync_workspace(root, reporter.clone(), sync)?;

    let count = workspace.update(&install_options(sync), lock)?;
    display_result(reporter.as_ref(), "update", "Updated", count, false)
}
