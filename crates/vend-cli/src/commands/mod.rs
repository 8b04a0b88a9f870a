//! Command implementations for vend-cli

pub mod install;
pub mod list;
pub mod lock;
pub mod show;
pub mod uninstall;

use std::path::Path;
use std::sync::Arc;

use vend_core::{Reporter, Style, SyncContext, Workspace};

use crate::error::{CliError, Result};

pub use install::{run_install, run_update};
pub use list::run_list;
pub use lock::run_lock;
pub use show::run_show;
pub use uninstall::run_uninstall;

/// Open the project at `root` with output going to `reporter`.
fn open_workspace(root: &Path, reporter: Arc<dyn Reporter>) -> Result<Workspace> {
    let workspace = Workspace::open(root)?;
    let context = SyncContext::new(root).with_reporter(reporter);
    Ok(workspace.with_context(context))
}

/// Report how many sources an operation handled; zero is an error unless
/// `allow_zero`.
fn display_result(
    reporter: &dyn Reporter,
    present: &str,
    past: &str,
    count: usize,
    allow_zero: bool,
) -> Result<()> {
    if count == 0 && !allow_zero {
        return Err(CliError::user(format!("No sources to {present}")));
    }
    let noun = if count == 1 { "source" } else { "sources" };
    reporter.show(&[format!("{past} {count} {noun}.")], Style::Success);
    Ok(())
}
