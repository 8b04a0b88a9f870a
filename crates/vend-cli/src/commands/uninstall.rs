//! Uninstall command

use std::path::Path;
use std::sync::Arc;

use vend_core::{Reporter, Style};

use super::open_workspace;
use crate::error::Result;

/// Run the uninstall command
pub fn run_uninstall(root: &Path, reporter: Arc<dyn Reporter>, force: bool) -> Result<()> {
    let workspace = open_workspace(root, reporter.clone())?;

    workspace.uninstall(force)?;
    reporter.show(
        &[format!("Uninstalled sources from {}", workspace.sources_root())],
        Style::Success,
    );
    Ok(())
}
