//! List command

use std::path::Path;
use std::sync::Arc;

use vend_core::{Reporter, Style};

use super::{display_result, open_workspace};
use crate::error::Result;

/// Run the list command
///
/// Prints one `path: url @ revision` line per declared source.
pub fn run_list(root: &Path, reporter: Arc<dyn Reporter>, no_dirty: bool) -> Result<()> {
    let workspace = open_workspace(root, reporter.clone())?;

    let identities = workspace.list(!no_dirty)?;
    let lines: Vec<String> = identities
        .iter()
        .map(|identity| format!("{}: {} @ {}", identity.path, identity.url, identity.revision))
        .collect();
    reporter.show(&lines, Style::Path);

    display_result(reporter.as_ref(), "list", "Listed", identities.len(), true)
}
