//! Lock command

use std::path::Path;
use std::sync::Arc;

use vend_core::Reporter;

use super::{display_result, open_workspace};
use crate::error::Result;

/// Run the lock command
pub fn run_lock(root: &Path, reporter: Arc<dyn Reporter>, names: &[String]) -> Result<()> {
    let mut workspace = open_workspace(root, reporter.clone())?;

    let count = workspace.lock(names)?;
    display_result(reporter.as_ref(), "lock", "Locked", count, false)
}
