//! Show command

use std::path::Path;

use vend_core::Workspace;

use crate::error::Result;

/// Run the show command
///
/// Prints raw paths, one per line, for use in scripts.
pub fn run_show(root: &Path, names: &[String], config: bool) -> Result<()> {
    let workspace = Workspace::open(root)?;

    if config {
        println!("{}", workspace.manifest_path());
    } else if names.is_empty() {
        println!("{}", workspace.sources_root());
    } else {
        for name in names {
            println!("{}", workspace.working_tree(name)?);
        }
    }
    Ok(())
}
