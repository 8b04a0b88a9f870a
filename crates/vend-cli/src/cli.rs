//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// vend - Synchronize external source dependencies into your project
#[derive(Parser, Debug)]
#[command(name = "vend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root containing vend.yml
    #[arg(short = 'C', long, global = true, env = "VEND_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by install and update
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct SyncArgs {
    /// Sources to synchronize (default: all)
    pub names: Vec<String>,

    /// Overwrite uncommitted changes and occupied link paths
    #[arg(short, long)]
    pub force: bool,

    /// Keep untracked files and local modifications
    #[arg(short, long)]
    pub keep_changes: bool,

    /// Do not run post-sync scripts
    #[arg(long)]
    pub no_scripts: bool,

    /// Synchronize sources concurrently
    #[arg(short = 'j', long)]
    pub parallel: bool,

    /// Kill post-sync scripts that run longer than this
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Get the specified revisions of all sources
    ///
    /// Locked revisions are used when the manifest has any.
    ///
    /// Examples:
    ///   vend install              # Install everything
    ///   vend install dep --fetch  # Re-fetch one source
    Install {
        #[command(flatten)]
        sync: SyncArgs,

        /// Always fetch from the remote
        #[arg(short = 'e', long)]
        fetch: bool,

        /// Ignore locked revisions
        #[arg(long)]
        skip_lock: bool,
    },

    /// Update sources to the latest declared revisions
    Update {
        #[command(flatten)]
        sync: SyncArgs,

        /// Record the resulting commits as locked revisions
        #[arg(short, long)]
        lock: bool,
    },

    /// Display the current revision of each source
    List {
        /// Fail if any source has uncommitted changes
        #[arg(long)]
        no_dirty: bool,
    },

    /// Record the current commit of each source
    Lock {
        /// Sources to lock (default: all)
        names: Vec<String>,
    },

    /// Delete all installed sources and their links
    Uninstall {
        /// Delete even with uncommitted changes
        #[arg(short, long)]
        force: bool,
    },

    /// Show paths of the project or its sources
    Show {
        /// Source working trees to show (default: the sources directory)
        names: Vec<String>,

        /// Show the manifest path instead
        #[arg(short, long, conflicts_with = "names")]
        config: bool,
    },
}
