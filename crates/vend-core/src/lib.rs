//! Source synchronization engine for vend
//!
//! This crate converges declared source dependencies onto the local
//! filesystem:
//!
//! - **Source model**: validated [`Source`] entries with name-only identity helpers
//! - **Synchronization**: clone/fetch/update, symbolic links and post-sync scripts
//! - **Identify and lock**: report and pin the commit each working tree sits at
//! - **Workspace**: manifest-driven install, update, list, lock and uninstall
//!
//! # Architecture
//!
//! ```text
//!            vend-cli
//!               |
//!           vend-core
//!               |
//!        +------+------+
//!        |             |
//!     vend-fs      vend-git
//! ```
//!
//! Every operation takes a [`SyncContext`] naming the directory that holds
//! the working trees; the process working directory is never used.
//!
//! # Example
//!
//! ```no_run
//! use vend_core::{Source, SyncContext, UpdateOptions};
//!
//! fn example() -> vend_core::Result<()> {
//!     let ctx = SyncContext::new("vend_sources");
//!     let source = Source::new("https://example/repo.git", "dep")?.with_rev("v1.0");
//!     source.update_files(&ctx, &UpdateOptions::default())?;
//!     let identity = source.identify(&ctx, false, false)?;
//!     println!("{} at {}", identity.path, identity.revision);
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
pub mod manifest;
pub mod reporter;
pub mod shell;
pub mod source;
pub mod workspace;

pub use context::SyncContext;
pub use error::{Error, ErrorKind, Result};
pub use manifest::Manifest;
pub use reporter::{RecordingReporter, Reporter, Style, TracingReporter};
pub use shell::{ShellError, ShellExecutor, SystemShell};
pub use source::{Identity, LinkOutcome, Revision, Source, UpdateOptions};
pub use workspace::{InstallOptions, Workspace};
