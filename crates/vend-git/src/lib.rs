//! Git abstraction for vend
//!
//! The synchronization engine talks to version control only through the
//! [`VersionControl`] trait. [`GitClient`] is the `git2` implementation.

pub mod client;
pub mod error;
pub mod helpers;
pub mod provider;

pub use client::GitClient;
pub use error::{Error, Result};
pub use provider::VersionControl;
