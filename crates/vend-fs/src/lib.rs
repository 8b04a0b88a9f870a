//! Filesystem abstraction for vend
//!
//! Provides normalized path handling, atomic I/O, manifest documents in
//! YAML, TOML or JSON, and the symbolic-link capability used to expose
//! working trees.

pub mod document;
pub mod error;
pub mod io;
pub mod link;
pub mod path;

pub use error::{Error, Result};
pub use path::{NormalizedPath, relative_path};
