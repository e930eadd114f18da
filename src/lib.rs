//! # cachedisk
//!
//! Disk helpers for file-backed caches.
//!
//! - [`disk_used`] measures the space a directory tree occupies on storage
//! - [`memstr_to_bytes`] parses memory sizes such as `"80G"` or `"1.4M"`
//! - [`mkdirp`] creates a directory and its parents, idempotently
//! - [`rm_subdirs`] clears a cache directory, including its `.gitignore` marker
//!
//! All operations are synchronous and keep no state between calls.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod marker;
pub mod output;
pub mod tree;
pub mod utils;

pub use cleaner::{Cleaner, ClearPlan, ClearResult, RemovalStrategy, rm_subdirs};
pub use error::{DiskError, Result};
pub use tree::mkdirp;
pub use utils::{DiskUsage, disk_usage, disk_used, memstr_to_bytes};
