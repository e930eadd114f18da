//! Utility functions and helpers.
//!
//! This module contains the size parsing and disk usage helpers.

pub mod size;
pub mod usage;

pub use size::{format_bytes, memstr_to_bytes};
pub use usage::{DiskUsage, disk_usage, disk_used};
