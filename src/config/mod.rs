//! Configuration for the `cachedisk` command-line tool.
//!
//! Options are layered: CLI argument > config file > hardcoded default.

pub mod clear;
pub mod file;

pub use clear::{ClearOptions, DisplayOptions};
pub use file::FileConfig;
