//! Error types for the disk helpers.
//!
//! Library functions return [`DiskError`]; the binary wraps it in `anyhow`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the disk helpers.
#[derive(Debug, Error)]
pub enum DiskError {
    /// The path given to a measurement does not exist.
    #[error("No such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// A memory-size string could not be parsed.
    #[error("Invalid literal for size: '{text}' should be alike '10G', '500M', '50K'")]
    InvalidSize { text: String },

    /// An OS-level filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving a directory to the system trash failed.
    #[error("Failed to move {} to trash: {message}", path.display())]
    Trash { path: PathBuf, message: String },
}

impl DiskError {
    /// Wrap an [`io::Error`] together with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying I/O error kind, if this is an I/O error.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, DiskError>;
