//! Idempotent directory creation.

use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;

use crate::error::{DiskError, Result};

/// Create `path` and all of its missing parents.
///
/// Calling this on a directory that already exists is a no-op. A path that
/// exists but is not a directory is still an error.
///
/// # Errors
///
/// Returns [`DiskError::Io`] if:
/// - `path` is empty (kind [`io::ErrorKind::NotFound`])
/// - `path` exists and is not a directory (kind [`io::ErrorKind::AlreadyExists`])
/// - The directory cannot be created (permissions, read-only filesystem, ...)
pub fn mkdirp(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(DiskError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "empty path"),
        ));
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            trace!(path = %path.display(), "directory ready");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(DiskError::io(path, e)),
    }
}
