//! The `.gitignore` marker written into cache directories.
//!
//! A cache directory gets a `.gitignore` that ignores everything, so caches
//! living inside a repository never show up in `git status`. Its first line is
//! a fixed signature which tells it apart from a user's own `.gitignore`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DiskError, Result};
use crate::tree::mkdirp;

/// File name of the marker inside a cache directory.
pub const MARKER_FILE_NAME: &str = ".gitignore";

/// First line of every marker file.
pub const MARKER_SIGNATURE: &str = "# Created by cachedisk automatically.";

/// Path of the marker file inside `dir`.
#[must_use]
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE_NAME)
}

/// Write the marker file into `dir`, creating `dir` first if needed.
///
/// An existing `.gitignore` is never overwritten, whoever wrote it.
///
/// # Returns
///
/// `true` if the marker was written, `false` if a `.gitignore` was already there.
///
/// # Errors
///
/// Returns [`DiskError::Io`] if `dir` cannot be created or the file cannot be written.
pub fn write_marker(dir: &Path) -> Result<bool> {
    mkdirp(dir)?;
    create_marker(&marker_path(dir), |file| writeln!(file, "{MARKER_SIGNATURE}\n*"))
}

/// Create `path` exclusively and fill it with `write`.
///
/// On a failed write the file is removed again, so no unsigned marker is left.
fn create_marker(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(DiskError::io(path, e)),
    };

    if let Err(e) = write(&mut file) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(DiskError::io(path, e));
    }
    debug!(path = %path.display(), "wrote cache marker");

    Ok(true)
}

/// Whether the file at `path` is a marker, judged by its first line.
///
/// Missing or unreadable files are not markers.
#[must_use]
pub fn is_marker(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut first_line = String::new();
    if BufReader::new(file).read_line(&mut first_line).is_err() {
        return false;
    }

    first_line.trim_end_matches(['\n', '\r']) == MARKER_SIGNATURE
}

/// Remove the marker from `dir` if it is present and carries the signature.
///
/// # Returns
///
/// `true` if a marker was removed.
///
/// # Errors
///
/// Returns [`DiskError::Io`] if the marker exists but cannot be removed.
pub fn remove_marker(dir: &Path) -> Result<bool> {
    let path = marker_path(dir);
    if !is_marker(&path) {
        return Ok(false);
    }

    match fs::remove_file(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed cache marker");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DiskError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_marker_contents() {
        let temp = TempDir::new().unwrap();

        assert!(write_marker(temp.path()).unwrap());

        let content = fs::read_to_string(marker_path(temp.path())).unwrap();
        assert_eq!(content, format!("{MARKER_SIGNATURE}\n*\n"));
        assert!(is_marker(&marker_path(temp.path())));
    }

    #[test]
    fn test_write_marker_creates_directory() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("path_to_cache");

        assert!(write_marker(&cache).unwrap());
        assert!(cache.is_dir());
    }

    #[test]
    fn test_write_marker_keeps_existing_gitignore() {
        let temp = TempDir::new().unwrap();
        let path = marker_path(temp.path());
        fs::write(&path, "target/\n").unwrap();

        assert!(!write_marker(temp.path()).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "target/\n");
        assert!(!is_marker(&path));
    }

    #[test]
    fn test_failed_write_leaves_no_marker() {
        let temp = TempDir::new().unwrap();
        let path = marker_path(temp.path());

        let result = create_marker(&path, |file| {
            file.write_all(b"# Created")?;
            Err(io::Error::other("disk full"))
        });

        assert!(matches!(result, Err(DiskError::Io { .. })));
        assert!(!path.exists());
        assert!(write_marker(temp.path()).unwrap());
    }

    #[test]
    fn test_is_marker_accepts_crlf() {
        let temp = TempDir::new().unwrap();
        let path = marker_path(temp.path());
        fs::write(&path, format!("{MARKER_SIGNATURE}\r\n*\r\n")).unwrap();

        assert!(is_marker(&path));
    }

    #[test]
    fn test_is_marker_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(!is_marker(&marker_path(temp.path())));
    }

    #[test]
    fn test_remove_marker_only_removes_signed_file() {
        let temp = TempDir::new().unwrap();
        let path = marker_path(temp.path());

        fs::write(&path, "*.log\n").unwrap();
        assert!(!remove_marker(temp.path()).unwrap());
        assert!(path.exists());

        fs::remove_file(&path).unwrap();
        write_marker(temp.path()).unwrap();
        assert!(remove_marker(temp.path()).unwrap());
        assert!(!path.exists());
    }
}
