//! Disk usage measurement.
//!
//! Usage is the space actually allocated on storage, counted in 512-byte
//! blocks the way `du` does, rather than the sum of nominal file lengths.

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DiskError, Result};

/// Unit in which filesystems report allocation.
const BLOCK_SIZE: u64 = 512;

/// Totals gathered while walking a directory tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    /// Bytes allocated on storage for regular files.
    pub allocated: u64,

    /// Sum of nominal lengths of regular files.
    pub apparent: u64,

    /// Number of regular files.
    pub files: u64,

    /// Number of directories, the root included.
    pub dirs: u64,
}

/// Return the number of bytes allocated on disk for the regular files in the
/// tree rooted at `path`.
///
/// Directory entries and symlinks contribute nothing. Symlinks are not
/// followed and hard links are counted once.
///
/// # Errors
///
/// Returns [`DiskError::NotFound`] if `path` does not exist, or
/// [`DiskError::Io`] if the root cannot be inspected.
pub fn disk_used(path: &Path) -> Result<u64> {
    disk_usage(path).map(|usage| usage.allocated)
}

/// Walk the tree rooted at `path` and collect allocation and entry counts.
///
/// Entries that disappear or cannot be inspected during the walk are skipped;
/// only a failure on the root itself is reported.
///
/// # Errors
///
/// Returns [`DiskError::NotFound`] if `path` does not exist, or
/// [`DiskError::Io`] if the root cannot be inspected.
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    fs::symlink_metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            DiskError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DiskError::io(path, e)
        }
    })?;

    let mut usage = DiskUsage::default();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "skipping entry without metadata");
                continue;
            }
        };

        if !first_sighting(&mut seen, &metadata) {
            continue;
        }

        if metadata.is_dir() {
            usage.dirs += 1;
        } else if metadata.is_file() {
            usage.files += 1;
            usage.apparent = usage.apparent.saturating_add(metadata.len());
            usage.allocated = usage.allocated.saturating_add(allocated_bytes(&metadata));
        }
    }

    Ok(usage)
}

/// Bytes allocated for a single entry.
#[cfg(unix)]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;

    metadata.blocks().saturating_mul(BLOCK_SIZE)
}

/// Bytes allocated for a single entry, estimated from its length.
#[cfg(not(unix))]
fn allocated_bytes(metadata: &Metadata) -> u64 {
    estimated_allocation(metadata.len())
}

/// Length rounded up to whole blocks. Empty files occupy no data blocks and
/// count as zero, matching what block-reporting filesystems show for them.
#[cfg(any(not(unix), test))]
const fn estimated_allocation(len: u64) -> u64 {
    len.div_ceil(BLOCK_SIZE).saturating_mul(BLOCK_SIZE)
}

/// Whether this is the first time the underlying inode is seen.
#[cfg(unix)]
fn first_sighting(seen: &mut HashSet<(u64, u64)>, metadata: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    if metadata.is_dir() || metadata.nlink() <= 1 {
        return true;
    }
    seen.insert((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn first_sighting(_seen: &mut HashSet<(u64, u64)>, _metadata: &Metadata) -> bool {
    true
}
