//! Cache directory clearing.
//!
//! Clearing a cache removes every subdirectory directly under its root, along
//! with the signed `.gitignore` marker. The root itself and any other plain
//! files in it are left alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{DiskError, Result};
use crate::marker;
use crate::utils::disk_used;

/// Strategy for removing subdirectories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalStrategy {
    /// Permanently delete the directory (uses `fs::remove_dir_all`).
    #[default]
    Permanent,

    /// Move the directory to the system trash (recoverable deletion).
    Trash,
}

impl RemovalStrategy {
    /// Create a removal strategy from the `use_trash` boolean flag.
    #[must_use]
    pub const fn from_use_trash(use_trash: bool) -> Self {
        if use_trash {
            Self::Trash
        } else {
            Self::Permanent
        }
    }
}

/// A subdirectory scheduled for removal.
#[derive(Clone, Debug, Serialize)]
pub struct PlannedRemoval {
    /// Path of the subdirectory.
    pub path: PathBuf,

    /// Disk usage measured when the plan was made.
    pub size: u64,
}

/// Everything a clear operation would remove under one root.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ClearPlan {
    /// The cache root being cleared.
    pub root: PathBuf,

    /// Subdirectories to remove, sorted by path.
    pub subdirs: Vec<PlannedRemoval>,

    /// The marker file, if one with the signature is present.
    pub marker: Option<PathBuf>,
}

impl ClearPlan {
    /// Total disk usage of the planned subdirectories.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.subdirs.iter().map(|s| s.size).sum()
    }

    /// Whether there is nothing to remove.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subdirs.is_empty() && self.marker.is_none()
    }
}

/// Outcome of a clear operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClearResult {
    /// Number of subdirectories removed.
    pub removed_count: usize,

    /// Bytes freed, as measured before removal.
    pub total_freed: u64,

    /// Whether the marker file was removed.
    pub marker_removed: bool,
}

/// Clears cache directories using a chosen [`RemovalStrategy`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Cleaner {
    strategy: RemovalStrategy,
}

impl Cleaner {
    /// Create a cleaner that removes directories with `strategy`.
    #[must_use]
    pub const fn new(strategy: RemovalStrategy) -> Self {
        Self { strategy }
    }

    /// The strategy this cleaner removes directories with.
    #[must_use]
    pub const fn strategy(&self) -> RemovalStrategy {
        self.strategy
    }

    /// List what clearing `root` would remove, measuring each subdirectory.
    ///
    /// A missing root yields an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`DiskError::Io`] if `root` exists but cannot be listed.
    pub fn plan(&self, root: &Path) -> Result<ClearPlan> {
        let Some(subdirs) = subdirectories(root)? else {
            return Ok(ClearPlan {
                root: root.to_path_buf(),
                ..ClearPlan::default()
            });
        };

        let subdirs = subdirs
            .into_iter()
            .map(|path| {
                let size = removable_size(&path);
                PlannedRemoval { path, size }
            })
            .collect();

        let marker_path = marker::marker_path(root);
        let marker = marker::is_marker(&marker_path).then_some(marker_path);

        Ok(ClearPlan {
            root: root.to_path_buf(),
            subdirs,
            marker,
        })
    }

    /// Remove everything listed in `plan`, calling `on_removed` after each subdirectory.
    ///
    /// Subdirectories that have disappeared since planning count as removed.
    ///
    /// # Errors
    ///
    /// Stops at the first subdirectory that cannot be removed and returns
    /// [`DiskError::Io`] or [`DiskError::Trash`] for it.
    pub fn execute(
        &self,
        plan: &ClearPlan,
        mut on_removed: impl FnMut(&PlannedRemoval),
    ) -> Result<ClearResult> {
        let mut result = ClearResult::default();

        for removal in &plan.subdirs {
            remove_subdir(&removal.path, self.strategy)?;
            result.removed_count += 1;
            result.total_freed += removal.size;
            on_removed(removal);
        }

        if plan.marker.is_some() {
            result.marker_removed = marker::remove_marker(&plan.root)?;
        }

        Ok(result)
    }

    /// Plan and clear `root` in one step.
    ///
    /// # Errors
    ///
    /// See [`Cleaner::plan`] and [`Cleaner::execute`].
    pub fn clear(&self, root: &Path) -> Result<ClearResult> {
        let plan = self.plan(root)?;
        self.execute(&plan, |_| {})
    }
}

/// Remove all subdirectories of `path`, and the cache marker if present.
///
/// The directory itself is kept. A missing `path` is not an error.
///
/// # Errors
///
/// Returns [`DiskError::Io`] if `path` cannot be listed or a subdirectory or
/// the marker cannot be removed.
pub fn rm_subdirs(path: &Path) -> Result<()> {
    let Some(subdirs) = subdirectories(path)? else {
        return Ok(());
    };

    for subdir in &subdirs {
        remove_subdir(subdir, RemovalStrategy::Permanent)?;
    }
    marker::remove_marker(path)?;

    Ok(())
}

/// Directories (and symlinks to directories) directly under `root`, sorted.
///
/// Returns `None` when `root` does not exist.
fn subdirectories(root: &Path) -> Result<Option<Vec<PathBuf>>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DiskError::io(root, e)),
    };

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiskError::io(root, e))?;
        let path = entry.path();

        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() || (file_type.is_symlink() && path.is_dir()) {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    Ok(Some(subdirs))
}

/// Bytes removing `path` frees.
///
/// A symlink is only unlinked, so it frees nothing of its target. Entries that
/// vanished since listing free nothing either.
fn removable_size(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => 0,
        Ok(_) => disk_used(path).unwrap_or(0),
        Err(_) => 0,
    }
}

/// Remove a single subdirectory. Symlinks are unlinked, not followed.
fn remove_subdir(path: &Path, strategy: RemovalStrategy) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(DiskError::io(path, e)),
    };

    if metadata.file_type().is_symlink() {
        debug!(path = %path.display(), "unlinking directory symlink");
        return fs::remove_file(path)
            .or_else(|_| fs::remove_dir(path))
            .map_err(|e| DiskError::io(path, e));
    }

    match strategy {
        RemovalStrategy::Permanent => match fs::remove_dir_all(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DiskError::io(path, e)),
        },
        RemovalStrategy::Trash => {
            trash::delete(path).map_err(|e| DiskError::Trash {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }
    debug!(path = %path.display(), ?strategy, "removed subdirectory");

    Ok(())
}
