//! Archive handle entity

use std::path::{Path, PathBuf};

use crate::error::{TransferError, TransferResult};

/// A packaged archive on the local disk.
///
/// The handle owns the file: `remove()` deletes it, and a handle dropped
/// without being removed deletes it best-effort.
#[derive(Debug)]
pub struct ArchiveHandle {
    path: PathBuf,
    size: u64,
    entry_count: usize,
    removed: bool,
}

impl ArchiveHandle {
    pub fn new(path: PathBuf, size: u64, entry_count: usize) -> Self {
        Self {
            path,
            size,
            entry_count,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Delete the archive file. A file that is already gone counts as removed.
    pub fn remove(mut self) -> TransferResult<()> {
        self.removed = true;
        remove_if_present(&self.path)
            .map_err(|e| TransferError::io(format!("removing {}", self.path.display()), e))
    }
}

impl Drop for ArchiveHandle {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = remove_if_present(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove archive");
        }
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
