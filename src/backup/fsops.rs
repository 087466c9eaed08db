//! Filesystem primitives used by backup jobs
//!
//! Errors are returned as they come from the filesystem, nothing is retried.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::BackupResult;

/// Recursively copy a directory tree into a new directory
///
/// `destination` must not exist yet. Symlinks are followed, so the snapshot
/// holds the linked content rather than the link.
pub fn copy_tree(source: &Path, destination: &Path) -> BackupResult<u64> {
    fs::create_dir(destination)?;
    let mut files = 0;

    for entry in WalkDir::new(source).follow_links(true).min_depth(1) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    Ok(files)
}

/// Copy a single file, returning the number of bytes copied
pub fn copy_file(source: &Path, destination: &Path) -> BackupResult<u64> {
    Ok(fs::copy(source, destination)?)
}

/// Remove a snapshot: a whole subtree for folders, a single file otherwise
pub fn remove_entry(path: &Path) -> BackupResult<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}
