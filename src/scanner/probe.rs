//! Metadata probe and directory pre-flight check.
//!
//! Both functions only stat the path; file content is never read here.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{FileDescriptor, ScanError};

/// Read a file's size and modification time.
///
/// Symbolic links are not followed. A modification time that is unavailable
/// or earlier than the Unix epoch is recorded as `0`.
///
/// # Errors
///
/// Returns [`ScanError::Probe`] if the path cannot be stat'ed, for example
/// when the file was removed between enumeration and probing.
pub fn probe(path: &Path) -> Result<FileDescriptor, ScanError> {
    let metadata = fs::symlink_metadata(path).map_err(|source| ScanError::Probe {
        path: path.to_path_buf(),
        source,
    })?;

    let mtime = metadata.modified().map_or(0, unix_seconds);

    Ok(FileDescriptor::new(path.to_path_buf(), metadata.len(), mtime))
}

/// Check whether `path` resolves to a directory.
///
/// Symbolic links are followed, so a link to a directory counts as one.
///
/// # Errors
///
/// Returns the stat error if the path cannot be stat'ed at all. An existing
/// path that is not a directory yields `Ok(false)`.
pub fn is_directory(path: &Path) -> std::io::Result<bool> {
    fs::metadata(path).map(|m| m.is_dir())
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
