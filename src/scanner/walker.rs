//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which lazily enumerates the
//! path of every regular file under a root directory.
//!
//! # Features
//!
//! - Excluded entry names are pruned before descent, so an excluded
//!   directory's subtree is never read
//! - Symbolic links are neither followed nor yielded, which rules out
//!   link cycles
//! - Children are sorted by name in each directory for a stable order
//! - Access errors are yielded as [`ScanError::Walk`] and iteration continues
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{ScanConfig, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), &ScanConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{ExclusionSet, ScanConfig, ScanError};

/// Directory walker yielding regular-file paths.
///
/// Holds no state between calls to [`Walker::walk`]; every call starts a
/// fresh traversal.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Entry names skipped along with their subtrees
    excludes: ExclusionSet,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Scan configuration supplying the exclusion set
    #[must_use]
    pub fn new(path: &Path, config: &ScanConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            excludes: config.excludes.clone(),
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding regular-file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{ScanConfig, Walker};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), &ScanConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        // jwalk starts reading directories as soon as the iterator is built,
        // so building it waits for the first call to `next`.
        std::iter::once(())
            .flat_map(move |()| self.walk_dir().into_iter())
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    // Directories, the root included, are traversed but not yielded.
                    let file_type = entry.file_type();
                    if file_type.is_file() {
                        Some(Ok(entry.path()))
                    } else {
                        if file_type.is_symlink() {
                            log::trace!("Skipping symlink: {}", entry.path().display());
                        }
                        None
                    }
                }
                Err(e) => Some(Err(self.walk_error(e))),
            })
    }

    /// Configure the jwalk traversal: no link following, exclusions pruned
    /// before descent, children sorted by name.
    fn walk_dir(&self) -> WalkDir {
        let excludes = self.excludes.clone();

        WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(move |depth, _path, _read_dir_state, children| {
                // The root is delivered through a synthetic read_dir with no
                // depth; it is never subject to exclusion.
                if depth.is_none() {
                    return;
                }

                children.retain(|child| match child {
                    Ok(entry) => {
                        let excluded = excludes.contains(entry.file_name());
                        if excluded {
                            log::trace!("Excluding {}", entry.path().display());
                        }
                        !excluded
                    }
                    Err(_) => true,
                });

                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            })
    }

    /// Convert a jwalk error into a [`ScanError::Walk`], logging it.
    fn walk_error(&self, error: jwalk::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();
        let source = match error.io_error() {
            Some(io) => std::io::Error::new(io.kind(), message),
            None => std::io::Error::other(message),
        };

        if source.kind() == std::io::ErrorKind::NotFound {
            log::debug!("Entry vanished during walk: {}", path.display());
        } else {
            log::warn!("Error accessing {}: {}", path.display(), source);
        }

        ScanError::Walk { path, source }
    }
}
