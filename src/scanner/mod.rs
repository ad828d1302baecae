//! Scanner module for directory traversal, metadata probing and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using jwalk, pruning excluded names
//! - Size and modification time probing without reading content
//! - Content hashing with BLAKE3 in fixed-size chunks
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and regular-file discovery
//! - [`probe`]: Metadata probe and directory pre-flight check
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{probe, ScanConfig, Walker};
//! use std::path::Path;
//!
//! let config = ScanConfig::default();
//! let walker = Walker::new(Path::new("."), &config);
//! for entry in walker.walk() {
//!     match entry.and_then(|path| probe(&path)) {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod probe;
pub mod walker;

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, CHUNK_SIZE};
pub use probe::{is_directory, probe};
pub use walker::Walker;

/// Default number of workers per pool.
pub const DEFAULT_WORKERS: usize = 2;

/// Default capacity of the bounded work queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Entry names that are never scanned.
pub const DEFAULT_EXCLUDES: [&str; 3] = [".", "..", ".DS_Store"];

/// Metadata for a discovered file.
///
/// Created once by the metadata probe. The hashing stage does not edit a
/// descriptor; it consumes it and produces a new one carrying the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Path as produced by the walker (root joined with the relative path)
    pub path: PathBuf,
    /// Last modification time, seconds since the Unix epoch
    pub mtime: i64,
    /// File size in bytes
    pub size: u64,
    /// Hex-encoded content digest, set only by the hashing stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl FileDescriptor {
    /// Create a descriptor without a digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `mtime` - Modification time in Unix seconds
    #[must_use]
    pub fn new(path: PathBuf, size: u64, mtime: i64) -> Self {
        Self {
            path,
            mtime,
            size,
            digest: None,
        }
    }

    /// Replace this descriptor with one carrying `digest`.
    #[must_use]
    pub fn with_digest(self, digest: String) -> Self {
        Self {
            digest: Some(digest),
            ..self
        }
    }
}

/// Set of entry base names skipped by the walker, subtrees included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<OsString>,
}

impl ExclusionSet {
    /// Build an exclusion set from arbitrary names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether an entry base name is excluded.
    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Number of excluded names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDES)
    }
}

/// Per-call scan configuration.
///
/// Passed explicitly into the walker and the worker pools; nothing here is
/// process-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of workers in each pool (at least 1).
    pub workers: usize,
    /// Capacity of the bounded work queue feeding each pool (at least 1).
    pub queue_capacity: usize,
    /// Entry names to skip during enumeration.
    pub excludes: ExclusionSet,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            excludes: ExclusionSet::default(),
        }
    }
}

impl ScanConfig {
    /// Set the worker count. Zero is clamped to one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the work queue capacity. Zero is clamped to one.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Replace the exclusion set.
    #[must_use]
    pub fn with_excludes(mut self, excludes: ExclusionSet) -> Self {
        self.excludes = excludes;
        self
    }
}

/// Per-file errors collected during a scan.
///
/// None of these abort a scan: each is logged where it happens and the
/// offending entry is skipped.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The walker could not access a directory entry.
    #[error("Cannot access {path}: {source}")]
    Walk {
        /// Entry that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file's metadata could not be read.
    #[error("Cannot stat {path}: {source}")]
    Probe {
        /// File that could not be probed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be opened or read while hashing.
    #[error(transparent)]
    Digest(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Walk { path, .. } | Self::Probe { path, .. } => path,
            Self::Digest(e) => e.path(),
        }
    }

    /// Underlying I/O error kind.
    #[must_use]
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            Self::Walk { source, .. } | Self::Probe { source, .. } => source.kind(),
            Self::Digest(e) => e.kind(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }

    /// Underlying I/O error kind.
    #[must_use]
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            Self::NotFound(_) => std::io::ErrorKind::NotFound,
            Self::PermissionDenied(_) => std::io::ErrorKind::PermissionDenied,
            Self::Io { source, .. } => source.kind(),
        }
    }
}
