//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "digest": "ea8f163d...",
//!       "size": 5,
//!       "files": [
//!         { "path": "/data/a.txt", "mtime": 1600000000 },
//!         { "path": "/data/b.txt", "mtime": 1600000000 }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 4,
//!     "total_size": 17,
//!     "candidates": 3,
//!     "hashed_files": 3,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "error_count": 0,
//!     "scan_duration_ms": 3
//!   },
//!   "errors": []
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults().scan(Path::new(".")).unwrap();
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanReport};

/// One file of a duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as discovered under the scan root
    pub path: String,
    /// Modification time, seconds since the Unix epoch
    pub mtime: i64,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// File size in bytes
    pub size: u64,
    /// Files sharing the digest, sorted by path
    pub files: Vec<JsonFile>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            digest: group.digest.clone(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| JsonFile {
                    path: f.path.to_string_lossy().into_owned(),
                    mtime: f.mtime,
                })
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files probed
    pub total_files: usize,
    /// Total size of all probed files in bytes
    pub total_size: u64,
    /// Files that shared their size with another file
    pub candidates: usize,
    /// Candidates digested successfully
    pub hashed_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies (excluding one original per group)
    pub duplicate_files: usize,
    /// Bytes held by redundant copies
    pub reclaimable_space: u64,
    /// Number of per-file errors
    pub error_count: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
}

impl From<&ScanReport> for JsonSummary {
    fn from(report: &ScanReport) -> Self {
        let stats = &report.stats;
        Self {
            total_files: stats.files_probed,
            total_size: stats.total_size,
            candidates: stats.candidates,
            hashed_files: stats.hashed_files,
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicate_files,
            reclaimable_space: stats.reclaimable_space,
            error_count: report.errors.len(),
            scan_duration_ms: u64::try_from(stats.scan_duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Complete JSON document for a scan.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Groups with two or more files, sorted by digest
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan statistics
    pub summary: JsonSummary,
    /// Per-file error messages
    pub errors: Vec<String>,
}

impl JsonOutput {
    /// Build the JSON document from a scan report.
    #[must_use]
    pub fn new(report: &ScanReport) -> Self {
        Self {
            duplicates: report.duplicates().iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::from(report),
            errors: report.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, self)?;
        } else {
            serde_json::to_writer(&mut *writer, self)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
