//! Duplicate finder: the two-phase detection pipeline.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk** - Enumerate regular files, pruning excluded names
//! 2. **Phase 1 - Size bucketing**: A worker pool probes each path and
//!    buckets descriptors by size; buckets of one are dropped
//! 3. **Phase 2 - Hashing**: A second pool digests every remaining candidate
//!    and groups descriptors by digest
//!
//! Both phases run through the same [`WorkerPool`]. Per-file failures never
//! abort a scan: they are logged and collected in [`ScanReport::errors`].
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::detect;
//! use std::path::Path;
//!
//! let groups = detect(Path::new("."), 2).unwrap();
//! for (digest, files) in groups.iter().filter(|(_, files)| files.len() > 1) {
//!     println!("{digest}: {} copies", files.len());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::groups::{duplicate_groups, reduce_by_size, DigestGroupMap, DuplicateGroup};
use super::pool::WorkerPool;
use crate::scanner::{
    is_directory, probe, FileDescriptor, Hasher, ScanConfig, ScanError, Walker,
};

/// Errors that abort a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root does not resolve to a directory (or cannot be stat'ed).
    #[error("{} is not a directory", .0.display())]
    InvalidRoot(PathBuf),
}

/// Counters describing one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files yielded by the walker
    pub files_found: usize,
    /// Files whose metadata was read
    pub files_probed: usize,
    /// Total size of all probed files in bytes
    pub total_size: u64,
    /// Files dropped because their size is unique
    pub eliminated_by_size: usize,
    /// Files that shared a size with another file
    pub candidates: usize,
    /// Digest computations attempted (one per candidate)
    pub digests_attempted: usize,
    /// Candidates digested successfully
    pub hashed_files: usize,
    /// Distinct digests, singletons included
    pub digest_groups: usize,
    /// Digests shared by two or more files
    pub duplicate_groups: usize,
    /// Redundant copies across all duplicate groups
    pub duplicate_files: usize,
    /// Bytes held by the redundant copies
    pub reclaimable_space: u64,
    /// Entries the walker could not access
    pub walk_errors: usize,
    /// Files whose metadata could not be read
    pub probe_errors: usize,
    /// Candidates that could not be digested
    pub digest_errors: usize,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

/// Full result of a scan: the digest map plus everything that went wrong.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Digest → files; singleton groups are size collisions, not duplicates
    pub groups: DigestGroupMap,
    /// Per-file errors, in pipeline order (walk, probe, digest)
    pub errors: Vec<ScanError>,
    /// Scan counters
    pub stats: ScanStats,
}

impl ScanReport {
    /// Groups with two or more files, sorted by digest.
    #[must_use]
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        duplicate_groups(&self.groups)
    }

    /// Whether any per-file error was collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Duplicate finder that runs the two-phase pipeline.
///
/// Holds only configuration; each call to [`DuplicateFinder::scan`] is a
/// fresh, self-contained run.
///
/// # Example
///
/// ```no_run
/// use dupescan::duplicates::DuplicateFinder;
/// use dupescan::scanner::ScanConfig;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(ScanConfig::default().with_workers(4));
/// let report = finder.scan(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", report.stats.duplicate_groups);
/// println!("{} files could not be read", report.errors.len());
/// ```
#[derive(Debug, Clone)]
pub struct DuplicateFinder {
    config: ScanConfig,
    hasher: Hasher,
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScanConfig::default())
    }

    /// Use a custom hasher (e.g. a different read chunk size).
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Configuration this finder scans with.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Find all files under `root` sharing their content with another file.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidRoot`] if `root` is not a directory.
    /// This is checked before any worker starts. Every other failure is
    /// per-file and ends up in [`ScanReport::errors`].
    pub fn scan(&self, root: &Path) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();

        match is_directory(root) {
            Ok(true) => {}
            Ok(false) => return Err(FinderError::InvalidRoot(root.to_path_buf())),
            Err(e) => {
                log::debug!("Cannot stat root {}: {}", root.display(), e);
                return Err(FinderError::InvalidRoot(root.to_path_buf()));
            }
        }

        log::info!(
            "Searching {} with {} workers",
            root.display(),
            self.config.workers
        );

        let mut report = ScanReport::default();

        // Phase 1: walk and bucket by size
        let walker = Walker::new(root, &self.config);
        let mut walk_errors = Vec::new();
        let mut files_found = 0usize;
        let paths = walker.walk().filter_map(|entry| match entry {
            Ok(path) => {
                files_found += 1;
                Some(path)
            }
            Err(e) => {
                walk_errors.push(e);
                None
            }
        });

        let sized = WorkerPool::new("size", &self.config).run(paths, |path: PathBuf| {
            let file = probe(&path)?;
            Ok((file.size, file))
        });

        report.stats.files_found = files_found;
        report.stats.files_probed = sized.value_count();
        report.stats.walk_errors = walk_errors.len();
        report.stats.probe_errors = sized.errors.len();
        report.errors.extend(walk_errors);
        report.errors.extend(sized.errors);

        let (candidates, grouping) = reduce_by_size(sized.groups);
        report.stats.total_size = grouping.total_size;
        report.stats.eliminated_by_size = grouping.eliminated_unique;
        report.stats.candidates = grouping.candidates;

        // Phase 2: digest the candidates
        if !candidates.is_empty() {
            log::info!(
                "Hashing {} candidates in {} size buckets",
                grouping.candidates,
                grouping.candidate_buckets
            );

            let hasher = &self.hasher;
            let hashed = WorkerPool::new("hash", &self.config).run(
                candidates.into_values().flatten(),
                |file: FileDescriptor| {
                    let digest = hasher.digest_hex(&file.path)?;
                    log::trace!("Digest {} for {}", digest, file.path.display());
                    Ok((digest.clone(), file.with_digest(digest)))
                },
            );

            report.stats.digests_attempted = hashed.processed;
            report.stats.hashed_files = hashed.value_count();
            report.stats.digest_errors = hashed.errors.len();
            report.errors.extend(hashed.errors);
            report.groups = hashed.groups;
        }

        let duplicates = report.duplicates();
        report.stats.digest_groups = report.groups.len();
        report.stats.duplicate_groups = duplicates.len();
        report.stats.duplicate_files = duplicates.iter().map(DuplicateGroup::duplicate_count).sum();
        report.stats.reclaimable_space = duplicates.iter().map(DuplicateGroup::wasted_space).sum();
        report.stats.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} duplicate files, {} bytes reclaimable, {} errors",
            report.stats.files_probed,
            report.stats.duplicate_groups,
            report.stats.duplicate_files,
            report.stats.reclaimable_space,
            report.errors.len()
        );

        Ok(report)
    }
}

/// Scan `root` with `worker_count` workers per phase and group files by digest.
///
/// The returned map includes singleton groups; callers filter for lists of
/// two or more to obtain actual duplicates. A `worker_count` of zero is
/// treated as one.
///
/// # Errors
///
/// Returns [`FinderError::InvalidRoot`] if `root` is not a directory.
pub fn detect(root: &Path, worker_count: usize) -> Result<DigestGroupMap, FinderError> {
    let config = ScanConfig::default().with_workers(worker_count);
    DuplicateFinder::new(config)
        .scan(root)
        .map(|report| report.groups)
}
