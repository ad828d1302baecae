//! Size buckets, digest groups and the size reducer.
//!
//! # Overview
//!
//! Size grouping is the first filter of duplicate detection. Files with
//! different byte counts cannot be duplicates, so any bucket holding a single
//! file is dropped before the hashing stage ever sees it.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileDescriptor;
//! use dupescan::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileDescriptor::new(PathBuf::from("/file1.txt"), 1024, 0),
//!     FileDescriptor::new(PathBuf::from("/file2.txt"), 1024, 0),
//!     FileDescriptor::new(PathBuf::from("/file3.txt"), 2048, 0),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.candidates, 2);  // Two 1024-byte files
//! assert_eq!(buckets.len(), 1);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::scanner::FileDescriptor;

/// File size → descriptors sharing that size.
pub type SizeBucketMap = HashMap<u64, Vec<FileDescriptor>>;

/// Hex digest → descriptors sharing that digest.
///
/// Every list holds at least one descriptor; only lists of two or more are
/// real duplicate groups.
pub type DigestGroupMap = HashMap<String, Vec<FileDescriptor>>;

/// Statistics from the size reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Total number of files seen
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct sizes before pruning
    pub unique_sizes: usize,
    /// Files dropped because no other file shares their size
    pub eliminated_unique: usize,
    /// Files kept for hashing (in buckets of 2+)
    pub candidates: usize,
    /// Number of surviving buckets
    pub candidate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Drop every bucket that cannot hold a duplicate.
///
/// Takes the size map already merged across workers and keeps only buckets
/// with two or more descriptors.
#[must_use]
pub fn reduce_by_size(buckets: SizeBucketMap) -> (SizeBucketMap, GroupingStats) {
    let mut stats = GroupingStats {
        unique_sizes: buckets.len(),
        ..Default::default()
    };

    let kept: SizeBucketMap = buckets
        .into_iter()
        .filter(|(size, files)| {
            stats.total_files += files.len();
            stats.total_size += size * files.len() as u64;

            if files.len() < 2 {
                stats.eliminated_unique += files.len();
                if let Some(file) = files.first() {
                    log::trace!("Eliminated unique size {}: {}", size, file.path.display());
                }
                false
            } else {
                stats.candidates += files.len();
                stats.candidate_buckets += 1;
                log::trace!("Size bucket {} bytes: {} candidates", size, files.len());
                true
            }
        })
        .collect();

    log::info!(
        "Size reduction: {} files → {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.candidates,
        stats.elimination_rate()
    );

    (kept, stats)
}

/// Bucket descriptors by size, then prune with [`reduce_by_size`].
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileDescriptor>,
) -> (SizeBucketMap, GroupingStats) {
    let mut buckets = SizeBucketMap::new();
    for file in files {
        buckets.entry(file.size).or_default().push(file);
    }
    reduce_by_size(buckets)
}

/// A confirmed duplicate group, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Hex content digest shared by every file
    pub digest: String,
    /// File size in bytes
    pub size: u64,
    /// Files with this content, sorted by path
    pub files: Vec<FileDescriptor>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space held by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Paths of every file in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Extract the real duplicate groups (two or more files) from a digest map.
///
/// Groups are sorted by digest and files by path, so the result is stable
/// even though the map's internal ordering is not.
#[must_use]
pub fn duplicate_groups(map: &DigestGroupMap) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = map
        .iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(digest, files)| {
            let mut files = files.clone();
            files.sort_by(|a, b| a.path.cmp(&b.path));
            DuplicateGroup {
                digest: digest.clone(),
                size: files.first().map_or(0, |f| f.size),
                files,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.digest.cmp(&b.digest));
    groups
}
