//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - A bounded worker pool shared by both phases
//! - Size-based file grouping and pruning (Phase 1)
//! - Content digest grouping (Phase 2)
//! - Duplicate group extraction for presentation

pub mod finder;
pub mod groups;
pub mod pool;

pub use finder::{detect, DuplicateFinder, FinderError, ScanReport, ScanStats};
pub use groups::{
    duplicate_groups, group_by_size, reduce_by_size, DigestGroupMap, DuplicateGroup,
    GroupingStats, SizeBucketMap,
};
pub use pool::{PoolOutput, WorkerPool};
