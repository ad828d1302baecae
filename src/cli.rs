//! Command-line interface definitions for dupescan.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory with the default two workers per phase
//! dupescan ~/Downloads
//!
//! # Eight workers, JSON report
//! dupescan ~/Downloads 8 --output json
//!
//! # Debug logging
//! dupescan -v ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Find files with identical content.
///
/// Files are first bucketed by size; only sizes shared by two or more files
/// are read and hashed (BLAKE3).
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Workers per phase [default: 2, or the config file value]
    #[arg(value_name = "WORKERS")]
    pub workers: Option<usize>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Capacity of each phase's work queue
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Configuration file (TOML)
    ///
    /// Defaults to config.toml in the platform config directory.
    #[arg(long, value_name = "PATH", env = "DUPESCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
