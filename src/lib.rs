//! dupescan - concurrent duplicate file finder
//!
//! Finds files with identical content under a directory in two phases:
//! files are bucketed by size, and only sizes shared by two or more files
//! are read and hashed with BLAKE3. Each phase runs on a bounded worker pool.
//!
//! ```no_run
//! use dupescan::duplicates::detect;
//! use std::path::Path;
//!
//! let groups = detect(Path::new("."), 4).unwrap();
//! let dupes = groups.values().filter(|files| files.len() > 1).count();
//! println!("{dupes} duplicate groups");
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::Write;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};

/// Run the command-line application.
///
/// # Errors
///
/// Returns an error if the root is not a directory, the configuration
/// cannot be loaded, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Warning: logging unavailable: {e}");
    }

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.workers, cli.queue_capacity, cli.output);
    log::debug!("Effective configuration: {:?}", config);

    let finder = DuplicateFinder::new(config.scan_config());
    let report = finder.scan(&cli.path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Text => TextOutput::new(&report).write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(&report).write_to(&mut out, true)?,
    }
    out.flush()?;

    Ok(ExitCode::Success)
}
