//! Logging setup for dupescan.
//!
//! Structured logging goes through the `log` facade with an `env_logger`
//! backend. The level is chosen, in priority order, by:
//!
//! 1. the `RUST_LOG` environment variable, when set
//! 2. `--quiet` (errors only) or `--verbose` (`-v` debug, `-vv` trace)
//! 3. info otherwise
//!
//! Debug builds prefix every line with a timestamp (and the module path once
//! verbose); release builds print the level and message only.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! // -v on the command line
//! init_logging(1, false).unwrap();
//! log::debug!("visible");
//! log::trace!("hidden");
//! ```

use env_logger::Builder;
use log::{LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

/// Initialize the global logger from the CLI verbosity flags.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - Only show errors (ignored when `RUST_LOG` is set)
///
/// # Errors
///
/// Returns an error if a global logger was already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), SetLoggerError> {
    let rust_log = env::var("RUST_LOG").ok();
    let mut builder = Builder::new();

    let level = match &rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
            None
        }
        None => {
            let level = determine_level(verbose, quiet);
            builder.filter_level(level);
            // jwalk's own thread pool chatter is only useful at trace.
            if level < LevelFilter::Trace {
                builder.filter_module("jwalk", LevelFilter::Warn);
            }
            Some(level)
        }
    };

    configure_format(&mut builder, verbose);
    builder.try_init()?;

    match (level, rust_log) {
        (Some(level), _) => log::debug!("Logging initialized at level {level:?}"),
        (None, Some(filters)) => log::debug!("Logging initialized from RUST_LOG={filters}"),
        (None, None) => {}
    }
    Ok(())
}

/// Map CLI flags to a level filter; `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let style = buf.default_level_style(level);

        if verbose >= 1 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}
