//! Output formatters for duplicate scan results.
//!
//! Both formats present only groups with two or more files:
//! - Text for people
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::TextOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults().scan(Path::new(".")).unwrap();
//! TextOutput::new(&report).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::JsonOutput;
pub use text::TextOutput;
