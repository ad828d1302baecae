//! Plain-text report.
//!
//! ```text
//! Duplicates:
//! 5d41402abc4b2a76b9719d911017c592...
//! 	/data/a.txt 1600000000
//! 	/data/b.txt 1600000000
//! 1 duplicate groups, 1 duplicate files, 5 bytes reclaimable, 0 errors
//! ```
//!
//! With no group of two or more files the listing is replaced by
//! `No dupes found.`; the summary line is always printed.

use std::io::{self, Write};

use crate::duplicates::{DuplicateGroup, ScanReport};

/// Text formatter over a finished scan.
#[derive(Debug)]
pub struct TextOutput<'a> {
    groups: Vec<DuplicateGroup>,
    report: &'a ScanReport,
}

impl<'a> TextOutput<'a> {
    /// Prepare the report; groups are extracted and sorted once here.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self {
            groups: report.duplicates(),
            report,
        }
    }

    /// Write the report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.groups.is_empty() {
            writeln!(writer, "No dupes found.")?;
        } else {
            writeln!(writer, "Duplicates:")?;
            for group in &self.groups {
                writeln!(writer, "{}", group.digest)?;
                for file in &group.files {
                    writeln!(writer, "\t{} {}", file.path.display(), file.mtime)?;
                }
            }
        }

        let stats = &self.report.stats;
        writeln!(
            writer,
            "{} duplicate groups, {} duplicate files, {} bytes reclaimable, {} errors",
            stats.duplicate_groups,
            stats.duplicate_files,
            stats.reclaimable_space,
            self.report.errors.len()
        )
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
