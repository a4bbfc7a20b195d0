//! Crosswalk formatting
//!
//! Turns a whitespace-delimited (diagnosis code, CC) listing into a crosswalk
//! table tagged with its version, year and coding system.

use log::{debug, info};

use super::supplemental::supplemental_entries;
use super::{Extraction, ExtractionStats, content_lines};
use crate::models::diagnosis::CodingSystem;
use crate::models::reference::{CrosswalkEntry, CrosswalkTable};
use crate::models::scheme::SchemeVersion;

fn parse_line(line: &str) -> Option<(&str, i32)> {
    let mut tokens = line.split_whitespace();
    let code = tokens.next()?;
    let cc_id = tokens.next()?.parse().ok()?;
    Some((code, cc_id))
}

/// Format one raw crosswalk listing
///
/// The year and coding system come from the artifact's location, not its
/// content. Trailing flag columns after the CC are ignored. For ICD-9 inputs
/// the supplemental mappings of the version and year are appended after the
/// parsed rows when `include_supplemental` is set.
#[must_use]
pub fn format_crosswalk(
    version: SchemeVersion,
    year: i32,
    coding_system: CodingSystem,
    text: &str,
    include_supplemental: bool,
) -> Extraction<CrosswalkTable> {
    let mut stats = ExtractionStats::default();
    let mut entries = Vec::new();

    for line in content_lines(text) {
        stats.lines_read += 1;
        match parse_line(line) {
            Some((code, cc_id)) => entries.push(CrosswalkEntry {
                diagnosis_code: code.to_string(),
                cc_id,
                coding_system,
                year,
            }),
            None => {
                stats.lines_skipped += 1;
                debug!("Skipping {version} {year} {coding_system} crosswalk line: {}", line.trim());
            }
        }
    }

    let parsed = entries.len();
    if include_supplemental {
        entries.extend(supplemental_entries(version, year, coding_system));
    }
    stats.rows_emitted = entries.len();

    info!(
        "Formatted {year} {version} {coding_system} crosswalk: {parsed} parsed, {} supplemental, {} lines skipped",
        entries.len() - parsed,
        stats.lines_skipped
    );

    Extraction {
        table: CrosswalkTable::new(version, year, coding_system, entries),
        stats,
    }
}
