//! Condition category label extraction
//!
//! Parses a version's label listing into the CC id -> label table that defines
//! the column universe of that version.

use log::{debug, info};

use super::{Extraction, ExtractionStats, content_lines, grammar};
use crate::models::reference::{ConditionCategory, ConditionCategoryTable};
use crate::models::scheme::SchemeVersion;

/// Extract the condition category table from a raw label listing
///
/// A line contributes a row only when both the CC id and the quoted label are
/// found. The result may be empty; callers decide whether that is fatal.
#[must_use]
pub fn extract_labels(version: SchemeVersion, text: &str) -> Extraction<ConditionCategoryTable> {
    let grammar = grammar(version);
    let mut stats = ExtractionStats::default();
    let mut categories = Vec::new();

    for line in content_lines(text) {
        stats.lines_read += 1;
        match (grammar.cc_id(line), grammar.label(line)) {
            (Some(cc_id), Some(label)) => categories.push(ConditionCategory {
                cc_id,
                label: label.to_string(),
            }),
            _ => {
                stats.lines_skipped += 1;
                debug!("Skipping {version} label line: {}", line.trim());
            }
        }
    }

    stats.rows_emitted = categories.len();
    info!(
        "Extracted {} condition categories for {version} ({} lines skipped)",
        stats.rows_emitted, stats.lines_skipped
    );

    Extraction {
        table: ConditionCategoryTable::new(version, categories),
        stats,
    }
}
