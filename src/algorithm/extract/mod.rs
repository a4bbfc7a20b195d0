//! Reference table extraction
//!
//! Parsers turning the raw regulatory text artifacts of each scheme version
//! into normalized reference tables. Lines that fail pattern extraction are
//! dropped and counted, never raised.

pub mod crosswalk;
pub mod grammar;
pub mod hierarchy;
pub mod labels;
pub mod supplemental;

use serde::Serialize;

pub use crosswalk::format_crosswalk;
pub use grammar::{ExtractionGrammar, grammar};
pub use hierarchy::extract_hierarchy_rules;
pub use labels::extract_labels;

/// Line counters of one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Non-blank lines examined
    pub lines_read: usize,
    /// Rows written to the output table
    pub rows_emitted: usize,
    /// Non-blank lines dropped because extraction failed
    pub lines_skipped: usize,
}

/// An extracted table together with its line counters
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub table: T,
    pub stats: ExtractionStats,
}

/// Non-blank lines of a raw artifact
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}
