//! Version-specific extraction grammars
//!
//! Each scheme version writes its label listing and hierarchy logic in a
//! slightly different textual form. The differences are captured here as a
//! strategy table keyed by `SchemeVersion`, so the extractors themselves stay
//! version agnostic.

use lazy_static::lazy_static;
use regex::Regex;
use smallvec::SmallVec;

use crate::models::scheme::SchemeVersion;

/// Suppression list of a single hierarchy line, in source order
pub type SuppressionList = SmallVec<[i32; 8]>;

/// Patterns and anchor used to parse the artifacts of one scheme version
#[derive(Debug)]
pub struct ExtractionGrammar {
    /// Quoted label; capture group 1 is the label text
    pub label: Regex,
    /// Token preceding the logic fragment of a hierarchy line
    pub anchor: &'static str,
    /// Trigger CC in a logic fragment; capture group 1 holds the digits
    pub trigger: Regex,
    /// Comma-separated CCs to suppress; capture group 1 holds the list
    pub suppression_list: Regex,
}

lazy_static! {
    static ref CC_ID: Regex = Regex::new(r"HCC(\d{1,3})").unwrap();
    static ref V12_GRAMMAR: ExtractionGrammar = ExtractionGrammar {
        label: Regex::new(r"'(.+?)\s?'").unwrap(),
        anchor: "if h",
        trigger: Regex::new(r"cc(\d+)").unwrap(),
        suppression_list: Regex::new(r"i=(\d{1,3}(?:,\s?\d{1,3})*)").unwrap(),
    };
    static ref MACRO_GRAMMAR: ExtractionGrammar = ExtractionGrammar {
        label: Regex::new(r#""(.+?)""#).unwrap(),
        anchor: "%SET0(",
        trigger: Regex::new(r"CC=(\d+)").unwrap(),
        suppression_list: Regex::new(r"%STR\((\d{1,3}(?:\s?,\s?\d{1,3})*)").unwrap(),
    };
}

/// Look up the grammar of a scheme version
#[must_use]
pub fn grammar(version: SchemeVersion) -> &'static ExtractionGrammar {
    match version {
        SchemeVersion::V12 => &*V12_GRAMMAR,
        SchemeVersion::V21 | SchemeVersion::V22 => &*MACRO_GRAMMAR,
    }
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl ExtractionGrammar {
    /// CC id following the `HCC` marker of a label line
    #[must_use]
    pub fn cc_id(&self, line: &str) -> Option<i32> {
        first_capture(&CC_ID, line).and_then(|digits| digits.parse().ok())
    }

    /// Quoted label of a label line
    #[must_use]
    pub fn label<'t>(&self, line: &'t str) -> Option<&'t str> {
        first_capture(&self.label, line)
    }

    /// Text after the first occurrence of the anchor token
    #[must_use]
    pub fn logic_fragment<'t>(&self, line: &'t str) -> Option<&'t str> {
        line.split_once(self.anchor).map(|(_, logic)| logic)
    }

    /// Trigger CC of a logic fragment
    #[must_use]
    pub fn trigger(&self, fragment: &str) -> Option<i32> {
        first_capture(&self.trigger, fragment).and_then(|digits| digits.parse().ok())
    }

    /// CCs suppressed by a logic fragment, in listed order
    #[must_use]
    pub fn suppression_list(&self, fragment: &str) -> Option<SuppressionList> {
        let list = first_capture(&self.suppression_list, fragment)?;
        list.split(',')
            .map(|id| id.trim().parse().ok())
            .collect::<Option<SuppressionList>>()
            .filter(|ids| !ids.is_empty())
    }
}
