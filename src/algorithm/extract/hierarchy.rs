//! Hierarchy rule extraction
//!
//! Parses a version's hierarchy logic into the ordered list of suppression
//! pairs. Source order is preserved exactly, including duplicate pairs, since
//! the resolver replays the rules in this order.

use log::{debug, info};

use super::grammar::SuppressionList;
use super::{Extraction, ExtractionStats, content_lines, grammar};
use crate::models::reference::{HierarchyRule, HierarchyRuleTable};
use crate::models::scheme::SchemeVersion;

/// A hierarchy line in its grouped form: one trigger, many suppressed CCs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRule {
    pub trigger_cc: i32,
    pub suppressed: SuppressionList,
}

impl GroupedRule {
    /// One row per suppressed CC, in listed order
    pub fn explode(&self) -> impl Iterator<Item = HierarchyRule> + '_ {
        self.suppressed
            .iter()
            .map(|&suppressed_cc| HierarchyRule::new(self.trigger_cc, suppressed_cc))
    }
}

/// Parse the grouped rules of a raw hierarchy artifact, in source order
pub fn parse_grouped_rules(version: SchemeVersion, text: &str) -> (Vec<GroupedRule>, ExtractionStats) {
    let grammar = grammar(version);
    let mut stats = ExtractionStats::default();
    let mut grouped = Vec::new();

    for line in content_lines(text) {
        stats.lines_read += 1;
        let parsed = grammar.logic_fragment(line).and_then(|fragment| {
            Some(GroupedRule {
                trigger_cc: grammar.trigger(fragment)?,
                suppressed: grammar.suppression_list(fragment)?,
            })
        });

        match parsed {
            Some(rule) => grouped.push(rule),
            None => {
                stats.lines_skipped += 1;
                debug!("Skipping {version} hierarchy line: {}", line.trim());
            }
        }
    }

    (grouped, stats)
}

/// Extract the ordered hierarchy rule table from raw hierarchy logic
#[must_use]
pub fn extract_hierarchy_rules(version: SchemeVersion, text: &str) -> Extraction<HierarchyRuleTable> {
    let (grouped, mut stats) = parse_grouped_rules(version, text);
    let rules: Vec<HierarchyRule> = grouped.iter().flat_map(GroupedRule::explode).collect();

    stats.rows_emitted = rules.len();
    info!(
        "Extracted {} hierarchy rules from {} trigger lines for {version} ({} lines skipped)",
        rules.len(),
        grouped.len(),
        stats.lines_skipped
    );

    Extraction {
        table: HierarchyRuleTable::new(version, rules),
        stats,
    }
}
