//! Hierarchy cascade
//!
//! Replays the ordered hierarchy rules over the presence matrix. The rule
//! order is an invariant: each rule observes the flags left by every earlier
//! rule, so a trigger cleared by an earlier rule no longer suppresses.
//! Recipient rows are independent and may be processed in parallel, each row
//! folding over the full ordered rule list.

use log::debug;
use rayon::prelude::*;

use crate::models::matrix::HccMatrix;
use crate::models::reference::HierarchyRule;

/// A hierarchy rule resolved to matrix column positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub trigger: usize,
    pub suppressed: usize,
}

/// Resolve rules to column positions, preserving order
///
/// A rule naming a CC outside the matrix columns can never fire or flip a
/// column, so it is left out.
#[must_use]
pub fn compile_rules(rules: &[HierarchyRule], matrix: &HccMatrix) -> Vec<ColumnRule> {
    rules
        .iter()
        .filter_map(|rule| {
            match (matrix.column_of(rule.trigger_cc), matrix.column_of(rule.suppressed_cc)) {
                (Some(trigger), Some(suppressed)) => Some(ColumnRule {
                    trigger,
                    suppressed,
                }),
                _ => {
                    debug!(
                        "Skipping {} hierarchy rule {} -> {}: CC not in universe",
                        matrix.version, rule.trigger_cc, rule.suppressed_cc
                    );
                    None
                }
            }
        })
        .collect()
}

/// Apply the ordered rules to one row, returning how many flags were cleared
pub fn cascade_row(presence: &mut [bool], rules: &[ColumnRule]) -> usize {
    rules.iter().fold(0, |cleared, rule| {
        if presence[rule.trigger] && presence[rule.suppressed] {
            presence[rule.suppressed] = false;
            cleared + 1
        } else {
            cleared
        }
    })
}

/// Apply the ordered hierarchy rules to every row of the matrix
///
/// Only ever turns flags off. Returns the number of flags cleared.
pub fn apply_hierarchy(matrix: &mut HccMatrix, rules: &[HierarchyRule], parallel: bool) -> usize {
    let compiled = compile_rules(rules, matrix);
    if compiled.is_empty() {
        return 0;
    }

    let rows = matrix.rows_mut();
    if parallel {
        rows.par_iter_mut()
            .map(|row| cascade_row(&mut row.presence, &compiled))
            .sum()
    } else {
        rows.iter_mut()
            .map(|row| cascade_row(&mut row.presence, &compiled))
            .sum()
    }
}
