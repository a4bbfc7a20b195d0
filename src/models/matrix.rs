//! Recipient x CC presence matrix
//!
//! The resolver output: one row per recipient with at least one mapped
//! diagnosis, one boolean column per CC in the scheme version's universe.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::scheme::SchemeVersion;

/// Presence flags of one recipient, indexed like `HccMatrix::columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientProfile {
    pub recipient_id: String,
    pub presence: Vec<bool>,
}

impl RecipientProfile {
    #[must_use]
    pub fn new(recipient_id: impl Into<String>, width: usize) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            presence: vec![false; width],
        }
    }
}

/// Boolean matrix of recipients by condition categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HccMatrix {
    pub version: SchemeVersion,
    columns: Vec<i32>,
    column_index: FxHashMap<i32, usize>,
    rows: Vec<RecipientProfile>,
}

impl HccMatrix {
    /// Create a matrix over a fixed column universe
    ///
    /// Rows are sorted by recipient id; every row is padded or truncated to the
    /// column count so no row can carry a column outside the universe.
    #[must_use]
    pub fn new(version: SchemeVersion, columns: Vec<i32>, mut rows: Vec<RecipientProfile>) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(idx, &cc)| (cc, idx))
            .collect();
        for row in &mut rows {
            row.presence.resize(columns.len(), false);
        }
        rows.sort_by(|a, b| a.recipient_id.cmp(&b.recipient_id));
        Self {
            version,
            columns,
            column_index,
            rows,
        }
    }

    /// CC ids in column order
    #[must_use]
    pub fn columns(&self) -> &[i32] {
        &self.columns
    }

    /// Position of a CC column
    #[must_use]
    pub fn column_of(&self, cc_id: i32) -> Option<usize> {
        self.column_index.get(&cc_id).copied()
    }

    #[must_use]
    pub fn rows(&self) -> &[RecipientProfile] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RecipientProfile] {
        &mut self.rows
    }

    /// Number of recipient rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn profile(&self, recipient_id: &str) -> Option<&RecipientProfile> {
        self.rows
            .binary_search_by(|row| row.recipient_id.as_str().cmp(recipient_id))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Presence of a CC for a recipient; `None` if either is not in the matrix
    #[must_use]
    pub fn get(&self, recipient_id: &str, cc_id: i32) -> Option<bool> {
        let col = self.column_of(cc_id)?;
        self.profile(recipient_id).map(|row| row.presence[col])
    }

    /// CCs flagged for a recipient, in column order
    #[must_use]
    pub fn present_ccs(&self, recipient_id: &str) -> Vec<i32> {
        self.profile(recipient_id)
            .map(|row| {
                row.presence
                    .iter()
                    .zip(&self.columns)
                    .filter_map(|(&present, &cc)| present.then_some(cc))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Column name used when the matrix is materialised
    #[must_use]
    pub fn column_name(cc_id: i32) -> String {
        format!("HCC{cc_id}")
    }

    /// Get the Arrow schema for this matrix
    #[must_use]
    pub fn schema(&self) -> Schema {
        let mut fields = Vec::with_capacity(self.columns.len() + 1);
        fields.push(Field::new("recipient_id", DataType::Utf8, false));
        fields.extend(
            self.columns
                .iter()
                .map(|&cc| Field::new(Self::column_name(cc), DataType::Boolean, false)),
        );
        Schema::new(fields)
    }

    /// Convert the matrix to a `RecordBatch`
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len() + 1);
        arrays.push(Arc::new(StringArray::from_iter_values(
            self.rows.iter().map(|row| row.recipient_id.as_str()),
        )));
        for col in 0..self.columns.len() {
            let values: Vec<bool> = self.rows.iter().map(|row| row.presence[col]).collect();
            arrays.push(Arc::new(BooleanArray::from(values)));
        }
        Ok(RecordBatch::try_new(Arc::new(self.schema()), arrays)?)
    }
}
