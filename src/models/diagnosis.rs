//! Diagnosis record model
//!
//! This module contains the diagnosis records the resolver scores. Records are
//! input only; the claim year is derived from the claim date on demand.

use std::fmt;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{HccError, Result};

/// Diagnosis coding system of a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CodingSystem {
    /// ICD-9
    Icd9,
    /// ICD-10
    Icd10,
}

impl CodingSystem {
    /// Numeric identifier used in persisted tables (9 or 10)
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Icd9 => 9,
            Self::Icd10 => 10,
        }
    }
}

impl TryFrom<i32> for CodingSystem {
    type Error = HccError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            9 => Ok(Self::Icd9),
            10 => Ok(Self::Icd10),
            other => Err(HccError::InvalidValue {
                field: "coding_system",
                value: other.to_string(),
            }),
        }
    }
}

impl From<CodingSystem> for i32 {
    fn from(value: CodingSystem) -> Self {
        value.as_i32()
    }
}

impl fmt::Display for CodingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ICD-{}", self.as_i32())
    }
}

/// A single diagnosis on a claim for a recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    /// Identifier of the person being scored
    pub recipient_id: String,
    /// Diagnosis code as it appears in the crosswalk (no dots)
    pub diagnosis_code: String,
    /// Coding system of `diagnosis_code`
    pub coding_system: CodingSystem,
    /// Date of the claim carrying the diagnosis
    pub claim_date: NaiveDate,
}

impl DiagnosisRecord {
    /// Create a new diagnosis record
    #[must_use]
    pub fn new(
        recipient_id: impl Into<String>,
        diagnosis_code: impl Into<String>,
        coding_system: CodingSystem,
        claim_date: NaiveDate,
    ) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            diagnosis_code: diagnosis_code.into(),
            coding_system,
            claim_date,
        }
    }

    /// Calendar year of the claim, used for crosswalk lookup
    #[must_use]
    pub fn year(&self) -> i32 {
        self.claim_date.year()
    }

    /// Get the Arrow schema for diagnosis record input
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("recipient_id", DataType::Utf8, false),
            Field::new("diagnosis_code", DataType::Utf8, false),
            Field::new("coding_system", DataType::Int32, false),
            Field::new("claim_date", DataType::Date32, false),
        ])
    }

    /// Convert a `RecordBatch` to diagnosis records
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }

    /// Convert diagnosis records to a `RecordBatch`
    pub fn to_record_batch(records: &[Self]) -> Result<RecordBatch> {
        let fields: Vec<arrow::datatypes::FieldRef> = Self::schema()
            .fields()
            .iter()
            .map(std::sync::Arc::clone)
            .collect();
        Ok(serde_arrow::to_record_batch(&fields, &records)?)
    }
}
