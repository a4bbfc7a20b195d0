//! Error handling for reference table building and HCC resolution.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::models::diagnosis::CodingSystem;
use crate::models::scheme::SchemeVersion;

/// The reference tables a scheme version is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
    /// CC id to label listing; defines the column universe
    ConditionCategory,
    /// Ordered suppression rules
    Hierarchy,
    /// Diagnosis code to CC mapping
    Crosswalk,
}

impl std::fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConditionCategory => write!(f, "condition category"),
            Self::Hierarchy => write!(f, "hierarchy rule"),
            Self::Crosswalk => write!(f, "crosswalk"),
        }
    }
}

/// Errors raised while building reference tables or resolving HCCs
#[derive(Debug, thiserror::Error)]
pub enum HccError {
    /// The requested scheme identifier is not one of v12, v21 or v22
    #[error("Unsupported scheme version: '{0}' (expected one of v12, v21, v22)")]
    UnsupportedVersion(String),

    /// A reference table for the version yielded zero rows
    #[error("Empty {table} table for scheme version {version}")]
    EmptyReferenceTable {
        table: ReferenceTable,
        version: SchemeVersion,
    },

    /// A reference table for the version was never supplied
    #[error("No {table} table available for scheme version {version}")]
    MissingReferenceTable {
        table: ReferenceTable,
        version: SchemeVersion,
    },

    /// The same crosswalk key maps to two different CCs
    #[error(
        "Inconsistent crosswalk key ({diagnosis_code}, {year}, {coding_system}) in scheme {version}: mapped to both CC {existing} and CC {conflicting}"
    )]
    InconsistentCrosswalkKey {
        version: SchemeVersion,
        diagnosis_code: String,
        year: i32,
        coding_system: CodingSystem,
        existing: i32,
        conflicting: i32,
    },

    /// Two label or hierarchy artifacts were supplied for one version
    #[error("Duplicate {table} artifact for scheme version {version}")]
    DuplicateArtifact {
        table: ReferenceTable,
        version: SchemeVersion,
    },

    /// An artifact path does not follow `<year>/<scheme-version>/<filename>`
    #[error("Invalid artifact path '{0}': expected <year>/<scheme-version>/<filename>")]
    InvalidArtifactPath(String),

    /// A raw artifact could not be read
    #[error("Failed to read artifact {path}: {source}")]
    ArtifactRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A persisted value could not be interpreted
    #[error("Invalid {field} value: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Arrow (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_arrow::Error),

    /// Manifest or report JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HccError {
    /// Shorthand for an empty reference table error
    #[must_use]
    pub const fn empty(table: ReferenceTable, version: SchemeVersion) -> Self {
        Self::EmptyReferenceTable { table, version }
    }

    /// Shorthand for a missing reference table error
    #[must_use]
    pub const fn missing(table: ReferenceTable, version: SchemeVersion) -> Self {
        Self::MissingReferenceTable { table, version }
    }
}

/// Result type for HCC operations
pub type Result<T> = std::result::Result<T, HccError>;
