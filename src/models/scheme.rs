//! Scheme versions
//!
//! The three supported generations of the CC definitions, label sets and
//! hierarchy logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HccError;

/// Last claim year for which the v21/v22 ICD-9 supplemental mappings apply
pub const ICD9_SUPPLEMENT_CUTOFF_YEAR: i32 = 2015;

/// A supported condition category scheme version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeVersion {
    /// Version 12 (earliest)
    V12,
    /// Version 21
    V21,
    /// Version 22
    V22,
}

impl SchemeVersion {
    /// All supported versions in chronological order
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::V12, Self::V21, Self::V22]
    }

    /// Canonical identifier used in artifact paths and table names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V12 => "v12",
            Self::V21 => "v21",
            Self::V22 => "v22",
        }
    }
}

impl fmt::Display for SchemeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeVersion {
    type Err = HccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v12" => Ok(Self::V12),
            "v21" => Ok(Self::V21),
            "v22" => Ok(Self::V22),
            _ => Err(HccError::UnsupportedVersion(s.to_string())),
        }
    }
}
