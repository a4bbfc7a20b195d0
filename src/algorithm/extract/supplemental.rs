//! Supplemental ICD-9 crosswalk mappings
//!
//! Mappings documented in the regulatory mapping macros but absent from the
//! published ICD-9 crosswalk files. They are kept as data, apart from parsed
//! rows, so every injected entry can be audited against its source.

use crate::models::diagnosis::CodingSystem;
use crate::models::reference::CrosswalkEntry;
use crate::models::scheme::{ICD9_SUPPLEMENT_CUTOFF_YEAR, SchemeVersion};

/// A group of ICD-9 codes added to a version's crosswalk for eligible years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplementalMapping {
    pub version: SchemeVersion,
    /// Last year the mapping applies to; `None` applies to every year
    pub through_year: Option<i32>,
    pub cc_id: i32,
    pub diagnosis_codes: &'static [&'static str],
}

impl SupplementalMapping {
    #[must_use]
    pub fn applies_to(&self, version: SchemeVersion, year: i32) -> bool {
        self.version == version && self.through_year.is_none_or(|last| year <= last)
    }
}

/// Every supplemental mapping, in injection order
pub static SUPPLEMENTAL_ICD9: &[SupplementalMapping] = &[
    SupplementalMapping {
        version: SchemeVersion::V12,
        through_year: None,
        cc_id: 80,
        diagnosis_codes: &["40403", "40413", "40493"],
    },
    SupplementalMapping {
        version: SchemeVersion::V21,
        through_year: Some(ICD9_SUPPLEMENT_CUTOFF_YEAR),
        cc_id: 18,
        diagnosis_codes: &["3572", "36202"],
    },
    SupplementalMapping {
        version: SchemeVersion::V21,
        through_year: Some(ICD9_SUPPLEMENT_CUTOFF_YEAR),
        cc_id: 85,
        diagnosis_codes: &["40401", "40403", "40411", "40413", "40491", "40493"],
    },
    SupplementalMapping {
        version: SchemeVersion::V22,
        through_year: Some(ICD9_SUPPLEMENT_CUTOFF_YEAR),
        cc_id: 18,
        diagnosis_codes: &["36202"],
    },
    SupplementalMapping {
        version: SchemeVersion::V22,
        through_year: Some(ICD9_SUPPLEMENT_CUTOFF_YEAR),
        cc_id: 85,
        diagnosis_codes: &["40403", "40413", "40493"],
    },
];

/// Supplemental entries for one crosswalk file
///
/// ICD-10 files never receive supplements.
#[must_use]
pub fn supplemental_entries(
    version: SchemeVersion,
    year: i32,
    coding_system: CodingSystem,
) -> Vec<CrosswalkEntry> {
    if coding_system != CodingSystem::Icd9 {
        return Vec::new();
    }

    SUPPLEMENTAL_ICD9
        .iter()
        .filter(|mapping| mapping.applies_to(version, year))
        .flat_map(|mapping| {
            mapping.diagnosis_codes.iter().map(move |code| CrosswalkEntry {
                diagnosis_code: (*code).to_string(),
                cc_id: mapping.cc_id,
                coding_system,
                year,
            })
        })
        .collect()
}
