//! Domain models for HCC resolution
//!
//! This module contains the scheme versions, diagnosis input records, the
//! reference tables and the recipient matrix produced by the resolver.

pub mod diagnosis;
pub mod matrix;
pub mod reference;
pub mod scheme;

// Re-export commonly used types
pub use diagnosis::{CodingSystem, DiagnosisRecord};
pub use matrix::{HccMatrix, RecipientProfile};
pub use reference::{
    ConditionCategory, ConditionCategoryTable, Crosswalk, CrosswalkEntry, CrosswalkTable,
    HierarchyRule, HierarchyRuleTable, ReferenceLibrary,
};
pub use scheme::SchemeVersion;
