//! A Rust library for hierarchical condition category (HCC) risk adjustment.
//!
//! Builds normalized reference tables (condition category labels, ordered
//! hierarchy rules and diagnosis crosswalks) from the regulatory text
//! artifacts of the v12, v21 and v22 schemes, and resolves diagnosis records
//! into a recipient x CC boolean matrix with the hierarchy cascade applied.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BuildConfig, ResolverConfig};
pub use error::{HccError, ReferenceTable, Result};
pub use models::{
    CodingSystem, ConditionCategoryTable, CrosswalkTable, DiagnosisRecord, HccMatrix,
    HierarchyRuleTable, RecipientProfile, ReferenceLibrary, SchemeVersion,
};

// Building and resolving
pub use algorithm::{
    BuildReport, HccResolver, ReferenceBuild, ReferenceBuilder, Resolution, ResolutionStats,
    generate_hccs,
};

// Artifact sources
pub use source::{ArtifactKind, ArtifactSource, FileSystemSource, InMemorySource, RawArtifact};
