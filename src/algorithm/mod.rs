//! Algorithm implementations for HCC risk adjustment
//!
//! This module contains the reference table extractors, the builder that
//! assembles them into a reference library, and the resolver producing the
//! recipient x CC matrix.

pub mod extract;
pub mod reference;
pub mod resolver;

pub use reference::{BuildReport, ReferenceBuild, ReferenceBuilder};
pub use resolver::{HccResolver, Resolution, ResolutionStats, generate_hccs};
