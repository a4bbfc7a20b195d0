//! HCC resolution
//!
//! Produces the recipient x CC boolean matrix of a scheme version from a set
//! of diagnosis records:
//!
//! 1. union the crosswalk tables tagged with the version,
//! 2. look up each record by (code, claim year, coding system), dropping unmapped records,
//! 3. mark presence per recipient over the version's full CC universe,
//! 4. replay the hierarchy rules in their stored order.
//!
//! Nothing is cached; every call recomputes from the reference library.

pub mod cascade;
pub mod presence;

use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::models::diagnosis::DiagnosisRecord;
use crate::models::matrix::HccMatrix;
use crate::models::reference::ReferenceLibrary;
use crate::models::scheme::SchemeVersion;

pub use cascade::{apply_hierarchy, cascade_row, compile_rules};
pub use presence::{Presence, build_presence};

/// Diagnostics of one resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Diagnosis records supplied
    pub records: usize,
    /// Records matched to a crosswalk entry
    pub mapped_records: usize,
    /// Records dropped for lack of a crosswalk entry
    pub unmapped_dropped: usize,
    /// Mapped records whose CC is not in the version's universe
    pub outside_universe: usize,
    /// Recipient rows in the matrix
    pub recipients: usize,
    /// Flags cleared by the hierarchy cascade
    pub suppressed: usize,
}

/// Output of a resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub matrix: HccMatrix,
    pub stats: ResolutionStats,
}

/// Resolves diagnosis records against a reference library
#[derive(Debug, Clone)]
pub struct HccResolver<'a> {
    library: &'a ReferenceLibrary,
    config: ResolverConfig,
}

impl<'a> HccResolver<'a> {
    #[must_use]
    pub const fn new(library: &'a ReferenceLibrary, config: ResolverConfig) -> Self {
        Self { library, config }
    }

    /// Resolve a version given by its identifier, e.g. `"v22"`
    pub fn resolve_named(&self, records: &[DiagnosisRecord], version: &str) -> Result<Resolution> {
        self.resolve(records, version.parse()?)
    }

    /// Resolve the recipient x CC matrix of `version`
    ///
    /// Fails before any work when the version's CC universe is empty, its
    /// hierarchy is missing, no crosswalk table is tagged with it, or its
    /// crosswalk tables disagree on a key.
    pub fn resolve(&self, records: &[DiagnosisRecord], version: SchemeVersion) -> Result<Resolution> {
        let start = Instant::now();
        let categories = self.library.categories_for(version)?;
        let hierarchy = self.library.hierarchy_for(version)?;
        let crosswalk = self.library.crosswalk(version)?;

        let columns = categories.cc_ids();
        let parallel = self.config.runs_parallel(records.len());
        info!(
            "Resolving {} diagnosis records against {version}: {} CCs, {} rules, {} crosswalk keys{}",
            records.len(),
            columns.len(),
            hierarchy.len(),
            crosswalk.len(),
            if parallel { " (parallel)" } else { "" }
        );

        let presence = build_presence(
            records,
            &crosswalk,
            &columns,
            self.config.shard_count,
            parallel,
        );
        let counts = presence.counts;

        let mut matrix = HccMatrix::new(version, columns, presence.rows);
        let suppressed = apply_hierarchy(&mut matrix, &hierarchy.rules, parallel);

        let stats = ResolutionStats {
            records: records.len(),
            mapped_records: counts.mapped,
            unmapped_dropped: counts.unmapped,
            outside_universe: counts.outside_universe,
            recipients: matrix.len(),
            suppressed,
        };
        info!(
            "Resolved {} recipients for {version} in {:?} ({} unmapped records dropped, {} flags suppressed)",
            stats.recipients,
            start.elapsed(),
            stats.unmapped_dropped,
            stats.suppressed
        );

        Ok(Resolution { matrix, stats })
    }
}

/// Resolve with the default configuration
pub fn generate_hccs(
    records: &[DiagnosisRecord],
    version: SchemeVersion,
    library: &ReferenceLibrary,
) -> Result<HccMatrix> {
    HccResolver::new(library, ResolverConfig::default())
        .resolve(records, version)
        .map(|resolution| resolution.matrix)
}
