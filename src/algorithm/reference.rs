//! Reference table builder
//!
//! Runs every raw artifact of a source through its extractor and assembles the
//! reference library the resolver consumes.

use std::collections::btree_map::Entry;

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::algorithm::extract::{
    ExtractionStats, extract_hierarchy_rules, extract_labels, format_crosswalk,
};
use crate::config::BuildConfig;
use crate::error::{HccError, ReferenceTable, Result};
use crate::models::reference::ReferenceLibrary;
use crate::models::scheme::SchemeVersion;
use crate::source::{ArtifactKind, ArtifactSource, RawArtifact};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Extraction outcome of one raw artifact
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub name: String,
    pub version: SchemeVersion,
    pub year: i32,
    pub kind: ArtifactKind,
    #[serde(flatten)]
    pub stats: ExtractionStats,
}

/// Per-artifact diagnostics of a build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl BuildReport {
    /// Lines dropped across every artifact
    #[must_use]
    pub fn lines_skipped(&self) -> usize {
        self.artifacts.iter().map(|a| a.stats.lines_skipped).sum()
    }
}

/// A built library and its report
#[derive(Debug, Clone)]
pub struct ReferenceBuild {
    pub library: ReferenceLibrary,
    pub report: BuildReport,
}

/// Builds reference tables from raw artifacts
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    config: BuildConfig,
}

impl ReferenceBuilder {
    #[must_use]
    pub const fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the reference library of every artifact in `source`
    ///
    /// Fails when a label listing yields no categories, when a version receives
    /// two label or hierarchy artifacts, or when the crosswalk tables of a
    /// version disagree on a key.
    pub fn build(&self, source: &dyn ArtifactSource) -> Result<ReferenceBuild> {
        let artifacts = source.artifacts()?;
        info!("Building reference tables from {} raw artifacts", artifacts.len());

        let pb = create_main_progress_bar(artifacts.len() as u64, Some("Extracting reference tables"));
        let mut library = ReferenceLibrary::new();
        let mut report = BuildReport::default();

        for artifact in &artifacts {
            pb.set_message(artifact.name.clone());
            let stats = self.add_artifact(&mut library, artifact)?;
            report.artifacts.push(ArtifactReport {
                name: artifact.name.clone(),
                version: artifact.version,
                year: artifact.year,
                kind: artifact.kind,
                stats,
            });
            pb.inc(1);
        }
        finish_progress_bar(&pb, Some("Reference tables extracted"));

        Self::validate_crosswalks(&library)?;

        info!(
            "Built reference tables for {} versions ({} crosswalk tables, {} lines skipped)",
            library.categories.len(),
            library.crosswalks.len(),
            report.lines_skipped()
        );
        Ok(ReferenceBuild { library, report })
    }

    fn add_artifact(
        &self,
        library: &mut ReferenceLibrary,
        artifact: &RawArtifact,
    ) -> Result<ExtractionStats> {
        let text = artifact.text();
        let version = artifact.version;

        match artifact.kind {
            ArtifactKind::Labels => {
                let extraction = extract_labels(version, &text);
                if extraction.table.is_empty() {
                    return Err(HccError::empty(ReferenceTable::ConditionCategory, version));
                }
                match library.categories.entry(version) {
                    Entry::Occupied(_) => Err(HccError::DuplicateArtifact {
                        table: ReferenceTable::ConditionCategory,
                        version,
                    }),
                    Entry::Vacant(slot) => {
                        slot.insert(extraction.table);
                        Ok(extraction.stats)
                    }
                }
            }
            ArtifactKind::Hierarchy => {
                let extraction = extract_hierarchy_rules(version, &text);
                match library.hierarchies.entry(version) {
                    Entry::Occupied(_) => Err(HccError::DuplicateArtifact {
                        table: ReferenceTable::Hierarchy,
                        version,
                    }),
                    Entry::Vacant(slot) => {
                        slot.insert(extraction.table);
                        Ok(extraction.stats)
                    }
                }
            }
            ArtifactKind::Crosswalk(coding_system) => {
                let extraction = format_crosswalk(
                    version,
                    artifact.year,
                    coding_system,
                    &text,
                    self.config.include_supplemental,
                );
                library.crosswalks.push(extraction.table);
                Ok(extraction.stats)
            }
        }
    }

    /// Union each version's crosswalk tables once so conflicts surface at build time
    fn validate_crosswalks(library: &ReferenceLibrary) -> Result<()> {
        let versions = library.crosswalks.iter().map(|t| t.version).unique().sorted();
        for version in versions {
            let crosswalk = library.crosswalk(version)?;
            info!("{version} crosswalk holds {} distinct keys", crosswalk.len());
        }
        Ok(())
    }
}
