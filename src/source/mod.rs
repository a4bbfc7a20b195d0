//! Raw artifact sources
//!
//! The reference builder never touches the filesystem itself; it is handed an
//! `ArtifactSource` yielding tagged byte streams. Year and scheme version of a
//! raw artifact follow the `<year>/<scheme-version>/<filename>` convention.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{HccError, Result};
use crate::models::diagnosis::CodingSystem;
use crate::models::scheme::SchemeVersion;

/// What a raw artifact contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Label listing
    Labels,
    /// Hierarchy logic
    Hierarchy,
    /// Diagnosis code listing of one coding system
    #[serde(rename = "crosswalk")]
    Crosswalk(CodingSystem),
}

/// A raw regulatory artifact and where it belongs
#[derive(Debug, Clone)]
pub struct RawArtifact {
    pub version: SchemeVersion,
    pub year: i32,
    pub kind: ArtifactKind,
    /// Name used in logs and reports
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawArtifact {
    /// Artifact text; invalid UTF-8 sequences are replaced
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Capability yielding every raw artifact to build reference tables from
pub trait ArtifactSource {
    fn artifacts(&self) -> Result<Vec<RawArtifact>>;
}

/// Artifacts held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    artifacts: Vec<RawArtifact>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact, naming it after the path convention
    #[must_use]
    pub fn with(
        mut self,
        version: SchemeVersion,
        year: i32,
        kind: ArtifactKind,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.artifacts.push(RawArtifact {
            version,
            year,
            kind,
            name: format!("{year}/{version}/{kind:?}"),
            bytes: contents.into(),
        });
        self
    }
}

impl ArtifactSource for InMemorySource {
    fn artifacts(&self) -> Result<Vec<RawArtifact>> {
        Ok(self.artifacts.clone())
    }
}

/// Kind of a manifest entry as written in the manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Labels,
    Hierarchy,
    Icd9,
    Icd10,
}

impl From<ManifestKind> for ArtifactKind {
    fn from(kind: ManifestKind) -> Self {
        match kind {
            ManifestKind::Labels => Self::Labels,
            ManifestKind::Hierarchy => Self::Hierarchy,
            ManifestKind::Icd9 => Self::Crosswalk(CodingSystem::Icd9),
            ManifestKind::Icd10 => Self::Crosswalk(CodingSystem::Icd10),
        }
    }
}

/// One artifact listed in a manifest, relative to the source root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub kind: ManifestKind,
}

lazy_static! {
    static ref ARTIFACT_PATH: Regex = Regex::new(r"^(\d{4})/([^/]+)/[^/]+$").unwrap();
}

/// Parse year and scheme version from a `<year>/<scheme-version>/<filename>` path
pub fn parse_artifact_path(path: &str) -> Result<(i32, SchemeVersion)> {
    let normalized = path.replace('\\', "/");
    let caps = ARTIFACT_PATH
        .captures(normalized.trim_start_matches("./"))
        .ok_or_else(|| HccError::InvalidArtifactPath(path.to_string()))?;

    let year = caps[1]
        .parse::<i32>()
        .map_err(|_| HccError::InvalidArtifactPath(path.to_string()))?;
    let version = caps[2].parse::<SchemeVersion>()?;
    Ok((year, version))
}

/// Artifacts read from a directory tree following a manifest
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl FileSystemSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, entries: Vec<ManifestEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    /// Create a source from a JSON manifest file
    pub fn from_manifest(root: impl Into<PathBuf>, manifest: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(manifest).map_err(|source| HccError::ArtifactRead {
            path: manifest.display().to_string(),
            source,
        })?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&contents)?;
        Ok(Self::new(root, entries))
    }

    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }
}

impl ArtifactSource for FileSystemSource {
    fn artifacts(&self) -> Result<Vec<RawArtifact>> {
        self.entries
            .iter()
            .map(|entry| {
                let (year, version) = parse_artifact_path(&entry.path)?;
                let full_path = self.root.join(&entry.path);
                debug!("Reading raw artifact {}", full_path.display());
                let bytes = std::fs::read(&full_path).map_err(|source| HccError::ArtifactRead {
                    path: full_path.display().to_string(),
                    source,
                })?;
                Ok(RawArtifact {
                    version,
                    year,
                    kind: entry.kind.into(),
                    name: entry.path.clone(),
                    bytes,
                })
            })
            .collect()
    }
}
