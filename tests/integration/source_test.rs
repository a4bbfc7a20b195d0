use std::path::Path;

use risk_adjust::source::{ManifestEntry, ManifestKind, parse_artifact_path};
use risk_adjust::{
    ArtifactKind, ArtifactSource, CodingSystem, FileSystemSource, HccError, ReferenceBuilder,
    SchemeVersion,
};

use crate::utils::{V22_HIERARCHY, V22_ICD10_2017, V22_LABELS, scratch_dir};

fn write_artifact(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_manifest_source_reads_tagged_artifacts() {
    let root = scratch_dir("manifest");
    write_artifact(&root, "2017/v22/F2217O1M.TXT", V22_LABELS);
    write_artifact(&root, "2017/v22/V22H79H1.TXT", V22_HIERARCHY);
    write_artifact(&root, "2017/v22/F2217O1P.TXT", V22_ICD10_2017);

    let manifest = root.join("manifest.json");
    std::fs::write(
        &manifest,
        r#"[
            {"path": "2017/v22/F2217O1M.TXT", "kind": "labels"},
            {"path": "2017/v22/V22H79H1.TXT", "kind": "hierarchy"},
            {"path": "2017/v22/F2217O1P.TXT", "kind": "icd10"}
        ]"#,
    )
    .unwrap();

    let source = FileSystemSource::from_manifest(&root, &manifest).unwrap();
    assert_eq!(source.entries().len(), 3);

    let artifacts = source.artifacts().unwrap();
    assert!(artifacts.iter().all(|a| a.year == 2017 && a.version == SchemeVersion::V22));
    assert_eq!(artifacts[2].kind, ArtifactKind::Crosswalk(CodingSystem::Icd10));

    let build = ReferenceBuilder::default().build(&source).unwrap();
    let crosswalk = build.library.crosswalk(SchemeVersion::V22).unwrap();
    assert_eq!(crosswalk.lookup("I2109", 2017, CodingSystem::Icd10), Some(86));
}

#[test]
fn test_missing_artifact_fails() {
    let root = scratch_dir("missing-artifact");
    let source = FileSystemSource::new(
        &root,
        vec![ManifestEntry {
            path: "2016/v21/absent.txt".to_string(),
            kind: ManifestKind::Icd9,
        }],
    );

    let err = source.artifacts().unwrap_err();
    assert!(matches!(err, HccError::ArtifactRead { .. }));
}

#[test]
fn test_artifact_outside_convention_fails() {
    let root = scratch_dir("bad-path");
    let source = FileSystemSource::new(
        &root,
        vec![ManifestEntry {
            path: "labels.txt".to_string(),
            kind: ManifestKind::Labels,
        }],
    );

    let err = source.artifacts().unwrap_err();
    assert!(matches!(err, HccError::InvalidArtifactPath(_)));
}

#[test]
fn test_artifact_path_with_unknown_version() {
    let err = parse_artifact_path("2016/v24/labels.txt").unwrap_err();
    assert!(matches!(err, HccError::UnsupportedVersion(_)));
    assert_eq!(
        parse_artifact_path(r"2014\v21\F2114H1M.TXT").unwrap(),
        (2014, SchemeVersion::V21)
    );
}
