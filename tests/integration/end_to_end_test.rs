//! Raw artifacts to persisted tables to a resolved matrix

use risk_adjust::store::{read_diagnoses, read_library, write_diagnoses, write_library};
use risk_adjust::{
    ArtifactKind, CodingSystem, HccResolver, InMemorySource, ReferenceBuilder, ResolverConfig,
    SchemeVersion,
};

use crate::utils::{
    V12_HIERARCHY, V12_ICD9_2010, V12_LABELS, V22_HIERARCHY, V22_ICD9_2015, V22_ICD10_2017,
    V22_LABELS, date, icd9, icd10, scratch_dir,
};

#[test]
fn test_v12_pipeline_through_persisted_tables() {
    let source = InMemorySource::new()
        .with(SchemeVersion::V12, 2010, ArtifactKind::Labels, V12_LABELS)
        .with(SchemeVersion::V12, 2010, ArtifactKind::Hierarchy, V12_HIERARCHY)
        .with(
            SchemeVersion::V12,
            2010,
            ArtifactKind::Crosswalk(CodingSystem::Icd9),
            V12_ICD9_2010,
        );
    let build = ReferenceBuilder::default().build(&source).unwrap();

    let dir = scratch_dir("pipeline-v12");
    write_library(&dir, &build.library).unwrap();
    let library = read_library(&dir).unwrap();

    let diagnoses = dir.join("diagnoses.parquet");
    write_diagnoses(
        &diagnoses,
        &[
            icd9("A", "25040", date(2010, 2, 1)),
            icd9("A", "25000", date(2010, 3, 1)),
            icd9("A", "25010", date(2010, 4, 1)),
            icd9("B", "40403", date(2010, 5, 1)),
            icd9("B", "25050", date(2010, 5, 1)),
            icd9("C", "25000", date(2011, 1, 1)),
        ],
    )
    .unwrap();
    let records = read_diagnoses(&diagnoses).unwrap();

    let resolution = HccResolver::new(&library, ResolverConfig::default())
        .resolve(&records, SchemeVersion::V12)
        .unwrap();
    let matrix = resolution.matrix;

    // CC15 suppresses 17 and 19
    assert_eq!(matrix.present_ccs("A"), vec![15]);
    // supplemental ICD-9 mapping
    assert_eq!(matrix.present_ccs("B"), vec![18, 80]);
    // no 2011 crosswalk
    assert!(matrix.profile("C").is_none());
    assert_eq!(resolution.stats.unmapped_dropped, 1);
    assert_eq!(resolution.stats.suppressed, 2);
}

#[test]
fn test_v22_mixed_coding_systems() {
    let source = InMemorySource::new()
        .with(SchemeVersion::V22, 2017, ArtifactKind::Labels, V22_LABELS)
        .with(SchemeVersion::V22, 2017, ArtifactKind::Hierarchy, V22_HIERARCHY)
        .with(
            SchemeVersion::V22,
            2015,
            ArtifactKind::Crosswalk(CodingSystem::Icd9),
            V22_ICD9_2015,
        )
        .with(
            SchemeVersion::V22,
            2017,
            ArtifactKind::Crosswalk(CodingSystem::Icd10),
            V22_ICD10_2017,
        );
    let library = ReferenceBuilder::default().build(&source).unwrap().library;

    let records = vec![
        icd9("P1", "36202", date(2015, 7, 1)),
        icd10("P1", "E1010", date(2017, 2, 1)),
        icd10("P2", "I2109", date(2017, 2, 1)),
        icd10("P2", "I200", date(2017, 3, 1)),
        icd10("P2", "I208", date(2017, 3, 1)),
        icd9("P3", "4280", date(2015, 1, 1)),
        icd10("P3", "I110", date(2017, 1, 1)),
    ];

    let matrix = HccResolver::new(&library, ResolverConfig::default())
        .resolve(&records, SchemeVersion::V22)
        .unwrap()
        .matrix;

    assert_eq!(matrix.columns(), &[17, 18, 19, 85, 86, 87, 88]);
    assert_eq!(matrix.present_ccs("P1"), vec![17]);
    assert_eq!(matrix.present_ccs("P2"), vec![86]);
    assert_eq!(matrix.present_ccs("P3"), vec![85]);
}
