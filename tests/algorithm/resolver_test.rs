use risk_adjust::algorithm::resolver::apply_hierarchy;
use risk_adjust::{
    CodingSystem, HccError, HccResolver, ReferenceTable, ResolverConfig, SchemeVersion,
    generate_hccs,
};

use crate::utils::{
    categories, crosswalk, date, diabetes_library, icd9, icd10, library_with, rules,
};

#[test]
fn test_end_to_end_scenario() {
    let library = diabetes_library();
    let records = vec![
        icd10("R1", "E11.9", date(2020, 3, 1)),
        icd10("R1", "E11.65", date(2020, 5, 1)),
        icd10("R1", "I10", date(2020, 6, 1)),
        icd10("R2", "E11.9", date(2020, 1, 1)),
    ];

    let matrix = generate_hccs(&records, SchemeVersion::V22, &library).unwrap();

    assert_eq!(matrix.columns(), &[1, 2, 3]);
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.get("R1", 1), Some(true));
    assert_eq!(matrix.get("R1", 2), Some(false));
    assert_eq!(matrix.get("R1", 3), Some(true));
    assert_eq!(matrix.present_ccs("R2"), vec![1]);
}

#[test]
fn test_resolution_stats() {
    let library = diabetes_library();
    let records = vec![
        icd10("R1", "E11.9", date(2020, 3, 1)),
        icd10("R1", "E11.65", date(2020, 5, 1)),
        icd10("R2", "Z00.0", date(2020, 1, 1)),
    ];

    let resolution = HccResolver::new(&library, ResolverConfig::new().sequential())
        .resolve(&records, SchemeVersion::V22)
        .unwrap();

    let stats = resolution.stats;
    assert_eq!(stats.records, 3);
    assert_eq!(stats.mapped_records, 2);
    assert_eq!(stats.unmapped_dropped, 1);
    assert_eq!(stats.recipients, 1);
    assert_eq!(stats.suppressed, 1);
}

#[test]
fn test_unmapped_records_are_dropped() {
    let library = diabetes_library();
    let records = vec![
        // unknown code
        icd10("R1", "Z00.0", date(2020, 3, 1)),
        // known code, no crosswalk for the claim year
        icd10("R2", "E11.9", date(2019, 12, 31)),
        // known code under the other coding system
        icd9("R3", "E11.9", date(2020, 3, 1)),
        icd10("R4", "I10", date(2020, 3, 1)),
    ];

    let matrix = generate_hccs(&records, SchemeVersion::V22, &library).unwrap();

    assert_eq!(matrix.len(), 1);
    assert!(matrix.profile("R1").is_none());
    assert!(matrix.profile("R2").is_none());
    assert!(matrix.profile("R3").is_none());
    assert_eq!(matrix.present_ccs("R4"), vec![3]);
}

#[test]
fn test_columns_cover_universe_only() {
    let library = library_with(
        categories(SchemeVersion::V21, &[(10, "A"), (20, "B"), (30, "C")]),
        rules(SchemeVersion::V21, &[(10, 99)]),
        vec![crosswalk(
            SchemeVersion::V21,
            2018,
            CodingSystem::Icd10,
            &[("X1", 20), ("X9", 99)],
        )],
    );
    let records = vec![
        icd10("R1", "X1", date(2018, 2, 1)),
        icd10("R2", "X9", date(2018, 2, 1)),
    ];

    let resolution = HccResolver::new(&library, ResolverConfig::default())
        .resolve(&records, SchemeVersion::V21)
        .unwrap();
    let matrix = resolution.matrix;

    assert_eq!(matrix.columns(), &[10, 20, 30]);
    assert!(matrix.column_of(99).is_none());
    assert!(matrix.rows().iter().all(|row| row.presence.len() == 3));
    assert_eq!(matrix.present_ccs("R1"), vec![20]);
    // mapped, but only to a CC outside the universe
    assert_eq!(matrix.profile("R2").unwrap().presence, vec![false; 3]);
    assert_eq!(resolution.stats.outside_universe, 1);
}

#[test]
fn test_rows_sorted_by_recipient() {
    let library = diabetes_library();
    let records = vec![
        icd10("R3", "I10", date(2020, 3, 1)),
        icd10("R1", "I10", date(2020, 3, 1)),
        icd10("R2", "I10", date(2020, 3, 1)),
        icd10("R1", "I10", date(2020, 4, 1)),
    ];

    let matrix = generate_hccs(&records, SchemeVersion::V22, &library).unwrap();
    let ids: Vec<&str> = matrix.rows().iter().map(|r| r.recipient_id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2", "R3"]);
}

#[test]
fn test_hierarchy_order_is_significant() {
    let universe = categories(SchemeVersion::V22, &[(1, "A"), (2, "B"), (3, "C")]);
    let table = crosswalk(
        SchemeVersion::V22,
        2020,
        CodingSystem::Icd10,
        &[("A1", 1), ("B1", 2), ("C1", 3)],
    );
    let records = vec![
        icd10("R1", "A1", date(2020, 1, 1)),
        icd10("R1", "B1", date(2020, 1, 1)),
        icd10("R1", "C1", date(2020, 1, 1)),
    ];

    // 1 suppresses 2 before 2 gets to suppress 3
    let forward = library_with(
        universe.clone(),
        rules(SchemeVersion::V22, &[(1, 2), (2, 3)]),
        vec![table.clone()],
    );
    let matrix = generate_hccs(&records, SchemeVersion::V22, &forward).unwrap();
    assert_eq!(matrix.present_ccs("R1"), vec![1, 3]);

    let reversed = library_with(
        universe,
        rules(SchemeVersion::V22, &[(2, 3), (1, 2)]),
        vec![table],
    );
    let matrix = generate_hccs(&records, SchemeVersion::V22, &reversed).unwrap();
    assert_eq!(matrix.present_ccs("R1"), vec![1]);
}

#[test]
fn test_cascade_is_idempotent() {
    let library = diabetes_library();
    let records = vec![
        icd10("R1", "E11.9", date(2020, 3, 1)),
        icd10("R1", "E11.65", date(2020, 5, 1)),
    ];
    let mut matrix = generate_hccs(&records, SchemeVersion::V22, &library).unwrap();
    let resolved = matrix.clone();

    let hierarchy = library.hierarchy_for(SchemeVersion::V22).unwrap();
    assert_eq!(apply_hierarchy(&mut matrix, &hierarchy.rules, false), 0);
    assert_eq!(matrix, resolved);
}

#[test]
fn test_rules_naming_unknown_ccs_are_skipped() {
    let library = library_with(
        categories(SchemeVersion::V12, &[(5, "A"), (6, "B")]),
        rules(SchemeVersion::V12, &[(7, 5), (5, 8), (5, 6)]),
        vec![crosswalk(
            SchemeVersion::V12,
            2012,
            CodingSystem::Icd9,
            &[("111", 5), ("222", 6)],
        )],
    );
    let records = vec![
        icd9("R1", "111", date(2012, 1, 1)),
        icd9("R1", "222", date(2012, 1, 1)),
    ];

    let matrix = generate_hccs(&records, SchemeVersion::V12, &library).unwrap();
    assert_eq!(matrix.present_ccs("R1"), vec![5]);
}

#[test]
fn test_empty_hierarchy_leaves_presence() {
    let library = library_with(
        categories(SchemeVersion::V12, &[(5, "A"), (6, "B")]),
        rules(SchemeVersion::V12, &[]),
        vec![crosswalk(
            SchemeVersion::V12,
            2012,
            CodingSystem::Icd9,
            &[("111", 5), ("222", 6)],
        )],
    );
    let records = vec![
        icd9("R1", "111", date(2012, 1, 1)),
        icd9("R1", "222", date(2012, 1, 1)),
    ];

    let matrix = generate_hccs(&records, SchemeVersion::V12, &library).unwrap();
    assert_eq!(matrix.present_ccs("R1"), vec![5, 6]);
}

#[test]
fn test_empty_input_yields_empty_matrix() {
    let library = diabetes_library();
    let matrix = generate_hccs(&[], SchemeVersion::V22, &library).unwrap();
    assert!(matrix.is_empty());
    assert_eq!(matrix.columns(), &[1, 2, 3]);
}

#[test]
fn test_unsupported_version_name_fails() {
    let library = diabetes_library();
    let resolver = HccResolver::new(&library, ResolverConfig::default());

    let err = resolver.resolve_named(&[], "v24").unwrap_err();
    assert!(matches!(err, HccError::UnsupportedVersion(ref v) if v == "v24"));

    let matrix = resolver.resolve_named(&[], " V22 ").unwrap().matrix;
    assert_eq!(matrix.version, SchemeVersion::V22);
}

#[test]
fn test_missing_categories_fail() {
    let library = diabetes_library();
    let err = generate_hccs(&[], SchemeVersion::V12, &library).unwrap_err();
    assert!(matches!(
        err,
        HccError::EmptyReferenceTable {
            table: ReferenceTable::ConditionCategory,
            version: SchemeVersion::V12
        }
    ));
}

#[test]
fn test_missing_hierarchy_fails() {
    let mut library = diabetes_library();
    library.hierarchies.clear();
    let err = generate_hccs(&[], SchemeVersion::V22, &library).unwrap_err();
    assert!(matches!(
        err,
        HccError::MissingReferenceTable {
            table: ReferenceTable::Hierarchy,
            ..
        }
    ));
}

#[test]
fn test_missing_crosswalk_fails() {
    let mut library = diabetes_library();
    // a crosswalk of another version does not count
    for table in &mut library.crosswalks {
        table.version = SchemeVersion::V21;
    }
    let err = generate_hccs(&[], SchemeVersion::V22, &library).unwrap_err();
    assert!(matches!(
        err,
        HccError::EmptyReferenceTable {
            table: ReferenceTable::Crosswalk,
            version: SchemeVersion::V22
        }
    ));
}

#[test]
fn test_inconsistent_crosswalk_key_fails() {
    let mut library = diabetes_library();
    library.crosswalks.push(crosswalk(
        SchemeVersion::V22,
        2020,
        CodingSystem::Icd10,
        &[("I10", 2)],
    ));
    let records = vec![icd10("R1", "I10", date(2020, 6, 1))];

    let err = generate_hccs(&records, SchemeVersion::V22, &library).unwrap_err();
    assert!(matches!(
        err,
        HccError::InconsistentCrosswalkKey {
            existing: 3,
            conflicting: 2,
            ..
        }
    ));
}
