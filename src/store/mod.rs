//! Parquet persistence
//!
//! Reference tables are persisted one Parquet file per table, named after the
//! version (and year and coding system for crosswalks):
//!
//! - `<version>_labels.parquet`
//! - `<version>_rules.parquet` (row order is the rule application order)
//! - `<year>_<version>_icd<9|10>.parquet`
//!
//! Diagnosis input and matrix output use the same Arrow/Parquet stack.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use lazy_static::lazy_static;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;

use crate::error::{HccError, Result};
use crate::models::diagnosis::{CodingSystem, DiagnosisRecord};
use crate::models::matrix::HccMatrix;
use crate::models::reference::{
    ConditionCategoryTable, CrosswalkTable, HierarchyRuleTable, ReferenceLibrary,
};
use crate::models::scheme::SchemeVersion;
use crate::utils::logging::{log_skipped_file, log_table_read, log_table_written};

lazy_static! {
    static ref LABELS_FILE: Regex = Regex::new(r"^([^_]+)_labels\.parquet$").unwrap();
    static ref RULES_FILE: Regex = Regex::new(r"^([^_]+)_rules\.parquet$").unwrap();
    static ref CROSSWALK_FILE: Regex =
        Regex::new(r"^(\d{4})_([^_]+)_icd(9|10)\.parquet$").unwrap();
}

/// File name of a version's label table
#[must_use]
pub fn labels_file_name(version: SchemeVersion) -> String {
    format!("{version}_labels.parquet")
}

/// File name of a version's hierarchy rule table
#[must_use]
pub fn rules_file_name(version: SchemeVersion) -> String {
    format!("{version}_rules.parquet")
}

/// File name of a crosswalk table
#[must_use]
pub fn crosswalk_file_name(table: &CrosswalkTable) -> String {
    format!(
        "{}_{}_icd{}.parquet",
        table.year,
        table.version,
        table.coding_system.as_i32()
    )
}

/// Write a single record batch to a Parquet file
pub fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    log_table_written(path, batch.num_rows());
    Ok(())
}

/// Read a Parquet file into Arrow record batches
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_table_read(path, rows, start.elapsed());
    Ok(batches)
}

/// Persist every table of a reference library into `dir`
///
/// Returns the written paths.
pub fn write_library(dir: &Path, library: &ReferenceLibrary) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for (version, table) in &library.categories {
        let path = dir.join(labels_file_name(*version));
        write_batch(&path, &table.to_record_batch()?)?;
        written.push(path);
    }
    for (version, table) in &library.hierarchies {
        let path = dir.join(rules_file_name(*version));
        write_batch(&path, &table.to_record_batch()?)?;
        written.push(path);
    }
    // tables sharing a file name are written together
    let by_file = library
        .crosswalks
        .iter()
        .into_group_map_by(|table| crosswalk_file_name(table));
    for (name, tables) in by_file.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        let first = tables[0];
        let merged = CrosswalkTable::new(
            first.version,
            first.year,
            first.coding_system,
            tables.iter().flat_map(|t| t.entries.iter().cloned()).collect(),
        );
        let path = dir.join(name);
        write_batch(&path, &merged.to_record_batch()?)?;
        written.push(path);
    }

    Ok(written)
}

/// Version named in a table file name; unknown versions skip the file
fn file_version(name: &str, path: &Path) -> Option<SchemeVersion> {
    match name.parse() {
        Ok(version) => Some(version),
        Err(_) => {
            log_skipped_file("names an unsupported scheme version", path);
            None
        }
    }
}

/// Load every reference table persisted in `dir`
///
/// Files not following the naming convention, or naming an unsupported
/// scheme version, are ignored with a warning.
pub fn read_library(dir: &Path) -> Result<ReferenceLibrary> {
    let mut library = ReferenceLibrary::new();
    let file_names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .sorted()
        .collect_vec();

    for name in file_names {
        let path = dir.join(&name);
        if let Some(caps) = LABELS_FILE.captures(&name) {
            let Some(version) = file_version(&caps[1], &path) else {
                continue;
            };
            let table = ConditionCategoryTable::from_record_batches(version, &read_parquet(&path)?)?;
            library.categories.insert(version, table);
        } else if let Some(caps) = RULES_FILE.captures(&name) {
            let Some(version) = file_version(&caps[1], &path) else {
                continue;
            };
            let table = HierarchyRuleTable::from_record_batches(version, &read_parquet(&path)?)?;
            library.hierarchies.insert(version, table);
        } else if let Some(caps) = CROSSWALK_FILE.captures(&name) {
            let Some(version) = file_version(&caps[2], &path) else {
                continue;
            };
            let year = caps[1].parse::<i32>().map_err(|_| HccError::InvalidValue {
                field: "year",
                value: caps[1].to_string(),
            })?;
            let coding_system = if &caps[3] == "9" {
                CodingSystem::Icd9
            } else {
                CodingSystem::Icd10
            };
            let table = CrosswalkTable::from_record_batches(
                version,
                year,
                coding_system,
                &read_parquet(&path)?,
            )?;
            library.crosswalks.push(table);
        } else {
            log_skipped_file("outside the reference table naming convention", &path);
        }
    }

    Ok(library)
}

/// Read diagnosis records from a Parquet file
pub fn read_diagnoses(path: &Path) -> Result<Vec<DiagnosisRecord>> {
    let mut records = Vec::new();
    for batch in read_parquet(path)? {
        records.extend(DiagnosisRecord::from_record_batch(&batch)?);
    }
    Ok(records)
}

/// Write diagnosis records to a Parquet file
pub fn write_diagnoses(path: &Path, records: &[DiagnosisRecord]) -> Result<()> {
    write_batch(path, &DiagnosisRecord::to_record_batch(records)?)
}

/// Write a resolved matrix to a Parquet file
pub fn write_matrix(path: &Path, matrix: &HccMatrix) -> Result<()> {
    let batch = matrix.to_record_batch()?;
    write_batch(path, &batch)
}
