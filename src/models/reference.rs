//! Reference table models
//!
//! The three reference tables a scheme version is resolved against: the
//! condition category listing, the ordered hierarchy rules and the per-file
//! crosswalk tables, together with their Arrow schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{HccError, ReferenceTable, Result};
use crate::models::diagnosis::CodingSystem;
use crate::models::scheme::SchemeVersion;

fn schema_fields(schema: &Schema) -> Vec<FieldRef> {
    schema.fields().iter().map(Arc::clone).collect()
}

/// A condition category and its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCategory {
    pub cc_id: i32,
    pub label: String,
}

/// One exploded suppression pair: when `trigger_cc` is present, `suppressed_cc` is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyRule {
    pub suppressed_cc: i32,
    pub trigger_cc: i32,
}

impl HierarchyRule {
    #[must_use]
    pub const fn new(trigger_cc: i32, suppressed_cc: i32) -> Self {
        Self {
            suppressed_cc,
            trigger_cc,
        }
    }
}

/// A diagnosis code mapping within one crosswalk file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswalkEntry {
    pub diagnosis_code: String,
    pub cc_id: i32,
    pub coding_system: CodingSystem,
    pub year: i32,
}

/// The CC universe of a scheme version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCategoryTable {
    pub version: SchemeVersion,
    pub categories: Vec<ConditionCategory>,
}

impl ConditionCategoryTable {
    #[must_use]
    pub const fn new(version: SchemeVersion, categories: Vec<ConditionCategory>) -> Self {
        Self {
            version,
            categories,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The output column universe: cc ids in listing order, first occurrence wins
    #[must_use]
    pub fn cc_ids(&self) -> Vec<i32> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            if seen.insert(category.cc_id) {
                ids.push(category.cc_id);
            } else {
                warn!(
                    "Duplicate CC {} in {} label table, keeping first occurrence",
                    category.cc_id, self.version
                );
            }
        }
        ids
    }

    /// Label of a CC, if it is part of the universe
    #[must_use]
    pub fn label(&self, cc_id: i32) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.cc_id == cc_id)
            .map(|c| c.label.as_str())
    }

    /// Get the Arrow schema for the condition category table
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("cc_id", DataType::Int32, false),
            Field::new("label", DataType::Utf8, false),
        ])
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(
            &schema_fields(&Self::schema()),
            &self.categories,
        )?)
    }

    pub fn from_record_batches(version: SchemeVersion, batches: &[RecordBatch]) -> Result<Self> {
        let mut categories = Vec::new();
        for batch in batches {
            categories.extend(serde_arrow::from_record_batch::<Vec<ConditionCategory>>(batch)?);
        }
        Ok(Self::new(version, categories))
    }
}

/// Ordered hierarchy rules of a scheme version
///
/// Row order is significant: the resolver replays the rules exactly in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyRuleTable {
    pub version: SchemeVersion,
    pub rules: Vec<HierarchyRule>,
}

impl HierarchyRuleTable {
    #[must_use]
    pub const fn new(version: SchemeVersion, rules: Vec<HierarchyRule>) -> Self {
        Self { version, rules }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Get the Arrow schema for the hierarchy rule table
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("suppressed_cc", DataType::Int32, false),
            Field::new("trigger_cc", DataType::Int32, false),
        ])
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(
            &schema_fields(&Self::schema()),
            &self.rules,
        )?)
    }

    pub fn from_record_batches(version: SchemeVersion, batches: &[RecordBatch]) -> Result<Self> {
        let mut rules = Vec::new();
        for batch in batches {
            rules.extend(serde_arrow::from_record_batch::<Vec<HierarchyRule>>(batch)?);
        }
        Ok(Self::new(version, rules))
    }
}

/// The formatted crosswalk of one (year, version, coding system) source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswalkTable {
    pub version: SchemeVersion,
    pub year: i32,
    pub coding_system: CodingSystem,
    pub entries: Vec<CrosswalkEntry>,
}

impl CrosswalkTable {
    #[must_use]
    pub const fn new(
        version: SchemeVersion,
        year: i32,
        coding_system: CodingSystem,
        entries: Vec<CrosswalkEntry>,
    ) -> Self {
        Self {
            version,
            year,
            coding_system,
            entries,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the Arrow schema for a crosswalk table
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("diagnosis_code", DataType::Utf8, false),
            Field::new("cc_id", DataType::Int32, false),
            Field::new("coding_system", DataType::Int32, false),
            Field::new("year", DataType::Int32, false),
        ])
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(
            &schema_fields(&Self::schema()),
            &self.entries,
        )?)
    }

    pub fn from_record_batches(
        version: SchemeVersion,
        year: i32,
        coding_system: CodingSystem,
        batches: &[RecordBatch],
    ) -> Result<Self> {
        let mut entries = Vec::new();
        for batch in batches {
            entries.extend(serde_arrow::from_record_batch::<Vec<CrosswalkEntry>>(batch)?);
        }
        Ok(Self::new(version, year, coding_system, entries))
    }
}

/// Union of every crosswalk table of a version, keyed by (code, year, coding system)
#[derive(Debug, Clone, Default)]
pub struct Crosswalk {
    by_year_system: FxHashMap<(i32, CodingSystem), FxHashMap<String, i32>>,
    len: usize,
}

impl Crosswalk {
    /// Union crosswalk tables of one version
    ///
    /// Duplicate keys that agree collapse into one entry. A key mapped to two
    /// different CCs fails with `InconsistentCrosswalkKey`.
    pub fn union<'a>(
        version: SchemeVersion,
        tables: impl IntoIterator<Item = &'a CrosswalkTable>,
    ) -> Result<Self> {
        let mut crosswalk = Self::default();
        for table in tables {
            for entry in &table.entries {
                crosswalk.insert(version, entry)?;
            }
        }
        Ok(crosswalk)
    }

    fn insert(&mut self, version: SchemeVersion, entry: &CrosswalkEntry) -> Result<()> {
        let codes = self
            .by_year_system
            .entry((entry.year, entry.coding_system))
            .or_default();

        match codes.get(entry.diagnosis_code.as_str()) {
            Some(&existing) if existing != entry.cc_id => Err(HccError::InconsistentCrosswalkKey {
                version,
                diagnosis_code: entry.diagnosis_code.clone(),
                year: entry.year,
                coding_system: entry.coding_system,
                existing,
                conflicting: entry.cc_id,
            }),
            Some(_) => Ok(()),
            None => {
                codes.insert(entry.diagnosis_code.clone(), entry.cc_id);
                self.len += 1;
                Ok(())
            }
        }
    }

    /// Look up the CC of a diagnosis code
    #[must_use]
    pub fn lookup(&self, diagnosis_code: &str, year: i32, coding_system: CodingSystem) -> Option<i32> {
        self.by_year_system
            .get(&(year, coding_system))
            .and_then(|codes| codes.get(diagnosis_code))
            .copied()
    }

    /// Number of distinct keys
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// All reference tables, for any number of scheme versions
#[derive(Debug, Clone, Default)]
pub struct ReferenceLibrary {
    pub categories: BTreeMap<SchemeVersion, ConditionCategoryTable>,
    pub hierarchies: BTreeMap<SchemeVersion, HierarchyRuleTable>,
    pub crosswalks: Vec<CrosswalkTable>,
}

impl ReferenceLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The non-empty CC universe of a version
    pub fn categories_for(&self, version: SchemeVersion) -> Result<&ConditionCategoryTable> {
        match self.categories.get(&version) {
            Some(table) if !table.is_empty() => Ok(table),
            _ => Err(HccError::empty(ReferenceTable::ConditionCategory, version)),
        }
    }

    /// The ordered hierarchy rules of a version
    pub fn hierarchy_for(&self, version: SchemeVersion) -> Result<&HierarchyRuleTable> {
        self.hierarchies
            .get(&version)
            .ok_or_else(|| HccError::missing(ReferenceTable::Hierarchy, version))
    }

    /// Crosswalk tables tagged with a version
    pub fn crosswalks_for(&self, version: SchemeVersion) -> impl Iterator<Item = &CrosswalkTable> {
        self.crosswalks.iter().filter(move |t| t.version == version)
    }

    /// Union of the crosswalk tables tagged with a version
    ///
    /// Fails when no non-empty table matches or when two tables disagree on a key.
    pub fn crosswalk(&self, version: SchemeVersion) -> Result<Crosswalk> {
        let crosswalk = Crosswalk::union(version, self.crosswalks_for(version))?;
        if crosswalk.is_empty() {
            return Err(HccError::empty(ReferenceTable::Crosswalk, version));
        }
        Ok(crosswalk)
    }
}
