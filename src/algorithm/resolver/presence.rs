//! Presence matrix construction
//!
//! Joins diagnosis records against the crosswalk and marks each recipient's
//! CCs. Work is sharded by a hash of the recipient id; shards share nothing,
//! so they run independently and are simply concatenated.

use std::hash::{Hash, Hasher};

use log::debug;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHasher};

use crate::models::diagnosis::DiagnosisRecord;
use crate::models::matrix::RecipientProfile;
use crate::models::reference::Crosswalk;

/// Counters of the join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinCounts {
    /// Records whose key matched a crosswalk entry
    pub mapped: usize,
    /// Records without a crosswalk entry, dropped
    pub unmapped: usize,
    /// Mapped records whose CC is not a column of the version
    pub outside_universe: usize,
}

impl JoinCounts {
    fn merge(self, other: Self) -> Self {
        Self {
            mapped: self.mapped + other.mapped,
            unmapped: self.unmapped + other.unmapped,
            outside_universe: self.outside_universe + other.outside_universe,
        }
    }
}

/// Pre-cascade presence rows and join counters
#[derive(Debug, Clone, Default)]
pub struct Presence {
    pub rows: Vec<RecipientProfile>,
    pub counts: JoinCounts,
}

/// Shard of a recipient id
#[must_use]
pub fn shard_of(recipient_id: &str, shard_count: usize) -> usize {
    let mut hasher = FxHasher::default();
    recipient_id.hash(&mut hasher);
    (hasher.finish() % shard_count.max(1) as u64) as usize
}

fn build_shard(
    records: &[&DiagnosisRecord],
    crosswalk: &Crosswalk,
    column_index: &FxHashMap<i32, usize>,
    width: usize,
) -> Presence {
    let mut profiles: FxHashMap<&str, Vec<bool>> = FxHashMap::default();
    let mut counts = JoinCounts::default();

    for record in records {
        let Some(cc_id) =
            crosswalk.lookup(&record.diagnosis_code, record.year(), record.coding_system)
        else {
            counts.unmapped += 1;
            continue;
        };
        counts.mapped += 1;

        // A mapped record gives the recipient a row even if its CC is not a column
        let presence = profiles
            .entry(record.recipient_id.as_str())
            .or_insert_with(|| vec![false; width]);
        match column_index.get(&cc_id) {
            Some(&col) => presence[col] = true,
            None => {
                counts.outside_universe += 1;
                debug!("CC {cc_id} of {} is not a column, ignoring", record.diagnosis_code);
            }
        }
    }

    let rows = profiles
        .into_iter()
        .map(|(recipient_id, presence)| RecipientProfile {
            recipient_id: recipient_id.to_string(),
            presence,
        })
        .collect();
    Presence { rows, counts }
}

/// Build presence rows for every recipient with at least one mapped diagnosis
///
/// `columns` is the CC universe in output order. With `shard_count > 1` and
/// `parallel` set, shards are processed on the rayon pool.
#[must_use]
pub fn build_presence(
    records: &[DiagnosisRecord],
    crosswalk: &Crosswalk,
    columns: &[i32],
    shard_count: usize,
    parallel: bool,
) -> Presence {
    let column_index: FxHashMap<i32, usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, &cc)| (cc, idx))
        .collect();
    let width = columns.len();

    if !parallel || shard_count <= 1 {
        let all: Vec<&DiagnosisRecord> = records.iter().collect();
        return build_shard(&all, crosswalk, &column_index, width);
    }

    let mut shards: Vec<Vec<&DiagnosisRecord>> = vec![Vec::new(); shard_count];
    for record in records {
        shards[shard_of(&record.recipient_id, shard_count)].push(record);
    }
    debug!("Split {} records into {shard_count} recipient shards", records.len());

    shards
        .par_iter()
        .map(|shard| build_shard(shard, crosswalk, &column_index, width))
        .reduce(Presence::default, |mut acc, shard| {
            acc.rows.extend(shard.rows);
            acc.counts = acc.counts.merge(shard.counts);
            acc
        })
}
