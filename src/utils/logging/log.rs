//! Table I/O log lines
//!
//! Messages for Parquet tables read, written or skipped by the store.

use std::path::Path;
use std::time::Duration;

/// A persisted table was loaded
pub fn log_table_read(path: &Path, rows: usize, elapsed: Duration) {
    log::info!("Loaded {rows} rows from {} in {elapsed:?}", path.display());
}

/// A table was persisted
pub fn log_table_written(path: &Path, rows: usize) {
    log::info!("Persisted {rows} rows to {}", path.display());
}

/// A file in a reference directory was not loaded
pub fn log_skipped_file(reason: &str, path: &Path) {
    log::warn!("Skipping {}: {reason}", path.display());
}
