//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for logging stage summaries and progress
//! tracking during reference table builds.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{log_skipped_file, log_table_read, log_table_written};
pub use self::progress::{create_main_progress_bar, finish_progress_bar};
