//! Display formatting for terminal output
//!
//! Provides utilities for formatting snapshots, run reports, jobs and log
//! records for terminal display.

pub mod log;
pub mod snapshot;

pub use log::{format_record_details, format_record_list};
pub use snapshot::{format_copy_report, format_job_list, format_snapshot_list};
