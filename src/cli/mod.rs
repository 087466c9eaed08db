//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup and audit layers.

pub mod backup;
pub mod job;
pub mod log;

pub use backup::{
    handle_backup_command, handle_run_command, handle_snapshots_command, BackupArgs,
    SnapshotsArgs,
};
pub use job::{handle_job_command, JobCommands};
pub use log::{handle_log_command, LogCommands, LogQuery};
