//! multiversion-backup - timestamped snapshots with retention
//!
//! This library copies a file or directory into one or more output
//! directories under minute-resolution timestamped names, prunes the oldest
//! snapshots beyond a retention limit, and answers queries over the action
//! log those runs leave behind.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted settings
//! - `error`: Custom error types
//! - `logging`: tracing subscriber setup for the binary
//! - `backup`: Snapshot naming, scanning, copying and pruning
//! - `audit`: Action log writing and querying
//! - `cli`: Command handlers for the `mvbackup` binary
//! - `display`: Terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use multiversion_backup::backup::BackupJob;
//!
//! let job = BackupJob::new("/srv/data", vec!["/mnt/backups".into()], "data", 5)?;
//! job.copy()?.into_result()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;

pub use error::{BackupError, BackupResult};
