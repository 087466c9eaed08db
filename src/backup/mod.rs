//! Backup engine for multiversion-backup
//!
//! Takes timestamp-named snapshots of a file or directory into one or more
//! output directories and keeps only the newest few of them.
//!
//! # Architecture
//!
//! - `timestamp`: Encodes the snapshot label and decodes it back
//! - `EntryScanner`: Finds the snapshots of a prefix in an output directory
//! - `BackupJob`: Copies, deduplicates and prunes, one output at a time
//! - `OutputLock`: Advisory lock held on an output while a job works on it
//!
//! # Naming
//!
//! Snapshots are named `<prefix> - YYYY-MM-DD HH-MM AM/PM`, with the
//! source's extension appended for file sources. Two runs within the same
//! minute produce the same name, so the second one copies nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! use multiversion_backup::backup::BackupJob;
//!
//! let job = BackupJob::new("/srv/data", vec!["/mnt/backups".into()], "data", 5)?;
//! let summaries = job.copy()?.into_result()?;
//! ```

pub mod fsops;
mod job;
mod lock;
mod scanner;
pub mod timestamp;

pub use job::{
    list_snapshots, BackupJob, CopyReport, SaveOutcome, SourceKind, TargetOutcome, TargetSummary,
};
pub use lock::{OutputLock, DEFAULT_LOCK_TIMEOUT, LOCK_FILE_NAME};
pub use scanner::{EntryScanner, ScanMode, TimestampedEntry};
