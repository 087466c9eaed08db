//! Action log for multiversion-backup
//!
//! Records every saved and pruned snapshot in a pipe-delimited, append-only
//! text log and answers queries over it.
//!
//! # Architecture
//!
//! The audit system consists of three components:
//!
//! - `LogRecord`: One parsed log line (datetime, log type, identifier,
//!   file type, action and free-text detail).
//! - `ActionLogger`: Appends records to the log file as backups run.
//! - `LogStore`: Loads a log file once and exposes a filterable working set
//!   plus the most recent record of that set.
//!
//! # Example
//!
//! ```rust,ignore
//! use multiversion_backup::audit::{ActionCategory, LogStore};
//!
//! let mut store = LogStore::load("actions.log")?;
//! let latest = store.filter(Some("db"), ActionCategory::Saves)?.max()?;
//! println!("last save: {}", latest.to_line());
//! ```

mod entry;
mod logger;
mod store;

pub use entry::{Action, ActionCategory, LogRecord, LOG_DATETIME_FORMAT};
pub use logger::ActionLogger;
pub use store::LogStore;
