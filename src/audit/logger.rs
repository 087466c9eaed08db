//! Append-only action log
//!
//! Provides the ActionLogger struct that writes one line per saved or
//! deleted snapshot. Each write is flushed immediately.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::BackupResult;

use super::entry::LogRecord;

/// Handles writing records to the action log file
#[derive(Debug, Clone)]
pub struct ActionLogger {
    /// Path to the action log file
    log_path: PathBuf,
}

impl ActionLogger {
    /// Create a new ActionLogger that writes to the specified path
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// Append a record to the log file
    pub fn log(&self, record: &LogRecord) -> BackupResult<()> {
        self.log_batch(std::slice::from_ref(record))
    }

    /// Append several records and flush once at the end
    pub fn log_batch(&self, records: &[LogRecord]) -> BackupResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        for record in records {
            writeln!(file, "{}", record.to_line())?;
        }

        file.flush()?;
        Ok(())
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Action;
    use tempfile::TempDir;

    fn create_test_logger() -> (ActionLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = ActionLogger::new(temp_dir.path().join("logs").join("actions.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_appends_lines() {
        let (logger, _temp) = create_test_logger();
        assert!(!logger.exists());

        logger
            .log(&LogRecord::saved("db", "Folder", Path::new("/b/one")))
            .unwrap();
        logger
            .log(&LogRecord::deleted("db", "Folder", Path::new("/b/zero"), 1))
            .unwrap();

        let contents = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first = LogRecord::parse_line(1, lines[0]).unwrap();
        let second = LogRecord::parse_line(2, lines[1]).unwrap();
        assert_eq!(first.action, Action::Saved);
        assert_eq!(second.action, Action::Deleted);
        assert_eq!(second.identifier, "db");
    }

    #[test]
    fn test_log_batch_empty_is_noop() {
        let (logger, _temp) = create_test_logger();
        logger.log_batch(&[]).unwrap();
        assert!(!logger.exists());
    }
}
