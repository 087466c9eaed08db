//! Advisory locking of output directories
//!
//! A job holds an exclusive lock on `<output>/.mvbackup.lock` for the whole
//! scan, copy, rescan and prune sequence of that output, so two runs sharing
//! an output directory cannot interleave. The lock is released when the
//! guard is dropped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs4::fs_std::FileExt;
use tracing::debug;

use crate::error::{BackupError, BackupResult};

/// Name of the lock file inside an output directory
pub const LOCK_FILE_NAME: &str = ".mvbackup.lock";

/// Default time to wait for a lock held by another process
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Holds an exclusive lock on one output directory
#[derive(Debug)]
pub struct OutputLock {
    /// Lock file handle, the lock lives as long as this does
    _file: File,
    /// Path to the lock file
    path: PathBuf,
}

impl OutputLock {
    /// Acquire the lock for an output directory, waiting up to `timeout`
    ///
    /// # Errors
    ///
    /// Returns `Io` if the lock file cannot be created (for example when the
    /// output directory does not exist) and `Locked` if another holder keeps
    /// the lock past the timeout.
    pub fn acquire(output: &Path, timeout: Duration) -> BackupResult<Self> {
        let path = output.join(LOCK_FILE_NAME);
        let retry_interval = if cfg!(test) {
            Duration::from_millis(10)
        } else {
            Duration::from_millis(100)
        };
        let start = Instant::now();

        loop {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;

            match FileExt::try_lock_exclusive(&file) {
                Ok(true) => {
                    let _ = file.set_len(0);
                    let _ = writeln!(file, "pid={}", std::process::id());
                    debug!(lock = %path.display(), "acquired output lock");
                    return Ok(Self { _file: file, path });
                }
                Ok(false) | Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(retry_interval);
                }
                Ok(false) | Err(_) => {
                    return Err(BackupError::Locked(format!(
                        "another backup is using '{}' (lock file: {})",
                        output.display(),
                        path.display()
                    )));
                }
            }
        }
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let lock = OutputLock::acquire(temp.path(), DEFAULT_LOCK_TIMEOUT).unwrap();
        assert_eq!(lock.path(), temp.path().join(LOCK_FILE_NAME));
        assert!(lock.path().exists());
    }

    #[test]
    fn test_second_holder_times_out() {
        let temp = TempDir::new().unwrap();
        let _held = OutputLock::acquire(temp.path(), DEFAULT_LOCK_TIMEOUT).unwrap();

        let err = OutputLock::acquire(temp.path(), Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, BackupError::Locked(_)));
    }

    #[test]
    fn test_released_on_drop() {
        let temp = TempDir::new().unwrap();
        {
            let _held = OutputLock::acquire(temp.path(), DEFAULT_LOCK_TIMEOUT).unwrap();
        }
        assert!(OutputLock::acquire(temp.path(), Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn test_missing_output_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = OutputLock::acquire(&temp.path().join("missing"), DEFAULT_LOCK_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
