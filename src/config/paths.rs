//! Path management for multiversion-backup
//!
//! ## Path Resolution Order
//!
//! 1. `MVBACKUP_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `mvbackup`
//!    (`~/.config/mvbackup` on Linux, `%APPDATA%\mvbackup\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BackupError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MVBACKUP_DATA_DIR";

/// Manages all paths used by multiversion-backup
#[derive(Debug, Clone)]
pub struct BackupPaths {
    /// Base directory for settings and the action log
    base_dir: PathBuf,
}

impl BackupPaths {
    /// Create a new BackupPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BackupError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "mvbackup")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BackupError::Config("Could not determine a config directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create BackupPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default path of the action log
    pub fn action_log(&self) -> PathBuf {
        self.base_dir.join("actions.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}
