//! User settings for multiversion-backup
//!
//! Holds the configured backup jobs along with logging and locking
//! preferences, persisted as JSON.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::BackupPaths;
use crate::audit::ActionLogger;
use crate::backup::BackupJob;
use crate::error::BackupError;

/// Output directories of a job: a single path or a list of paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputTargets {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl OutputTargets {
    /// Flatten into a list
    pub fn to_vec(&self) -> Vec<PathBuf> {
        match self {
            OutputTargets::One(path) => vec![path.clone()],
            OutputTargets::Many(paths) => paths.clone(),
        }
    }
}

impl From<Vec<PathBuf>> for OutputTargets {
    fn from(mut paths: Vec<PathBuf>) -> Self {
        if paths.len() == 1 {
            OutputTargets::One(paths.remove(0))
        } else {
            OutputTargets::Many(paths)
        }
    }
}

/// A configured backup job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSettings {
    /// File or directory to back up
    pub source: PathBuf,

    /// Where snapshots go
    pub outputs: OutputTargets,

    /// Snapshot name prefix, also the identifier in the action log
    pub prefix: String,

    /// Snapshots kept per output
    pub limit: i64,
}

impl JobSettings {
    /// Build the job described by these settings
    pub fn to_job(&self) -> Result<BackupJob, BackupError> {
        BackupJob::new(
            self.source.clone(),
            self.outputs.to_vec(),
            &self.prefix,
            self.limit,
        )
    }
}

/// User settings for multiversion-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Action log location, defaults to `actions.log` in the base directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_log: Option<PathBuf>,

    /// Seconds to wait for a locked output directory
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    /// Configured jobs, run in order
    #[serde(default)]
    pub jobs: Vec<JobSettings>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lock_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_level: default_log_level(),
            action_log: None,
            lock_timeout_secs: default_lock_timeout_secs(),
            jobs: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BackupPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackupPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackupError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)?;
        Ok(())
    }

    /// Where the action log lives
    pub fn action_log_path(&self, paths: &BackupPaths) -> PathBuf {
        self.action_log
            .clone()
            .unwrap_or_else(|| paths.action_log())
    }

    /// How long to wait for a locked output
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    /// Find a job by prefix (dashes are ignored, as in snapshot names)
    pub fn find_job(&self, prefix: &str) -> Option<&JobSettings> {
        let wanted = prefix.replace('-', "");
        self.jobs.iter().find(|j| j.prefix.replace('-', "") == wanted)
    }

    /// Add a job, replacing any job with the same prefix
    ///
    /// The job is validated before it is stored.
    pub fn add_job(&mut self, job: JobSettings) -> Result<(), BackupError> {
        job.to_job()?;
        let wanted = job.prefix.replace('-', "");
        self.jobs.retain(|j| j.prefix.replace('-', "") != wanted);
        self.jobs.push(job);
        Ok(())
    }

    /// Remove a job by prefix, returning it if it existed
    pub fn remove_job(&mut self, prefix: &str) -> Option<JobSettings> {
        let wanted = prefix.replace('-', "");
        let index = self
            .jobs
            .iter()
            .position(|j| j.prefix.replace('-', "") == wanted)?;
        Some(self.jobs.remove(index))
    }

    /// Build every configured job with the action log and lock timeout attached
    pub fn build_jobs(&self, paths: &BackupPaths) -> Result<Vec<BackupJob>, BackupError> {
        let logger = ActionLogger::new(self.action_log_path(paths));
        self.jobs
            .iter()
            .map(|j| {
                Ok(j.to_job()?
                    .with_action_log(logger.clone())
                    .with_lock_timeout(self.lock_timeout()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(prefix: &str) -> JobSettings {
        JobSettings {
            source: PathBuf::from("/data"),
            outputs: OutputTargets::One(PathBuf::from("/backups")),
            prefix: prefix.to_string(),
            limit: 3,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.lock_timeout(), Duration::from_secs(30));
        assert!(settings.jobs.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.add_job(job("db")).unwrap();
        settings.log_level = "debug".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.jobs, vec![job("db")]);
    }

    #[test]
    fn test_outputs_accept_string_or_list() {
        let one: JobSettings = serde_json::from_str(
            r#"{"source": "/data", "outputs": "/b1", "prefix": "db", "limit": 2}"#,
        )
        .unwrap();
        assert_eq!(one.outputs.to_vec(), vec![PathBuf::from("/b1")]);

        let many: JobSettings = serde_json::from_str(
            r#"{"source": "/data", "outputs": ["/b1", "/b2"], "prefix": "db", "limit": 2}"#,
        )
        .unwrap();
        assert_eq!(
            many.outputs.to_vec(),
            vec![PathBuf::from("/b1"), PathBuf::from("/b2")]
        );
    }

    #[test]
    fn test_outputs_of_other_type_fail_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"jobs": [{"source": "/data", "outputs": 42, "prefix": "db", "limit": 2}]}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_add_job_replaces_same_prefix() {
        let mut settings = Settings::default();
        settings.add_job(job("db")).unwrap();

        let mut replacement = job("d-b");
        replacement.limit = 9;
        settings.add_job(replacement).unwrap();

        assert_eq!(settings.jobs.len(), 1);
        assert_eq!(settings.find_job("db").unwrap().limit, 9);
    }

    #[test]
    fn test_add_job_validates() {
        let mut settings = Settings::default();
        let mut bad = job("db");
        bad.limit = 0;

        assert!(settings.add_job(bad).unwrap_err().is_config());
        assert!(settings.jobs.is_empty());
    }

    #[test]
    fn test_remove_job() {
        let mut settings = Settings::default();
        settings.add_job(job("db")).unwrap();
        settings.add_job(job("web")).unwrap();

        assert_eq!(settings.remove_job("db").unwrap().prefix, "db");
        assert!(settings.remove_job("db").is_none());
        assert_eq!(settings.jobs.len(), 1);
    }

    #[test]
    fn test_build_jobs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        settings.add_job(job("db")).unwrap();

        let jobs = settings.build_jobs(&paths).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].prefix(), "db");
        assert_eq!(settings.action_log_path(&paths), paths.action_log());
    }
}
