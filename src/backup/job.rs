//! Backup job for multiversion-backup
//!
//! Copies one source (a file or a directory tree) into every configured
//! output directory under a timestamped name, then prunes the oldest
//! snapshots of that output beyond the retention limit.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, info_span};

use super::fsops;
use super::lock::{OutputLock, DEFAULT_LOCK_TIMEOUT};
use super::scanner::{EntryScanner, ScanMode, TimestampedEntry};
use super::timestamp;
use crate::audit::{ActionLogger, LogRecord};
use crate::error::{BackupError, BackupResult};

/// What kind of source a job copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A directory tree, copied recursively
    Folder,
    /// A single file, the snapshot keeps its extension
    File { extension: Option<String> },
}

impl SourceKind {
    /// Scan mode matching this kind of snapshot
    pub fn scan_mode(&self) -> ScanMode {
        match self {
            SourceKind::Folder => ScanMode::Directory,
            SourceKind::File { .. } => ScanMode::File,
        }
    }

    /// Scanner for the snapshots this kind of source produces
    ///
    /// File snapshots are matched by stripping exactly the source's extension.
    pub fn scanner(&self, prefix: &str) -> EntryScanner {
        let scanner = EntryScanner::new(prefix, self.scan_mode());
        match self {
            SourceKind::Folder => scanner,
            SourceKind::File { extension } => scanner.with_extension(extension.as_deref()),
        }
    }

    /// Path a snapshot named `name` takes in `output`
    pub fn destination(&self, output: &Path, name: &str) -> PathBuf {
        match self {
            SourceKind::File {
                extension: Some(ext),
            } => output.join(format!("{}.{}", name, ext)),
            _ => output.join(name),
        }
    }
}

/// What happened to the new snapshot in one output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The source was copied to this path
    Saved(PathBuf),
    /// A snapshot with the same name already existed, nothing was copied
    Skipped(PathBuf),
}

impl SaveOutcome {
    /// Path of the snapshot, whether written now or already present
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Saved(path) | SaveOutcome::Skipped(path) => path,
        }
    }

    /// Check if a copy was made
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// Result of a successful run against one output
#[derive(Debug, Clone)]
pub struct TargetSummary {
    /// The new snapshot
    pub outcome: SaveOutcome,
    /// Snapshots removed by retention, oldest first
    pub pruned: Vec<PathBuf>,
    /// Snapshots left in the output
    pub retained: usize,
}

/// Result of a run against one output
#[derive(Debug)]
pub struct TargetOutcome {
    /// Output directory
    pub output: PathBuf,
    /// Summary, or the error that stopped this output
    pub result: BackupResult<TargetSummary>,
}

/// Per-output results of one `copy` call, in output order
#[derive(Debug, Default)]
pub struct CopyReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl CopyReport {
    /// Check if every output succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Outputs that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &BackupError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.output.as_path(), e)))
    }

    /// Number of outputs that received a new snapshot
    pub fn saved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Ok(s) if s.outcome.is_saved()))
            .count()
    }

    /// Turn the report into the summaries, or the first failure
    pub fn into_result(self) -> BackupResult<Vec<TargetSummary>> {
        self.outcomes.into_iter().map(|o| o.result).collect()
    }
}

/// One source copied into one or more outputs with a retention limit
#[derive(Debug, Clone)]
pub struct BackupJob {
    source: PathBuf,
    outputs: Vec<PathBuf>,
    prefix: String,
    limit: usize,
    lock_timeout: Duration,
    action_log: Option<ActionLogger>,
}

impl BackupJob {
    /// Create a new BackupJob
    ///
    /// Dashes are stripped from `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if `outputs` is empty or `limit` is below 1.
    pub fn new(
        source: impl Into<PathBuf>,
        outputs: Vec<PathBuf>,
        prefix: &str,
        limit: i64,
    ) -> BackupResult<Self> {
        let prefix = prefix.replace('-', "");

        if outputs.is_empty() {
            let message = format!("{} | at least one output directory is required", prefix);
            error!("{}", message);
            return Err(BackupError::Config(message));
        }

        if limit < 1 {
            let message = format!("{} | limit must be at least 1 (got {})", prefix, limit);
            error!("{}", message);
            return Err(BackupError::Config(message));
        }

        Ok(Self {
            source: source.into(),
            outputs,
            prefix,
            limit: limit as usize,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            action_log: None,
        })
    }

    /// Write saved and deleted snapshots to an action log
    pub fn with_action_log(mut self, logger: ActionLogger) -> Self {
        self.action_log = Some(logger);
        self
    }

    /// Change how long to wait for a locked output directory
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Inspect the source
    ///
    /// # Errors
    ///
    /// Returns `Config` if the source is missing or neither a file nor a
    /// directory.
    pub fn source_kind(&self) -> BackupResult<SourceKind> {
        match fs::metadata(&self.source) {
            Ok(meta) if meta.is_dir() => Ok(SourceKind::Folder),
            Ok(meta) if meta.is_file() => Ok(SourceKind::File {
                extension: self
                    .source
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string()),
            }),
            _ => {
                let message = format!(
                    "{} | execution halted - source '{}' must be file or directory",
                    self.prefix,
                    self.source.display()
                );
                error!("{}", message);
                Err(BackupError::Config(message))
            }
        }
    }

    /// Snapshot the source into every output at the current local time
    pub fn copy(&self) -> BackupResult<CopyReport> {
        self.copy_at(Local::now().naive_local())
    }

    /// Snapshot the source into every output, naming it after `now`
    ///
    /// Outputs are handled one after another. A failure on one output is
    /// recorded in the report and does not stop the others. Only an unusable
    /// source fails the whole call.
    pub fn copy_at(&self, now: NaiveDateTime) -> BackupResult<CopyReport> {
        let span = info_span!("backup", prefix = %self.prefix);
        let _enter = span.enter();

        let kind = self.source_kind()?;
        let mut report = CopyReport::default();

        for output in &self.outputs {
            let result = self.copy_to(output, &kind, now);
            if let Err(e) = &result {
                error!(output = %output.display(), "backup failed: {}", e);
            }
            report.outcomes.push(TargetOutcome {
                output: output.clone(),
                result,
            });
        }

        Ok(report)
    }

    /// Run one output, then write its actions to the action log
    ///
    /// The log is written after the filesystem work, so a failing log never
    /// stops a copy or a prune. Its error is returned once the work is done.
    fn copy_to(
        &self,
        output: &Path,
        kind: &SourceKind,
        now: NaiveDateTime,
    ) -> BackupResult<TargetSummary> {
        let mut records = Vec::new();
        let result = self.snapshot(output, kind, now, &mut records);

        let logged = match &self.action_log {
            Some(logger) => logger.log_batch(&records),
            None => Ok(()),
        };

        match (result, logged) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(log_error)) => {
                error!(output = %output.display(), "action log not written: {}", log_error);
                Err(e)
            }
        }
    }

    /// Scan, copy, rescan and prune one output while holding its lock
    fn snapshot(
        &self,
        output: &Path,
        kind: &SourceKind,
        now: NaiveDateTime,
        records: &mut Vec<LogRecord>,
    ) -> BackupResult<TargetSummary> {
        let mode = kind.scan_mode();
        let scanner = kind.scanner(&self.prefix);
        let name = timestamp::snapshot_name(&self.prefix, now);
        let destination = kind.destination(output, &name);

        let _lock = OutputLock::acquire(output, self.lock_timeout)?;

        let existing = scanner.scan(output)?;
        let outcome = if existing.iter().any(|e| e.name == name) {
            info!(
                "{} | Did not save '{}' - file already exists",
                mode.filetype(),
                destination.display()
            );
            SaveOutcome::Skipped(destination)
        } else {
            match kind {
                SourceKind::Folder => {
                    fsops::copy_tree(&self.source, &destination)?;
                }
                SourceKind::File { .. } => {
                    fsops::copy_file(&self.source, &destination)?;
                }
            }
            info!("{} | Saved '{}'", mode.filetype(), destination.display());
            records.push(LogRecord::saved(&self.prefix, mode.filetype(), &destination));
            SaveOutcome::Saved(destination)
        };

        let current = scanner.scan(output)?;
        let pruned = self.prune(&current, mode, records)?;

        Ok(TargetSummary {
            outcome,
            retained: current.len() - pruned.len(),
            pruned,
        })
    }

    /// Remove everything but the newest `limit` snapshots
    fn prune(
        &self,
        current: &[TimestampedEntry],
        mode: ScanMode,
        records: &mut Vec<LogRecord>,
    ) -> BackupResult<Vec<PathBuf>> {
        if current.len() <= self.limit {
            return Ok(Vec::new());
        }

        let excess = current.len() - self.limit;
        let mut pruned = Vec::with_capacity(excess);

        for entry in &current[..excess] {
            fsops::remove_entry(&entry.path)?;
            info!(
                "{} | Deleted '{}' - old {} outside limit ({})",
                mode.filetype(),
                entry.path.display(),
                mode.filetype().to_lowercase(),
                self.limit
            );
            records.push(LogRecord::deleted(
                &self.prefix,
                mode.filetype(),
                &entry.path,
                self.limit,
            ));
            pruned.push(entry.path.clone());
        }

        Ok(pruned)
    }

}

/// Snapshots of `prefix` in one output, oldest first
pub fn list_snapshots(
    output: &Path,
    prefix: &str,
    mode: ScanMode,
) -> BackupResult<Vec<TimestampedEntry>> {
    EntryScanner::new(prefix.replace('-', ""), mode).scan(output)
}
