//! Queryable view over an action log
//!
//! A `LogStore` parses every line once at load time into an original record
//! set that never changes afterwards. Queries replace a working set derived
//! from that original set, and the most recent record of the working set is
//! recomputed each time it changes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BackupError, BackupResult};

use super::entry::{Action, ActionCategory, LogRecord};

/// Parsed action log with a filterable working set
#[derive(Debug, Clone)]
pub struct LogStore {
    /// File the records came from
    path: PathBuf,
    /// Every record in file order
    original: Vec<LogRecord>,
    /// Current view, always derived from `original`
    working: Vec<LogRecord>,
    /// Index into `working` of the most recent dated record
    max_index: Option<usize>,
}

impl LogStore {
    /// Load and parse a log file
    ///
    /// Blank lines are skipped. An unknown action token or a line with
    /// missing fields aborts the whole load.
    pub fn load(path: impl AsRef<Path>) -> BackupResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let records = parse_records(&contents)?;
        Ok(Self::from_records(path, records))
    }

    /// Build a store from already parsed records
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<LogRecord>) -> Self {
        let mut store = Self {
            path: path.into(),
            original: records,
            working: Vec::new(),
            max_index: None,
        };
        store.set_working(store.original.clone());
        store
    }

    /// Restrict the working set to one identifier and/or action category
    ///
    /// Always starts from the original records, so calls never compound.
    /// `None` keeps every identifier. Returns the store for chaining.
    ///
    /// # Errors
    ///
    /// Returns `Argument` if `identifier` does not appear in the log. The
    /// working set is left untouched in that case.
    pub fn filter(
        &mut self,
        identifier: Option<&str>,
        category: ActionCategory,
    ) -> BackupResult<&mut Self> {
        if let Some(id) = identifier {
            if !self.original.iter().any(|r| r.identifier == id) {
                return Err(BackupError::Argument(format!(
                    "identifier '{}' does not exist in {}",
                    id,
                    self.path.display()
                )));
            }
        }

        let working = self
            .original
            .iter()
            .filter(|r| identifier.map_or(true, |id| r.identifier == id))
            .filter(|r| category.includes(r.action))
            .cloned()
            .collect();

        self.set_working(working);
        Ok(self)
    }

    /// String form of [`filter`](Self::filter): `category` must be one of
    /// `all`, `saves` or `deletes`
    pub fn filter_by(&mut self, identifier: &str, category: &str) -> BackupResult<&mut Self> {
        let category: ActionCategory = category.parse()?;
        self.filter(Some(identifier), category)
    }

    /// Drop any filter and go back to every record
    pub fn reset(&mut self) -> &mut Self {
        self.set_working(self.original.clone());
        self
    }

    /// Most recent record of the working set
    ///
    /// Ties go to the record that appears last in the file. Records without
    /// a datetime are ignored.
    pub fn max(&self) -> BackupResult<&LogRecord> {
        self.max_index
            .map(|i| &self.working[i])
            .ok_or_else(|| {
                BackupError::NoRecords(format!(
                    "no dated records in the current view of {}",
                    self.path.display()
                ))
            })
    }

    /// Records in the working set, in file order
    pub fn records(&self) -> &[LogRecord] {
        &self.working
    }

    /// Every record loaded from the file
    pub fn original(&self) -> &[LogRecord] {
        &self.original
    }

    /// Number of records in the working set
    pub fn len(&self) -> usize {
        self.working.len()
    }

    /// Check if the working set is empty
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Distinct identifiers in the original records, in order of appearance
    pub fn identifiers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.original {
            if !seen.contains(&record.identifier.as_str()) {
                seen.push(&record.identifier);
            }
        }
        seen
    }

    /// Count records of the working set per action
    pub fn count(&self, action: Action) -> usize {
        self.working.iter().filter(|r| r.action == action).count()
    }

    /// Get the path the store was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set_working(&mut self, working: Vec<LogRecord>) {
        self.working = working;
        self.max_index = latest_index(&self.working);
    }
}

/// Parse log text, numbering lines from 1
fn parse_records(contents: &str) -> BackupResult<Vec<LogRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| LogRecord::parse_line(i + 1, line))
        .collect()
}

/// Index of the greatest datetime, preferring the later index on ties
fn latest_index(records: &[LogRecord]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, record) in records.iter().enumerate() {
        let Some(dt) = record.datetime else {
            continue;
        };
        match best.and_then(|b| records[b].datetime) {
            Some(best_dt) if dt < best_dt => {}
            _ => best = Some(i),
        }
    }
    best
}
