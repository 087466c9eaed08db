//! Action log records
//!
//! Defines the line format of the action log and the record parsed from each
//! line:
//!
//! ```text
//! 2024-01-02 09:05:13 | INFO | db | Folder | Saved '/backups/db - 2024-01-02 09-05 AM'
//! ```

use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BackupError, BackupResult};

/// strftime layout of the datetime field
pub const LOG_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field separator of a log line
pub const FIELD_SEPARATOR: char = '|';

/// Log type written for backup actions
pub const DEFAULT_LOGTYPE: &str = "INFO";

/// Action recorded on a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A snapshot was written
    Saved,
    /// A snapshot was pruned
    Deleted,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Saved => write!(f, "Saved"),
            Action::Deleted => write!(f, "Deleted"),
        }
    }
}

impl Action {
    /// Parse an action token, `None` for anything but `Saved` or `Deleted`
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Saved" => Some(Action::Saved),
            "Deleted" => Some(Action::Deleted),
            _ => None,
        }
    }
}

/// Which actions a query keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionCategory {
    /// Every action
    #[default]
    All,
    /// Only `Saved`
    Saves,
    /// Only `Deleted`
    Deletes,
}

impl ActionCategory {
    /// Check if an action belongs to this category
    pub fn includes(&self, action: Action) -> bool {
        match self {
            ActionCategory::All => true,
            ActionCategory::Saves => action == Action::Saved,
            ActionCategory::Deletes => action == Action::Deleted,
        }
    }
}

impl FromStr for ActionCategory {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ActionCategory::All),
            "saves" => Ok(ActionCategory::Saves),
            "deletes" => Ok(ActionCategory::Deletes),
            other => Err(BackupError::Argument(format!(
                "action category must be one of all, saves, deletes (got '{}')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionCategory::All => write!(f, "all"),
            ActionCategory::Saves => write!(f, "saves"),
            ActionCategory::Deletes => write!(f, "deletes"),
        }
    }
}

/// One line of the action log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the action happened, `None` if the field did not parse
    pub datetime: Option<NaiveDateTime>,

    /// Category token, the log level for lines written by this crate
    pub logtype: String,

    /// Backup prefix the action concerns
    pub identifier: String,

    /// Kind of entry affected (`Folder` or `File`)
    pub filetype: String,

    /// Action taken
    pub action: Action,

    /// Free text following the action token
    pub detail: String,
}

impl LogRecord {
    /// Record a saved snapshot, stamped with the current local time
    pub fn saved(identifier: &str, filetype: &str, destination: &Path) -> Self {
        Self::now(
            identifier,
            filetype,
            Action::Saved,
            format!("'{}'", destination.display()),
        )
    }

    /// Record a pruned snapshot, stamped with the current local time
    pub fn deleted(identifier: &str, filetype: &str, path: &Path, limit: usize) -> Self {
        Self::now(
            identifier,
            filetype,
            Action::Deleted,
            format!(
                "'{}' - old {} outside limit ({})",
                path.display(),
                filetype.to_lowercase(),
                limit
            ),
        )
    }

    fn now(identifier: &str, filetype: &str, action: Action, detail: String) -> Self {
        let now = Local::now().naive_local();
        Self {
            datetime: now.with_nanosecond(0),
            logtype: DEFAULT_LOGTYPE.to_string(),
            identifier: identifier.to_string(),
            filetype: filetype.to_string(),
            action,
            detail,
        }
    }

    /// Parse one log line
    ///
    /// `line_number` is 1-based and only used in errors. A datetime that does
    /// not parse is logged and left as `None`; an unknown action token or a
    /// line with fewer than five fields is an error.
    pub fn parse_line(line_number: usize, line: &str) -> BackupResult<Self> {
        let fields: Vec<&str> = line.splitn(5, FIELD_SEPARATOR).map(str::trim).collect();
        if fields.len() < 5 {
            return Err(BackupError::MalformedLogLine {
                line: line_number,
                content: line.to_string(),
            });
        }

        let datetime = match NaiveDateTime::parse_from_str(fields[0], LOG_DATETIME_FORMAT) {
            Ok(dt) => Some(dt),
            Err(e) => {
                warn!(
                    line = line_number,
                    value = fields[0],
                    "could not convert log field to a datetime: {}",
                    e
                );
                None
            }
        };

        let (token, detail) = match fields[4].find('\'') {
            Some(quote) => (&fields[4][..quote], &fields[4][quote..]),
            None => (fields[4], ""),
        };
        let token = token.trim();
        let action = Action::from_token(token).ok_or_else(|| BackupError::ActionSchema {
            token: token.to_string(),
            line: line_number,
        })?;

        Ok(Self {
            datetime,
            logtype: fields[1].to_string(),
            identifier: fields[2].to_string(),
            filetype: fields[3].to_string(),
            action,
            detail: detail.trim().to_string(),
        })
    }

    /// Render the record as a log line (without the trailing newline)
    pub fn to_line(&self) -> String {
        let datetime = self
            .datetime
            .map(|dt| dt.format(LOG_DATETIME_FORMAT).to_string())
            .unwrap_or_default();

        let mut line = format!(
            "{} | {} | {} | {} | {}",
            datetime, self.logtype, self.identifier, self.filetype, self.action
        );
        if !self.detail.is_empty() {
            line.push(' ');
            line.push_str(&self.detail);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Saved.to_string(), "Saved");
        assert_eq!(Action::Deleted.to_string(), "Deleted");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("all".parse::<ActionCategory>().unwrap(), ActionCategory::All);
        assert_eq!("saves".parse::<ActionCategory>().unwrap(), ActionCategory::Saves);
        assert_eq!(
            "deletes".parse::<ActionCategory>().unwrap(),
            ActionCategory::Deletes
        );
        assert!("Saves".parse::<ActionCategory>().unwrap_err().is_argument());
    }

    #[test]
    fn test_category_includes() {
        assert!(ActionCategory::All.includes(Action::Deleted));
        assert!(ActionCategory::Saves.includes(Action::Saved));
        assert!(!ActionCategory::Saves.includes(Action::Deleted));
        assert!(!ActionCategory::Deletes.includes(Action::Saved));
    }

    #[test]
    fn test_parse_line() {
        let record = LogRecord::parse_line(
            1,
            "2024-01-02 09:05:13 | INFO | db | Folder | Saved '/backups/db - 2024-01-02 09-05 AM'",
        )
        .unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 5, 13)
            .unwrap();
        assert_eq!(record.datetime, Some(expected));
        assert_eq!(record.logtype, "INFO");
        assert_eq!(record.identifier, "db");
        assert_eq!(record.filetype, "Folder");
        assert_eq!(record.action, Action::Saved);
        assert_eq!(record.detail, "'/backups/db - 2024-01-02 09-05 AM'");
    }

    #[test]
    fn test_parse_line_keeps_pipes_in_detail() {
        let record = LogRecord::parse_line(
            1,
            "2024-01-02 09:05:13 | INFO | db | File | Deleted '/b/a|b.txt' - old file outside limit (3)",
        )
        .unwrap();
        assert_eq!(record.action, Action::Deleted);
        assert_eq!(record.detail, "'/b/a|b.txt' - old file outside limit (3)");
    }

    #[test]
    fn test_parse_line_unknown_action() {
        let err = LogRecord::parse_line(7, "2024-01-02 09:05:13 | INFO | db | Folder | Renamed 'x'")
            .unwrap_err();
        match err {
            BackupError::ActionSchema { token, line } => {
                assert_eq!(token, "Renamed");
                assert_eq!(line, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_bad_datetime_is_kept() {
        let record = LogRecord::parse_line(1, "yesterday | INFO | db | Folder | Saved 'x'").unwrap();
        assert!(record.datetime.is_none());
        assert_eq!(record.action, Action::Saved);
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        let err = LogRecord::parse_line(2, "2024-01-02 09:05:13 | INFO | db").unwrap_err();
        assert!(matches!(err, BackupError::MalformedLogLine { line: 2, .. }));
    }

    #[test]
    fn test_to_line_parses_back() {
        let record = LogRecord::deleted("db", "Folder", Path::new("/b/db - 2024-01-02 09-05 AM"), 2);
        let parsed = LogRecord::parse_line(1, &record.to_line()).unwrap();
        assert_eq!(parsed, record);
        assert!(record.to_line().ends_with("- old folder outside limit (2)"));
    }
}
