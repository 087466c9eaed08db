//! Custom error types for multiversion-backup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for backup and log operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Invalid job construction or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// A snapshot label or log datetime did not match the expected layout
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid query arguments
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Unknown action token in an action log
    #[error("Unknown action '{token}' on log line {line}, expected Saved or Deleted")]
    ActionSchema { token: String, line: usize },

    /// A log line without the five pipe-delimited fields
    #[error("Malformed log line {line}: {content}")]
    MalformedLogLine { line: usize, content: String },

    /// No record to answer a query from
    #[error("No records: {0}")]
    NoRecords(String),

    /// Output directory lock held by someone else
    #[error("Output directory is locked: {0}")]
    Locked(String),

    /// File I/O errors, passed through untouched
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BackupError {
    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is an argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Check if this is an action schema error
    pub fn is_action_schema(&self) -> bool {
        matches!(self, Self::ActionSchema { .. })
    }
}

impl From<walkdir::Error> for BackupError {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(err.into())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;
