//! Configuration module for multiversion-backup
//!
//! This module provides configuration management including:
//! - Base directory resolution
//! - Persisted settings and configured jobs

pub mod paths;
pub mod settings;

pub use paths::BackupPaths;
pub use settings::{JobSettings, OutputTargets, Settings};
