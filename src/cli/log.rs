//! Action log CLI commands
//!
//! Queries the action log through a `LogStore`.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::audit::{ActionCategory, LogStore};
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::display::{format_record_details, format_record_list};
use crate::error::BackupResult;

/// Filters shared by the log subcommands
#[derive(Args, Debug)]
pub struct LogQuery {
    /// Only records for this backup prefix
    #[arg(short, long)]
    pub identifier: Option<String>,

    /// Which actions to include: all, saves or deletes
    #[arg(short, long, default_value = "all")]
    pub action: String,

    /// Log file to read (defaults to the configured action log)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// List matching records in file order
    List(LogQuery),

    /// Show the most recent matching record
    Latest(LogQuery),
}

/// Handle a log command
pub fn handle_log_command(
    paths: &BackupPaths,
    settings: &Settings,
    cmd: LogCommands,
) -> BackupResult<()> {
    match cmd {
        LogCommands::List(query) => {
            let store = load_filtered(paths, settings, &query)?;
            println!("{}", format_record_list(store.records()));
        }
        LogCommands::Latest(query) => {
            let store = load_filtered(paths, settings, &query)?;
            print!("{}", format_record_details(store.max()?));
        }
    }
    Ok(())
}

fn load_filtered(
    paths: &BackupPaths,
    settings: &Settings,
    query: &LogQuery,
) -> BackupResult<LogStore> {
    let category: ActionCategory = query.action.parse()?;
    let path = query
        .file
        .clone()
        .unwrap_or_else(|| settings.action_log_path(paths));

    let mut store = LogStore::load(path)?;
    store.filter(query.identifier.as_deref(), category)?;
    Ok(store)
}
