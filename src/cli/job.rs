//! Job CLI commands
//!
//! Manages the backup jobs stored in the settings file.

use clap::Subcommand;
use std::path::PathBuf;

use crate::config::paths::BackupPaths;
use crate::config::settings::{JobSettings, OutputTargets, Settings};
use crate::display::format_job_list;
use crate::error::{BackupError, BackupResult};

/// Job subcommands
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Add a job (replaces a job with the same prefix)
    Add {
        /// File or directory to back up
        source: PathBuf,

        /// Output directory (repeat for several)
        #[arg(short, long = "output", required = true)]
        outputs: Vec<PathBuf>,

        /// Snapshot name prefix
        #[arg(short, long)]
        prefix: String,

        /// Number of snapshots to keep per output
        #[arg(short, long, allow_negative_numbers = true)]
        limit: i64,
    },

    /// List configured jobs
    List,

    /// Remove a job
    Remove {
        /// Prefix of the job to remove
        prefix: String,
    },
}

/// Handle a job command
pub fn handle_job_command(
    paths: &BackupPaths,
    settings: &mut Settings,
    cmd: JobCommands,
) -> BackupResult<()> {
    match cmd {
        JobCommands::Add {
            source,
            outputs,
            prefix,
            limit,
        } => {
            let job = JobSettings {
                source,
                outputs: OutputTargets::from(outputs),
                prefix,
                limit,
            };
            let prefix = job.prefix.clone();
            settings.add_job(job)?;
            settings.save(paths)?;
            println!("Saved job '{}'.", prefix);
        }

        JobCommands::List => {
            println!("{}", format_job_list(&settings.jobs));
        }

        JobCommands::Remove { prefix } => {
            let removed = settings.remove_job(&prefix).ok_or_else(|| {
                BackupError::Argument(format!("no job with prefix '{}' is configured", prefix))
            })?;
            settings.save(paths)?;
            println!("Removed job '{}'.", removed.prefix);
        }
    }

    Ok(())
}
