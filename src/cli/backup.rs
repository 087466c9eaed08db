//! Backup CLI commands
//!
//! Implements the commands that take snapshots and list them.

use clap::Args;
use std::path::PathBuf;

use crate::audit::ActionLogger;
use crate::backup::{list_snapshots, BackupJob, ScanMode};
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::display::{format_copy_report, format_snapshot_list};
use crate::error::{BackupError, BackupResult};

/// Arguments of an ad-hoc backup
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// File or directory to back up
    pub source: PathBuf,

    /// Output directory (repeat for several)
    #[arg(short, long = "output", required = true)]
    pub outputs: Vec<PathBuf>,

    /// Snapshot name prefix
    #[arg(short, long)]
    pub prefix: String,

    /// Number of snapshots to keep per output
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: i64,
}

/// Arguments of the snapshot listing
#[derive(Args, Debug)]
pub struct SnapshotsArgs {
    /// Output directory to inspect
    pub output: PathBuf,

    /// Snapshot name prefix
    #[arg(short, long)]
    pub prefix: String,

    /// List file snapshots (whole tree) instead of folder snapshots
    #[arg(short, long)]
    pub files: bool,
}

/// Run every configured job, or only the one with `prefix`
///
/// All jobs run even if an earlier one fails; the first failure is
/// returned at the end.
pub fn handle_run_command(
    paths: &BackupPaths,
    settings: &Settings,
    prefix: Option<&str>,
) -> BackupResult<()> {
    let jobs = match prefix {
        Some(p) => {
            let job = settings.find_job(p).ok_or_else(|| {
                BackupError::Argument(format!("no job with prefix '{}' is configured", p))
            })?;
            let logger = ActionLogger::new(settings.action_log_path(paths));
            vec![job
                .to_job()?
                .with_action_log(logger)
                .with_lock_timeout(settings.lock_timeout())]
        }
        None => settings.build_jobs(paths)?,
    };

    if jobs.is_empty() {
        println!("No jobs configured.");
        println!("Add one with: mvbackup job add <SOURCE> --output <DIR> --prefix <PREFIX> --limit <N>");
        return Ok(());
    }

    let mut first_error = None;
    for job in &jobs {
        if let Err(e) = run_job(job) {
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Run a job described on the command line
pub fn handle_backup_command(
    paths: &BackupPaths,
    settings: &Settings,
    args: BackupArgs,
) -> BackupResult<()> {
    let job = BackupJob::new(args.source, args.outputs, &args.prefix, args.limit)?
        .with_action_log(ActionLogger::new(settings.action_log_path(paths)))
        .with_lock_timeout(settings.lock_timeout());
    run_job(&job)
}

/// List the snapshots of a prefix in one output directory
pub fn handle_snapshots_command(args: SnapshotsArgs) -> BackupResult<()> {
    let mode = if args.files {
        ScanMode::File
    } else {
        ScanMode::Directory
    };
    let entries = list_snapshots(&args.output, &args.prefix, mode)?;
    println!("{}", format_snapshot_list(&entries));
    Ok(())
}

fn run_job(job: &BackupJob) -> BackupResult<()> {
    let report = job.copy()?;
    print!("{}", format_copy_report(job.prefix(), &report));
    report.into_result().map(|_| ())
}
