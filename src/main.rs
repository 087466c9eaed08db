use anyhow::Result;
use clap::{Parser, Subcommand};

use multiversion_backup::cli::{
    handle_backup_command, handle_job_command, handle_log_command, handle_run_command,
    handle_snapshots_command, BackupArgs, JobCommands, LogCommands, SnapshotsArgs,
};
use multiversion_backup::config::{paths::BackupPaths, settings::Settings};
use multiversion_backup::logging;

#[derive(Parser)]
#[command(
    name = "mvbackup",
    version,
    about = "Timestamped multi-version backups with retention",
    long_about = "mvbackup copies a file or folder into one or more backup \
                  directories under a timestamped name, keeps only the newest \
                  N copies, and records every save and delete in an action log."
)]
struct Cli {
    /// Log filter (overrides the configured level, RUST_LOG overrides both)
    #[arg(long, global = true, env = "MVBACKUP_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run configured jobs
    Run {
        /// Only run the job with this prefix
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Back up a source without configuring a job
    Backup(BackupArgs),

    /// List the snapshots of a prefix in an output directory
    Snapshots(SnapshotsArgs),

    /// Job management commands
    #[command(subcommand)]
    Job(JobCommands),

    /// Action log queries
    #[command(subcommand)]
    Log(LogCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BackupPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.log_level.clone());
    logging::init(&level)?;

    match cli.command {
        Some(Commands::Run { prefix }) => {
            handle_run_command(&paths, &settings, prefix.as_deref())?;
        }
        Some(Commands::Backup(args)) => {
            handle_backup_command(&paths, &settings, args)?;
        }
        Some(Commands::Snapshots(args)) => {
            handle_snapshots_command(args)?;
        }
        Some(Commands::Job(cmd)) => {
            handle_job_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Log(cmd)) => {
            handle_log_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("mvbackup Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!(
                "Action log:       {}",
                settings.action_log_path(&paths).display()
            );
            println!();
            println!("Settings:");
            println!("  Log level:    {}", settings.log_level);
            println!("  Lock timeout: {}s", settings.lock_timeout_secs);
            println!("  Jobs:         {}", settings.jobs.len());
        }
        None => {
            println!("mvbackup - timestamped multi-version backups");
            println!();
            println!("Run 'mvbackup --help' for usage information.");
        }
    }

    Ok(())
}
