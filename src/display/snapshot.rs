//! Snapshot and job display formatting
//!
//! Formats snapshots, backup run reports and configured jobs for terminal
//! output.

use crate::backup::{CopyReport, SaveOutcome, TimestampedEntry};
use crate::config::JobSettings;

/// Format snapshots (oldest first) as a table
pub fn format_snapshot_list(entries: &[TimestampedEntry]) -> String {
    if entries.is_empty() {
        return "No snapshots found.".to_string();
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<19}  {:<name_width$}\n",
        "#",
        "Taken",
        "Name",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->3}  {:-<19}  {:-<name_width$}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:<19}  {:<name_width$}\n",
            i + 1,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.name,
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} snapshot(s)\n", entries.len()));
    output
}

/// Format the per-output results of a backup run
pub fn format_copy_report(prefix: &str, report: &CopyReport) -> String {
    let mut output = format!("Backup '{}'\n", prefix);

    for outcome in &report.outcomes {
        output.push_str(&format!("  {}\n", outcome.output.display()));
        match &outcome.result {
            Ok(summary) => {
                match &summary.outcome {
                    SaveOutcome::Saved(path) => {
                        output.push_str(&format!("    Saved:   {}\n", path.display()));
                    }
                    SaveOutcome::Skipped(path) => {
                        output.push_str(&format!(
                            "    Skipped: {} (already exists)\n",
                            path.display()
                        ));
                    }
                }
                for path in &summary.pruned {
                    output.push_str(&format!("    Deleted: {}\n", path.display()));
                }
                output.push_str(&format!("    Kept:    {} snapshot(s)\n", summary.retained));
            }
            Err(e) => {
                output.push_str(&format!("    FAILED:  {}\n", e));
            }
        }
    }

    output
}

/// Format configured jobs as a table
pub fn format_job_list(jobs: &[JobSettings]) -> String {
    if jobs.is_empty() {
        return "No jobs configured.".to_string();
    }

    let prefix_width = jobs
        .iter()
        .map(|j| j.prefix.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<prefix_width$}  {:>5}  {}\n",
        "Prefix",
        "Limit",
        "Source -> Outputs",
        prefix_width = prefix_width,
    ));
    output.push_str(&format!(
        "{:-<prefix_width$}  {:->5}  {:-<17}\n",
        "",
        "",
        "",
        prefix_width = prefix_width,
    ));

    for job in jobs {
        let outputs: Vec<String> = job
            .outputs
            .to_vec()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        output.push_str(&format!(
            "{:<prefix_width$}  {:>5}  {} -> {}\n",
            job.prefix,
            job.limit,
            job.source.display(),
            outputs.join(", "),
            prefix_width = prefix_width,
        ));
    }

    output
}
