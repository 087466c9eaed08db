//! Action log display formatting

use crate::audit::{LogRecord, LOG_DATETIME_FORMAT};

fn datetime_cell(record: &LogRecord) -> String {
    record
        .datetime
        .map(|dt| dt.format(LOG_DATETIME_FORMAT).to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Format log records as a table, in the order given
pub fn format_record_list(records: &[LogRecord]) -> String {
    if records.is_empty() {
        return "No matching log records.".to_string();
    }

    let id_width = records
        .iter()
        .map(|r| r.identifier.len())
        .max()
        .unwrap_or(10)
        .max(10);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<19}  {:<id_width$}  {:<6}  {:<7}  {}\n",
        "Datetime",
        "Identifier",
        "Type",
        "Action",
        "Detail",
        id_width = id_width,
    ));
    output.push_str(&format!(
        "{:-<19}  {:-<id_width$}  {:-<6}  {:-<7}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
    ));

    for record in records {
        output.push_str(&format!(
            "{:<19}  {:<id_width$}  {:<6}  {:<7}  {}\n",
            datetime_cell(record),
            record.identifier,
            record.filetype,
            record.action,
            record.detail,
            id_width = id_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} record(s)\n", records.len()));
    output
}

/// Format a single record's details
pub fn format_record_details(record: &LogRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("Datetime:   {}\n", datetime_cell(record)));
    output.push_str(&format!("Identifier: {}\n", record.identifier));
    output.push_str(&format!("Log type:   {}\n", record.logtype));
    output.push_str(&format!("File type:  {}\n", record.filetype));
    output.push_str(&format!("Action:     {}\n", record.action));
    if !record.detail.is_empty() {
        output.push_str(&format!("Detail:     {}\n", record.detail));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LogRecord {
        LogRecord::parse_line(
            1,
            "2024-01-02 09:05:13 | INFO | db | Folder | Saved '/b/db - 2024-01-02 09-05 AM'",
        )
        .unwrap()
    }

    #[test]
    fn test_record_list() {
        let output = format_record_list(&[record()]);
        assert!(output.contains("2024-01-02 09:05:13"));
        assert!(output.contains("Saved"));
        assert!(output.contains("Total: 1 record(s)"));
    }

    #[test]
    fn test_empty_record_list() {
        assert_eq!(format_record_list(&[]), "No matching log records.");
    }

    #[test]
    fn test_record_details() {
        let output = format_record_details(&record());
        assert!(output.contains("Identifier: db"));
        assert!(output.contains("Action:     Saved"));
    }
}
