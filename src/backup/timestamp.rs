//! Snapshot timestamp labels
//!
//! Snapshot names end in a minute-resolution label such as
//! `2024-01-02 09-05 AM`. Two labels taken within the same minute are equal,
//! which is what duplicate detection relies on.

use chrono::{Local, NaiveDateTime};

use crate::error::{BackupError, BackupResult};

/// strftime layout of a snapshot label
pub const LABEL_FORMAT: &str = "%Y-%m-%d %I-%M %p";

/// Separator between the prefix and the label in a snapshot name
pub const NAME_SEPARATOR: &str = " - ";

/// Render a moment as a snapshot label (seconds are dropped)
pub fn encode(moment: NaiveDateTime) -> String {
    moment.format(LABEL_FORMAT).to_string()
}

/// Render the current local time as a snapshot label
pub fn encode_now() -> String {
    encode(Local::now().naive_local())
}

/// Parse a snapshot label back into a moment
///
/// Only the exact layout produced by [`encode`] is accepted: unpadded fields,
/// lowercase markers and trailing text are all rejected.
pub fn decode(label: &str) -> BackupResult<NaiveDateTime> {
    let moment = NaiveDateTime::parse_from_str(label, LABEL_FORMAT).map_err(|e| {
        BackupError::Format(format!("'{}' is not a snapshot label: {}", label, e))
    })?;

    if encode(moment) != label {
        return Err(BackupError::Format(format!(
            "'{}' is not in the layout {}",
            label, LABEL_FORMAT
        )));
    }

    Ok(moment)
}

/// Build the snapshot name for a prefix at a moment
pub fn snapshot_name(prefix: &str, moment: NaiveDateTime) -> String {
    format!("{}{}{}", prefix, NAME_SEPARATOR, encode(moment))
}
