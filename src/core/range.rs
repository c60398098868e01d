// LogExtract - core/range.rs
//
// Best-effort scan of the selected files for the earliest and latest
// timestamp, used only to pre-fill the range fields.
//
// Columns are found by header name, independent of the user's column
// selection. Files without both columns and rows that fail to parse are
// skipped silently; only an unreadable file is an error.

use crate::core::delimiter::detect_delimiter;
use crate::core::header::{load_table, RowWidth};
use crate::core::model::{DateTimeRange, Table};
use crate::core::timestamp::is_leap_second;
use crate::util::constants;
use crate::util::error::Result;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Header names identifying the date and time columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeColumns {
    pub date_header: String,
    pub time_header: String,
}

impl Default for RangeColumns {
    fn default() -> Self {
        Self {
            date_header: constants::DEFAULT_DATE_HEADER.to_string(),
            time_header: constants::DEFAULT_TIME_HEADER.to_string(),
        }
    }
}

impl RangeColumns {
    /// Locate the (date, time) column indices in a header row.
    /// The first exact match wins when a name is duplicated.
    pub fn locate(&self, headers: &[String]) -> Option<(usize, usize)> {
        let date = headers.iter().position(|h| *h == self.date_header)?;
        let time = headers.iter().position(|h| *h == self.time_header)?;
        Some((date, time))
    }
}

/// Earliest and latest timestamp in one table, if any row parses.
pub fn scan_table(table: &Table, columns: &RangeColumns) -> Option<DateTimeRange> {
    let Some((date_idx, time_idx)) = columns.locate(&table.headers) else {
        tracing::debug!(
            path = %table.path.display(),
            date = %columns.date_header,
            time = %columns.time_header,
            "No date/time columns; skipping file for range scan"
        );
        return None;
    };

    let mut range: Option<DateTimeRange> = None;
    let mut skipped = 0usize;

    for row in &table.rows {
        let (Some(date), Some(time)) = (row.cell(date_idx), row.cell(time_idx)) else {
            skipped += 1;
            continue;
        };
        let text = format!("{date} {time}");
        match NaiveDateTime::parse_from_str(&text, constants::RANGE_FORMAT) {
            Ok(ts) if !is_leap_second(&ts) => match range.as_mut() {
                Some(r) => r.extend(ts),
                None => range = Some(DateTimeRange::new(ts, ts)),
            },
            _ => skipped += 1,
        }
    }

    tracing::debug!(
        path = %table.path.display(),
        rows = table.rows.len(),
        skipped,
        found = range.is_some(),
        "Range scan of file complete"
    );
    range
}

/// Scan every file and combine the per-file ranges.
///
/// Returns `Ok(None)` when no file yields a timestamp.
pub fn scan_range(files: &[PathBuf], columns: &RangeColumns) -> Result<Option<DateTimeRange>> {
    let mut overall: Option<DateTimeRange> = None;

    for (source, path) in files.iter().enumerate() {
        let delimiter = detect_delimiter(path)?;
        let table = load_table(path, delimiter, source, RowWidth::Lenient)?;

        if let Some(found) = scan_table(&table, columns) {
            match overall.as_mut() {
                Some(r) => {
                    r.extend(found.start);
                    r.extend(found.end);
                }
                None => overall = Some(found),
            }
        }
    }

    match &overall {
        Some(r) => tracing::info!(
            files = files.len(),
            start = %r.start,
            end = %r.end,
            "Range scan found timestamps"
        ),
        None => tracing::info!(files = files.len(), "Range scan found no timestamps"),
    }
    Ok(overall)
}
