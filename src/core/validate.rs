// LogExtract - core/validate.rs
//
// Row-level data checks. Two deliberately different strictness levels:
//
// - `is_data_row`: positional and strict. Cell 0 must parse as DD/MM/YYYY
//   and cell 1 as HH:MM:SS. Used in single-file mode.
// - `looks_like_repeated_header_row`: a substring heuristic on cell 0.
//   Used on the second and later files of a multi-file merge.

use crate::core::model::Row;
use crate::core::timestamp::is_leap_second;
use crate::util::constants;
use chrono::{NaiveDate, NaiveTime};

/// True iff `date` parses as `DD/MM/YYYY`.
pub fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, constants::DATE_FORMAT).is_ok()
}

/// True iff `time` parses as 24-hour `HH:MM:SS` with seconds 00-59.
pub fn is_valid_time(time: &str) -> bool {
    NaiveTime::parse_from_str(time, constants::TIME_FORMAT)
        .is_ok_and(|t| !is_leap_second(&t))
}

/// True iff the first two cells are a valid date and a valid time.
///
/// This is the only thing separating genuine data from stray header rows
/// in single-file mode, so the date and time must be the first two
/// physical columns of the file.
pub fn is_data_cells<S: AsRef<str>>(cells: &[S]) -> bool {
    match cells {
        [date, time, ..] => is_valid_date(date.as_ref()) && is_valid_time(time.as_ref()),
        _ => false,
    }
}

/// Row form of [`is_data_cells`].
pub fn is_data_row(row: &Row) -> bool {
    is_data_cells(&row.cells)
}

/// True when the row's first cell contains the repeated-header marker
/// (`"Date"`, case-sensitive substring). Rows with no cells never match.
pub fn looks_like_repeated_header_row(row: &Row) -> bool {
    row.cell(0)
        .is_some_and(|first| first.contains(constants::REPEATED_HEADER_MARKER))
}
