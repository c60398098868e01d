// LogExtract - core/timestamp.rs
//
// Combined date+time parsing (always day-first) and the fixed
// DD/MM/YYYY HH:MM:SS text form used for range bounds.

use crate::util::constants;
use crate::util::error::ValidationError;
use chrono::{NaiveDateTime, Timelike};

/// Join a date cell and a time cell with a single space.
pub fn combine(date: &str, time: &str) -> String {
    format!("{} {}", date.trim(), time.trim())
}

/// Parse a combined `"<date> <time>"` string.
///
/// The strict range format is tried first, then the day-first fallbacks
/// in `COMBINED_FALLBACK_FORMATS`. An ambiguous `01/02/2024` is always
/// 1 February.
pub fn parse_combined(text: &str) -> Option<NaiveDateTime> {
    std::iter::once(constants::RANGE_FORMAT)
        .chain(constants::COMBINED_FALLBACK_FORMATS.iter().copied())
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .filter(|ts| !is_leap_second(ts))
}

/// True when `%S` matched `60`. chrono keeps that as a leap second;
/// loggers never write one, so it is treated as invalid.
pub fn is_leap_second<T: Timelike>(t: &T) -> bool {
    t.nanosecond() >= 1_000_000_000
}

/// Build the combined timestamp of one row's date and time cells.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    parse_combined(&combine(date, time))
}

/// Parse range-field text in the fixed `DD/MM/YYYY HH:MM:SS` format.
///
/// Only the exact format is accepted; surrounding whitespace is ignored.
/// `field` names the bound ("start" / "end") for the error message.
pub fn parse_range_text(field: &'static str, text: &str) -> Result<NaiveDateTime, ValidationError> {
    let ts = NaiveDateTime::parse_from_str(text.trim(), constants::RANGE_FORMAT).map_err(
        |source| ValidationError::InvalidDateTime {
            field,
            value: text.to_string(),
            source,
        },
    )?;
    if is_leap_second(&ts) {
        return Err(ValidationError::LeapSecond {
            field,
            value: text.to_string(),
        });
    }
    Ok(ts)
}

/// Format a timestamp as range-field text.
pub fn format_range_text(ts: &NaiveDateTime) -> String {
    ts.format(constants::RANGE_FORMAT).to_string()
}

/// Truncate a cell value for inclusion in logs and error messages.
pub fn preview(value: &str) -> String {
    if value.chars().count() <= constants::DEBUG_MAX_CELL_PREVIEW {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(constants::DEBUG_MAX_CELL_PREVIEW).collect();
        cut.push_str("...");
        cut
    }
}
