// LogExtract - core/delimiter.rs
//
// Delimiter detection from a file's first line.
//
// Scoring: count each candidate outside double-quoted sections. Among the
// non-space candidates the single highest count wins; a tie at the top is
// ambiguous. Space only wins when no other candidate occurs at all, since
// header names routinely contain spaces. Ambiguity and "nothing found" both
// fall back to comma. Detection never fails on content.

use crate::core::model::Delimiter;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ExtractorError, Result};
use std::path::Path;

/// Per-candidate occurrence counts for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelimiterCounts {
    pub comma: usize,
    pub semicolon: usize,
    pub tab: usize,
    pub space: usize,
}

impl DelimiterCounts {
    fn get(&self, delimiter: Delimiter) -> usize {
        match delimiter {
            Delimiter::Comma => self.comma,
            Delimiter::Semicolon => self.semicolon,
            Delimiter::Tab => self.tab,
            Delimiter::Space => self.space,
        }
    }

    fn bump(&mut self, delimiter: Delimiter) {
        match delimiter {
            Delimiter::Comma => self.comma += 1,
            Delimiter::Semicolon => self.semicolon += 1,
            Delimiter::Tab => self.tab += 1,
            Delimiter::Space => self.space += 1,
        }
    }
}

/// Count candidate delimiters in `line`, ignoring anything between
/// double quotes. A doubled quote (`""`) inside a quoted field toggles
/// twice and so leaves the state unchanged.
pub fn count_candidates(line: &str) -> DelimiterCounts {
    let mut counts = DelimiterCounts::default();
    let mut in_quotes = false;

    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes || !constants::DELIMITER_CANDIDATES.contains(&byte) {
            continue;
        }
        if let Some(d) = Delimiter::from_byte(byte) {
            counts.bump(d);
        }
    }

    counts
}

/// Infer the delimiter of a single header line.
pub fn detect_in_line(line: &str) -> Delimiter {
    let line = fs::strip_bom(line).trim_end_matches(['\n', '\r']);
    let counts = count_candidates(line);

    let best = Delimiter::all()
        .iter()
        .filter(|d| **d != Delimiter::Space)
        .map(|d| counts.get(*d))
        .max()
        .unwrap_or(0);

    let chosen = if best == 0 {
        if counts.space > 0 {
            Delimiter::Space
        } else {
            default_delimiter()
        }
    } else {
        let mut leaders = Delimiter::all()
            .iter()
            .copied()
            .filter(|d| *d != Delimiter::Space && counts.get(*d) == best);
        match (leaders.next(), leaders.next()) {
            (Some(only), None) => only,
            _ => {
                tracing::debug!(?counts, "Ambiguous delimiter; using default");
                default_delimiter()
            }
        }
    };

    tracing::debug!(?counts, delimiter = %chosen, "Delimiter detected");
    chosen
}

/// Infer the delimiter of the file at `path` from its first line only.
///
/// An unreadable file is an error; an empty file or undecidable line
/// yields comma.
pub fn detect_delimiter(path: &Path) -> Result<Delimiter> {
    let first_line = fs::read_first_line(path).map_err(|e| ExtractorError::Io {
        path: path.to_path_buf(),
        operation: "detect delimiter",
        source: e,
    })?;

    let delimiter = match first_line {
        Some(line) => detect_in_line(&line),
        None => {
            tracing::debug!(path = %path.display(), "Empty file; using default delimiter");
            default_delimiter()
        }
    };

    tracing::info!(path = %path.display(), delimiter = %delimiter, "Detected delimiter");
    Ok(delimiter)
}

fn default_delimiter() -> Delimiter {
    Delimiter::from_byte(constants::DEFAULT_DELIMITER).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["Date", "Time", "Easting", "Northing", "Depth"];

    #[test]
    fn test_joined_fields_detect_their_delimiter() {
        for d in Delimiter::all() {
            let sep = (d.as_byte() as char).to_string();
            let line = FIELDS.join(&sep);
            assert_eq!(detect_in_line(&line), *d, "line {line:?}");
        }
    }

    #[test]
    fn test_field_names_with_spaces_do_not_beat_real_delimiter() {
        assert_eq!(
            detect_in_line("Date;Time;Wind Speed;Water Depth m"),
            Delimiter::Semicolon
        );
        assert_eq!(
            detect_in_line("Date\tTime\tSensor A value"),
            Delimiter::Tab
        );
        assert_eq!(detect_in_line("Sensor A,Sensor B"), Delimiter::Comma);
    }

    #[test]
    fn test_majority_wins_over_stray_character() {
        assert_eq!(detect_in_line("Date;Time;Temp, C;Depth"), Delimiter::Semicolon);
    }

    #[test]
    fn test_quoted_delimiters_are_ignored() {
        assert_eq!(
            detect_in_line(r#""Date;local";"Time;local";"Value, raw""#),
            Delimiter::Semicolon
        );
    }

    #[test]
    fn test_no_candidate_falls_back_to_comma() {
        assert_eq!(detect_in_line("DateTimeValue"), Delimiter::Comma);
        assert_eq!(detect_in_line(""), Delimiter::Comma);
        assert_eq!(detect_in_line("a|b|c"), Delimiter::Comma);
    }

    #[test]
    fn test_tie_between_candidates_falls_back_to_comma() {
        assert_eq!(detect_in_line("a;b\tc"), Delimiter::Comma);
    }

    #[test]
    fn test_bom_and_line_ending_are_ignored() {
        assert_eq!(detect_in_line("\u{feff}Date\tTime\r\n"), Delimiter::Tab);
    }

    #[test]
    fn test_detect_delimiter_reads_only_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "Date;Time;Value\n01/01/2024,00:00:00,1,2,3,4\n").unwrap();
        assert_eq!(detect_delimiter(&path).unwrap(), Delimiter::Semicolon);
    }

    #[test]
    fn test_detect_delimiter_empty_file_is_comma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        assert_eq!(detect_delimiter(&path).unwrap(), Delimiter::Comma);
    }

    #[test]
    fn test_detect_delimiter_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = detect_delimiter(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(ExtractorError::Io { .. })));
    }
}
