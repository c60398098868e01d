// LogExtract - core/header.rs
//
// Header discovery and whole-file table loading on top of the csv crate.
// Cells are never trimmed or reinterpreted; the only alteration is removal
// of a leading byte-order mark (done by platform::fs).

use crate::core::model::{ColumnHeader, Delimiter, Row, Table};
use crate::platform::fs;
use crate::util::error::{DataError, Result};
use std::path::Path;

/// How strictly row widths are checked against the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowWidth {
    /// Every data row must have exactly as many fields as the header.
    Exact,
    /// Rows of any width are accepted; callers skip missing cells.
    Lenient,
}

fn reader_for(content: &str, delimiter: Delimiter, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes())
}

/// Parse the first record of `content` into indexed headers.
pub fn parse_headers(content: &str, delimiter: Delimiter, path: &Path) -> Result<Vec<ColumnHeader>> {
    let mut reader = reader_for(content, delimiter, false);

    let record = match reader.records().next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => {
            return Err(DataError::Malformed {
                file: path.to_path_buf(),
                source: e,
            }
            .into())
        }
        None => {
            return Err(DataError::EmptyFile {
                file: path.to_path_buf(),
            }
            .into())
        }
    };

    Ok(record
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnHeader {
            index,
            name: name.to_string(),
        })
        .collect())
}

/// Read the header row of the file at `path`.
pub fn read_headers(path: &Path, delimiter: Delimiter) -> Result<Vec<ColumnHeader>> {
    let content = fs::read_text(path)?;
    let headers = parse_headers(&content, delimiter, path)?;

    for header in &headers {
        tracing::debug!(index = header.index, name = ?header.name, "Header");
    }
    tracing::info!(
        path = %path.display(),
        delimiter = %delimiter,
        columns = headers.len(),
        "Headers loaded"
    );

    Ok(headers)
}

/// Maps record byte offsets to 1-based file line numbers.
///
/// The csv reader's line counter ignores skipped blank lines, and a record's
/// position is taken before those lines are skipped, so the offset is moved
/// past any leading line breaks and newlines are counted from the raw text.
/// Offsets must be non-decreasing.
struct LineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            bytes: content.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, byte: u64) -> u64 {
        let mut start = usize::try_from(byte)
            .unwrap_or(self.bytes.len())
            .min(self.bytes.len());
        while matches!(self.bytes.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.bytes[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line
    }
}

/// Parse `content` into a table. The first record is the header row.
///
/// `source` is the position of the file in the caller's file list and is
/// stamped onto every row.
pub fn parse_table(
    content: &str,
    path: &Path,
    delimiter: Delimiter,
    source: usize,
    width: RowWidth,
) -> Result<Table> {
    let mut reader = reader_for(content, delimiter, true);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Malformed {
            file: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(DataError::EmptyFile {
            file: path.to_path_buf(),
        }
        .into());
    }

    let mut lines = LineCounter::new(content);
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::Malformed {
            file: path.to_path_buf(),
            source: e,
        })?;
        let line = record
            .position()
            .map(|p| lines.line_at(p.byte()))
            .unwrap_or(0);

        if width == RowWidth::Exact && record.len() != headers.len() {
            return Err(DataError::RaggedRow {
                file: path.to_path_buf(),
                line,
                expected: headers.len(),
                found: record.len(),
            }
            .into());
        }

        rows.push(Row {
            cells: record.iter().map(str::to_string).collect(),
            source,
            line,
        });
    }

    Ok(Table {
        path: path.to_path_buf(),
        delimiter,
        headers,
        rows,
    })
}

/// Read the whole file at `path` into a table.
pub fn load_table(path: &Path, delimiter: Delimiter, source: usize, width: RowWidth) -> Result<Table> {
    let content = fs::read_text(path)?;
    let table = parse_table(&content, path, delimiter, source, width)?;

    tracing::debug!(
        path = %path.display(),
        delimiter = %delimiter,
        columns = table.width(),
        rows = table.rows.len(),
        "Table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::ExtractorError;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("test.csv")
    }

    #[test]
    fn test_headers_indexed_from_zero() {
        let headers = parse_headers("Date,Time,Value\n1,2,3\n", Delimiter::Comma, &path()).unwrap();
        assert_eq!(
            headers,
            vec![
                ColumnHeader { index: 0, name: "Date".into() },
                ColumnHeader { index: 1, name: "Time".into() },
                ColumnHeader { index: 2, name: "Value".into() },
            ]
        );
    }

    #[test]
    fn test_headers_keep_whitespace_and_duplicates() {
        let line = " Date\tTime \tDepth\tDepth\t\u{200b}Temp";
        let headers = parse_headers(line, Delimiter::Tab, &path()).unwrap();
        let names: Vec<&str> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec![" Date", "Time ", "Depth", "Depth", "\u{200b}Temp"]);
    }

    #[test]
    fn test_headers_round_trip_with_each_delimiter() {
        for d in Delimiter::all() {
            let sep = (d.as_byte() as char).to_string();
            let line = ["Date", "Time", "Heading", "KP"].join(&sep);
            let headers = parse_headers(&format!("{line}\nx\n"), *d, &path()).unwrap();
            let rejoined: Vec<&str> = headers.iter().map(|h| h.name.as_str()).collect();
            assert_eq!(rejoined.join(&sep), line);
        }
    }

    #[test]
    fn test_headers_of_empty_content_is_error() {
        let result = parse_headers("", Delimiter::Comma, &path());
        assert!(matches!(
            result,
            Err(ExtractorError::Data(DataError::EmptyFile { .. }))
        ));
    }

    #[test]
    fn test_read_headers_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bom.csv");
        std::fs::write(&file, "\u{feff}Date;Time\n").unwrap();
        let headers = read_headers(&file, Delimiter::Semicolon).unwrap();
        assert_eq!(headers[0].name, "Date");
    }

    #[test]
    fn test_parse_table_rows_and_line_numbers() {
        let content = "Date,Time,Value\n01/03/2024,10:00:00,5\n\n02/03/2024,11:00:00,7\n";
        let table = parse_table(content, &path(), Delimiter::Comma, 3, RowWidth::Exact).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells, vec!["01/03/2024", "10:00:00", "5"]);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 4);
        assert_eq!(table.rows[1].source, 3);
    }

    #[test]
    fn test_line_numbers_count_blank_and_crlf_lines() {
        let content = "Date,Time,V\r\n\r\n\r\n01/03/2024,10:00:00,5\r\n\n02/03/2024,11:00:00,7";
        let table = parse_table(content, &path(), Delimiter::Comma, 0, RowWidth::Exact).unwrap();
        let lines: Vec<u64> = table.rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![4, 6]);
    }

    #[test]
    fn test_ragged_row_after_blank_line_names_file_line() {
        let content = "Date,Time,Value\n01/03/2024,10:00:00,5\n\n01/03/2024,10:00:01\n";
        let result = parse_table(content, &path(), Delimiter::Comma, 0, RowWidth::Exact);
        assert!(matches!(
            result,
            Err(ExtractorError::Data(DataError::RaggedRow { line: 4, .. }))
        ));
    }

    #[test]
    fn test_parse_table_exact_rejects_ragged_row() {
        let content = "Date,Time,Value\n01/03/2024,10:00:00\n";
        let result = parse_table(content, &path(), Delimiter::Comma, 0, RowWidth::Exact);
        assert!(matches!(
            result,
            Err(ExtractorError::Data(DataError::RaggedRow {
                line: 2,
                expected: 3,
                found: 2,
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_table_lenient_accepts_short_row() {
        let content = "Date,Time,Value\n01/03/2024\n";
        let table = parse_table(content, &path(), Delimiter::Comma, 0, RowWidth::Lenient).unwrap();
        assert_eq!(table.rows[0].cells.len(), 1);
        assert_eq!(table.rows[0].cell(1), None);
    }

    #[test]
    fn test_load_table_records_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("semi.csv");
        std::fs::write(&file, "Date;Time;Level\n01/03/2024;10:00:00;2\n").unwrap();
        let table = load_table(&file, Delimiter::Semicolon, 1, RowWidth::Exact).unwrap();
        assert_eq!(table.delimiter, Delimiter::Semicolon);
        assert_eq!(table.path, file);
        assert_eq!(table.rows[0].cells, vec!["01/03/2024", "10:00:00", "2"]);
    }

    #[test]
    fn test_quoted_cells_are_unquoted() {
        let content = "Date,Time,Note\n01/03/2024,10:00:00,\"a, b\"\n";
        let table = parse_table(content, &path(), Delimiter::Comma, 0, RowWidth::Exact).unwrap();
        assert_eq!(table.rows[0].cells[2], "a, b");
    }
}
