// LogExtract - tests/e2e_extract.rs
//
// End-to-end tests for the extraction pipeline.
//
// These tests exercise real files on disk (fixtures plus tempfile-written
// inputs), real delimiter detection, real csv parsing, and real chrono
// timestamp handling, through the session object and the output writer.
// No mocks, no stubs.

use logextract::app::session::{save_output, Session};
use logextract::core::delimiter::detect_delimiter;
use logextract::core::extract::extract;
use logextract::core::header::read_headers;
use logextract::core::model::{
    ColumnSelection, DateTimeRange, Delimiter, ExtractMode, ExtractRequest,
};
use logextract::core::timestamp::parse_range_text;
use logextract::util::error::{DataError, ErrorCategory, ExtractorError, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn range(start: &str, end: &str) -> DateTimeRange {
    DateTimeRange::new(
        parse_range_text("start", start).unwrap(),
        parse_range_text("end", end).unwrap(),
    )
}

/// Session over `files` with the given source columns selected in order.
fn session_with(files: Vec<PathBuf>, columns: &[usize]) -> Session {
    let mut session = Session::new();
    session.set_files(files).unwrap();
    session.load_headers(0).unwrap();
    for &index in columns {
        session.select_column(index).unwrap();
    }
    session
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// =============================================================================
// Detection and headers
// =============================================================================

#[test]
fn e2e_detects_each_fixture_delimiter() {
    let cases = [
        ("logger_single.csv", Delimiter::Comma),
        ("logger_part1.csv", Delimiter::Comma),
        ("logger_part2.csv", Delimiter::Semicolon),
        ("logger_tab.txt", Delimiter::Tab),
    ];
    for (name, expected) in cases {
        assert_eq!(detect_delimiter(&fixture(name)).unwrap(), expected, "{name}");
    }
}

/// Headers re-joined with the detected delimiter reproduce the first line.
#[test]
fn e2e_headers_round_trip_first_line() {
    for name in ["logger_part2.csv", "logger_tab.txt"] {
        let path = fixture(name);
        let delimiter = detect_delimiter(&path).unwrap();
        let headers = read_headers(&path, delimiter).unwrap();

        let joined = headers
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>()
            .join(&(delimiter.as_byte() as char).to_string());
        let content = read(&path);
        assert_eq!(Some(joined.as_str()), content.lines().next(), "{name}");
    }
}

#[test]
fn e2e_bom_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.csv");
    fs::write(
        &path,
        "\u{feff}Date;Time;Level\n01/02/2024;06:00:00;3\n",
    )
    .unwrap();

    assert_eq!(detect_delimiter(&path).unwrap(), Delimiter::Semicolon);
    let headers = read_headers(&path, Delimiter::Semicolon).unwrap();
    assert_eq!(headers[0].name, "Date");
    assert_eq!(headers[2].name, "Level");
}

// =============================================================================
// Single-file extraction
// =============================================================================

/// A repeated header row inside a single file is dropped by the validator.
#[test]
fn e2e_single_file_drops_repeated_header() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut session = session_with(vec![fixture("logger_single.csv")], &[0, 1, 2]);
    session.start_text = "01/03/2024 00:00:00".into();
    session.end_text = "02/03/2024 23:59:59".into();

    let table = session.extract_to(&out).unwrap();
    assert_eq!(table.mode, ExtractMode::SingleFile);
    assert_eq!(table.stats.rows_read, 3);
    assert_eq!(table.stats.rows_discarded, 1);
    assert_eq!(table.stats.rows_retained, 2);

    assert_eq!(
        read(&out),
        "Date,Time,Value\n01/03/2024,10:00:00,5\n02/03/2024,11:00:00,7\n"
    );
}

#[test]
fn e2e_single_file_keeps_file_order_and_selection_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unsorted.csv");
    fs::write(
        &path,
        "Date,Time,A,B\n03/01/2024,00:00:00,a3,b3\n01/01/2024,00:00:00,a1,b1\n",
    )
    .unwrap();

    let request = ExtractRequest {
        files: vec![path],
        selection: ColumnSelection::new(vec![0, 1, 3, 2]),
        range: range("01/01/2024 00:00:00", "31/01/2024 00:00:00"),
    };
    let table = extract(&request).unwrap();
    assert_eq!(table.headers, vec!["Date", "Time", "B", "A"]);
    assert_eq!(table.rows[0], vec!["03/01/2024", "00:00:00", "b3", "a3"]);
    assert_eq!(table.rows[1], vec!["01/01/2024", "00:00:00", "b1", "a1"]);
}

#[test]
fn e2e_tab_file_extraction() {
    let request = ExtractRequest {
        files: vec![fixture("logger_tab.txt")],
        selection: ColumnSelection::new(vec![0, 1, 2]),
        range: range("05/06/2024 09:31:00", "05/06/2024 09:31:00"),
    };
    let table = extract(&request).unwrap();
    assert_eq!(table.headers, vec!["Date", "Time", "Pressure (kPa)"]);
    assert_eq!(table.rows, vec![vec!["05/06/2024", "09:31:00", "101.3"]]);
}

// =============================================================================
// Multi-file extraction
// =============================================================================

/// Comma and semicolon files are merged, sorted, and filtered inclusively.
#[test]
fn e2e_multi_file_merge_sort_and_filter() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("merged.csv");

    let files = vec![fixture("logger_part1.csv"), fixture("logger_part2.csv")];
    let mut session = session_with(files, &[0, 1, 3]);
    session.start_text = "01/01/2024 12:00:00".into();
    session.end_text = "03/01/2024 12:00:00".into();

    let table = session.extract_to(&out).unwrap();
    assert_eq!(table.mode, ExtractMode::MultiFile);
    assert_eq!(table.stats.rows_read, 7);
    assert_eq!(table.stats.rows_discarded, 1);
    assert_eq!(table.stats.rows_out_of_range, 2);

    // Equal timestamps keep file order: part1's 02/01 row before part2's.
    assert_eq!(
        read(&out),
        "Date,Time,Temp\n\
         01/01/2024,12:00:00,10.5\n\
         02/01/2024,00:00:00,11\n\
         02/01/2024,00:00:00,11.5\n\
         03/01/2024,12:00:00,12\n"
    );
}

#[test]
fn e2e_multi_file_unparseable_row_fails() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    fs::write(&a, "Date,Time,V\n01/01/2024,00:00:00,1\n").unwrap();
    fs::write(&b, "Date,Time,V\n02/01/2024,00:00:00,2\nn/a,n/a,3\n").unwrap();
    let out = dir.path().join("out.csv");

    let mut session = session_with(vec![a, b.clone()], &[0, 1, 2]);
    session.start_text = "01/01/2024 00:00:00".into();
    session.end_text = "31/12/2024 00:00:00".into();

    let err = session.extract_to(&out).unwrap_err();
    match err {
        ExtractorError::Data(DataError::TimestampParse { file, line, .. }) => {
            assert_eq!(file, b);
            assert_eq!(line, 3);
        }
        other => panic!("expected TimestampParse, got {other:?}"),
    }
    assert!(!out.exists());
}

/// Blank lines still count toward the line reported for a bad row.
#[test]
fn e2e_unparseable_row_after_blank_line_reports_file_line() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    fs::write(&a, "Date,Time,V\n01/01/2024,00:00:00,1\n").unwrap();
    fs::write(&b, "Date,Time,V\n02/01/2024,00:00:00,2\n\nbad,row,3\n").unwrap();

    let request = ExtractRequest {
        files: vec![a, b.clone()],
        selection: ColumnSelection::new(vec![0, 1, 2]),
        range: range("01/01/2024 00:00:00", "31/12/2024 00:00:00"),
    };
    let err = extract(&request).unwrap_err();
    match &err {
        ExtractorError::Data(DataError::TimestampParse { file, line, value }) => {
            assert_eq!(*file, b);
            assert_eq!(*line, 4);
            assert_eq!(value, "bad row");
        }
        other => panic!("expected TimestampParse, got {other:?}"),
    }
    assert!(err.to_string().contains("line 4"), "{err}");
}

#[test]
fn e2e_multi_file_narrow_table_is_bounds_error() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("wide.csv");
    let b = dir.path().join("narrow.csv");
    fs::write(&a, "Date,Time,V,W\n01/01/2024,00:00:00,1,2\n").unwrap();
    fs::write(&b, "Date,Time,V\n02/01/2024,00:00:00,3\n").unwrap();

    let request = ExtractRequest {
        files: vec![a, b.clone()],
        selection: ColumnSelection::new(vec![0, 1, 3]),
        range: range("01/01/2024 00:00:00", "31/12/2024 00:00:00"),
    };
    let err = extract(&request).unwrap_err();
    assert!(matches!(
        err,
        ExtractorError::Data(DataError::ColumnOutOfRange { ref file, index: 3, width: 3 }) if *file == b
    ));
    assert_eq!(err.category(), ErrorCategory::Operation);
}

// =============================================================================
// Validation and edge cases
// =============================================================================

#[test]
fn e2e_missing_time_column_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut session = session_with(vec![fixture("logger_single.csv")], &[0, 2]);
    session.start_text = "01/03/2024 00:00:00".into();
    session.end_text = "02/03/2024 23:59:59".into();

    let err = session.extract_to(&out).unwrap_err();
    assert!(matches!(
        err,
        ExtractorError::Validation(ValidationError::MissingDateTimeColumns { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::MissingRequiredColumn);
    assert!(!out.exists());
}

#[test]
fn e2e_empty_range_yields_header_only() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut session = session_with(vec![fixture("logger_single.csv")], &[0, 1, 2]);
    session.start_text = "02/03/2024 00:00:00".into();
    session.end_text = "01/03/2024 00:00:00".into();

    let table = session.extract_to(&out).unwrap();
    assert!(table.is_empty());
    assert_eq!(read(&out), "Date,Time,Value\n");
}

#[test]
fn e2e_failed_extraction_keeps_existing_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");
    fs::write(&out, "previous\n").unwrap();

    let mut session = session_with(vec![fixture("logger_single.csv")], &[1, 0, 2]);
    session.start_text = "01/03/2024 00:00:00".into();
    session.end_text = "02/03/2024 23:59:59".into();

    assert!(matches!(
        session.extract_to(&out),
        Err(ExtractorError::Validation(ValidationError::DateTimeNotLeading { .. }))
    ));
    assert_eq!(read(&out), "previous\n");
}

#[test]
fn e2e_output_into_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("missing").join("out.csv");

    let request = ExtractRequest {
        files: vec![fixture("logger_single.csv")],
        selection: ColumnSelection::new(vec![0, 1, 2]),
        range: range("01/03/2024 00:00:00", "02/03/2024 23:59:59"),
    };
    let table = extract(&request).unwrap();
    let err = save_output(&table, &out).unwrap_err();
    assert!(matches!(err, ExtractorError::Io { .. }));
    assert!(!err.is_user_error());
}

// =============================================================================
// Range auto-population
// =============================================================================

#[test]
fn e2e_range_spans_all_files() {
    let mut session = Session::new();
    session
        .set_files(vec![fixture("logger_part1.csv"), fixture("logger_part2.csv")])
        .unwrap();

    let found = session.populate_range().unwrap();
    assert!(found.is_some());
    assert_eq!(session.start_text, "01/01/2024 00:00:00");
    assert_eq!(session.end_text, "04/01/2024 00:00:00");
}

#[test]
fn e2e_range_skips_files_without_date_time_headers() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.csv");
    fs::write(&other, "Stamp,Value\n01/01/2020 00:00:00,1\n").unwrap();

    let mut session = Session::new();
    session
        .set_files(vec![other, fixture("logger_tab.txt")])
        .unwrap();

    session.populate_range().unwrap();
    assert_eq!(session.start_text, "05/06/2024 09:30:00");
    assert_eq!(session.end_text, "05/06/2024 09:31:00");
}

/// Auto-populated range text feeds straight back into an extraction.
#[test]
fn e2e_populated_range_extracts_everything() {
    let files = vec![fixture("logger_part1.csv"), fixture("logger_part2.csv")];
    let mut session = session_with(files, &[0, 1, 2]);
    session.populate_range().unwrap();

    let table = session.extract().unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table.rows[5], vec!["04/01/2024", "00:00:00", "4.0"]);
}
