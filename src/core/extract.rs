// LogExtract - core/extract.rs
//
// The extraction pipeline: load -> (validate | merge) -> project ->
// timestamp -> (sort) -> range filter.
//
// Single-file mode pre-filters rows with the strict validator and keeps
// file order. Multi-file mode merges with the repeated-header heuristic,
// treats any unparseable timestamp as fatal, and stable-sorts by time.
// The combined timestamp never reaches the output.

use crate::core::delimiter::detect_delimiter;
use crate::core::header::{load_table, RowWidth};
use crate::core::merge::merge_tables;
use crate::core::model::{
    ColumnSelection, DateTimeRange, ExtractMode, ExtractRequest, ExtractStats, OutputTable, Row,
    Table,
};
use crate::core::timestamp;
use crate::core::validate::is_data_row;
use crate::util::error::{DataError, InputError, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// A projected row carrying its combined timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedRow {
    pub timestamp: NaiveDateTime,
    pub cells: Vec<String>,
}

/// Run one extraction.
///
/// Selection problems are reported before any file is opened.
pub fn extract(request: &ExtractRequest) -> Result<OutputTable> {
    if request.files.is_empty() {
        return Err(InputError::NoFiles.into());
    }
    if request.selection.is_empty() {
        return Err(InputError::NoColumns.into());
    }
    request.selection.validate()?;

    let mode = ExtractMode::for_file_count(request.files.len());
    tracing::info!(
        files = request.files.len(),
        columns = ?request.selection.indices(),
        ?mode,
        start = %timestamp::format_range_text(&request.range.start),
        end = %timestamp::format_range_text(&request.range.end),
        "Extraction started"
    );

    let output = match mode {
        ExtractMode::SingleFile => extract_single(&request.files[0], request)?,
        ExtractMode::MultiFile => extract_multi(request)?,
    };

    tracing::info!(
        read = output.stats.rows_read,
        discarded = output.stats.rows_discarded,
        out_of_range = output.stats.rows_out_of_range,
        retained = output.stats.rows_retained,
        "Extraction complete"
    );
    Ok(output)
}

fn extract_single(path: &Path, request: &ExtractRequest) -> Result<OutputTable> {
    let table = load_input(path, 0)?;
    check_bounds(&table, &request.selection)?;

    let headers = project_headers(&table.headers, &request.selection);
    let rows_read = table.rows.len();

    let rows: Vec<Row> = table.rows.into_iter().filter(is_data_row).collect();
    let rows_discarded = rows_read - rows.len();
    if rows_discarded > 0 {
        tracing::debug!(count = rows_discarded, "Discarded non-data rows");
    }

    let stamped = stamp_rows(rows, &request.selection, std::slice::from_ref(&table.path))?;
    let (rows, rows_out_of_range) = filter_range(stamped, &request.range);

    Ok(OutputTable {
        headers,
        stats: ExtractStats {
            rows_read,
            rows_discarded,
            rows_out_of_range,
            rows_retained: rows.len(),
        },
        rows,
        mode: ExtractMode::SingleFile,
    })
}

fn extract_multi(request: &ExtractRequest) -> Result<OutputTable> {
    let mut tables = Vec::with_capacity(request.files.len());
    for (source, path) in request.files.iter().enumerate() {
        let table = load_input(path, source)?;
        check_bounds(&table, &request.selection)?;
        tables.push(table);
    }

    let headers = project_headers(&tables[0].headers, &request.selection);
    let paths: Vec<PathBuf> = tables.iter().map(|t| t.path.clone()).collect();
    let rows_read = tables.iter().map(|t| t.rows.len()).sum();

    let merged = merge_tables(tables);
    let mut stamped = stamp_rows(merged.rows, &request.selection, &paths)?;
    sort_by_timestamp(&mut stamped);
    let (rows, rows_out_of_range) = filter_range(stamped, &request.range);

    Ok(OutputTable {
        headers,
        stats: ExtractStats {
            rows_read,
            rows_discarded: merged.dropped,
            rows_out_of_range,
            rows_retained: rows.len(),
        },
        rows,
        mode: ExtractMode::MultiFile,
    })
}

/// Load one input file with its own detected delimiter.
fn load_input(path: &Path, source: usize) -> Result<Table> {
    let delimiter = detect_delimiter(path)?;
    load_table(path, delimiter, source, RowWidth::Exact)
}

/// Fail when the selection reaches past the table's width.
pub fn check_bounds(table: &Table, selection: &ColumnSelection) -> Result<()> {
    match selection.max_index() {
        Some(index) if index >= table.width() => Err(DataError::ColumnOutOfRange {
            file: table.path.clone(),
            index,
            width: table.width(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Header names at the selected indices, in selection order.
pub fn project_headers(headers: &[String], selection: &ColumnSelection) -> Vec<String> {
    selection
        .indices()
        .iter()
        .map(|&i| headers.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Restrict a row to the selected columns, in selection order.
///
/// The selection holds no duplicates, so cells can be moved out.
pub fn project_row(row: Row, selection: &ColumnSelection) -> Vec<String> {
    let mut cells = row.cells;
    selection
        .indices()
        .iter()
        .map(|&i| cells.get_mut(i).map(std::mem::take).unwrap_or_default())
        .collect()
}

/// Project every row and attach its combined timestamp.
///
/// The date and time are the first two projected cells. Any row whose
/// timestamp cannot be parsed fails the whole operation.
/// `paths[row.source]` names the file in the error.
pub fn stamp_rows(
    rows: Vec<Row>,
    selection: &ColumnSelection,
    paths: &[PathBuf],
) -> Result<Vec<StampedRow>> {
    let mut stamped = Vec::with_capacity(rows.len());

    for row in rows {
        let (source, line) = (row.source, row.line);
        let cells = project_row(row, selection);

        let (date, time) = match cells.as_slice() {
            [date, time, ..] => (date.as_str(), time.as_str()),
            _ => ("", ""),
        };

        let Some(ts) = timestamp::parse_date_time(date, time) else {
            let file = paths.get(source).cloned().unwrap_or_default();
            let value = timestamp::preview(&timestamp::combine(date, time));
            tracing::warn!(path = %file.display(), line, value = %value, "Unparseable timestamp");
            return Err(DataError::TimestampParse { file, line, value }.into());
        };

        stamped.push(StampedRow {
            timestamp: ts,
            cells,
        });
    }

    Ok(stamped)
}

/// Stable ascending sort by timestamp; equal timestamps keep input order.
pub fn sort_by_timestamp(rows: &mut [StampedRow]) {
    rows.sort_by_key(|r| r.timestamp);
}

/// Keep rows with `start <= timestamp <= end`, dropping the timestamp.
///
/// Returns the kept rows and the number of rows dropped.
pub fn filter_range(rows: Vec<StampedRow>, range: &DateTimeRange) -> (Vec<Vec<String>>, usize) {
    let total = rows.len();
    let kept: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|r| range.contains(&r.timestamp))
        .map(|r| r.cells)
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
