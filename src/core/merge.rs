// LogExtract - core/merge.rs
//
// Multi-file merge: concatenate tables in the given file order, keeping
// each file's row order. The first file is taken whole; later files drop
// rows flagged by `looks_like_repeated_header_row`. No cross-file
// deduplication.

use crate::core::model::{Row, Table};
use crate::core::validate::looks_like_repeated_header_row;

/// Output of a merge.
#[derive(Debug, Clone)]
pub struct MergedRows {
    /// All retained rows, file order then row order.
    pub rows: Vec<Row>,

    /// Rows dropped as repeated headers.
    pub dropped: usize,
}

/// Concatenate `tables` into one row sequence.
pub fn merge_tables(tables: Vec<Table>) -> MergedRows {
    let total: usize = tables.iter().map(|t| t.rows.len()).sum();
    let mut rows = Vec::with_capacity(total);
    let mut dropped = 0;

    for (position, table) in tables.into_iter().enumerate() {
        let before = rows.len();
        let read = table.rows.len();
        let delimiter = table.delimiter;

        if position == 0 {
            rows.extend(table.rows);
        } else {
            rows.extend(
                table
                    .rows
                    .into_iter()
                    .filter(|row| !looks_like_repeated_header_row(row)),
            );
        }

        let kept = rows.len() - before;
        dropped += read - kept;
        tracing::debug!(
            path = %table.path.display(),
            %delimiter,
            read,
            kept,
            "Merged table"
        );
    }

    MergedRows { rows, dropped }
}
