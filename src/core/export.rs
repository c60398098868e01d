// LogExtract - core/export.rs
//
// CSV serialisation of an extraction result.
// Core layer: writes to any Write trait object; the app layer decides
// where the bytes end up.
//
// Format: comma-delimited, header row of the selected column names,
// `\n` after every row, fields quoted only when necessary.

use crate::core::model::OutputTable;
use std::io::Write;

/// Write `table` as CSV. Returns the number of data rows written.
pub fn write_csv<W: Write>(table: &OutputTable, writer: W) -> csv::Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    csv_writer.write_record(&table.headers)?;

    let mut count = 0;
    for row in &table.rows {
        csv_writer.write_record(row)?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Serialise `table` into an in-memory buffer.
pub fn to_csv_bytes(table: &OutputTable) -> csv::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}
