// LogExtract - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use crate::util::error::ValidationError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

// =============================================================================
// Delimiter
// =============================================================================

/// Field separator of a delimited input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Space,
}

impl Delimiter {
    /// All delimiters, in detection tie-break order.
    pub fn all() -> &'static [Delimiter] {
        &[
            Delimiter::Comma,
            Delimiter::Tab,
            Delimiter::Semicolon,
            Delimiter::Space,
        ]
    }

    /// The byte written between fields.
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Space => b' ',
        }
    }

    /// Map a candidate byte back to a delimiter.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b',' => Some(Delimiter::Comma),
            b';' => Some(Delimiter::Semicolon),
            b'\t' => Some(Delimiter::Tab),
            b' ' => Some(Delimiter::Space),
            _ => None,
        }
    }

    /// Parse a user-supplied name ("comma", "tab", ...) or the literal character.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "comma" | "," => Some(Delimiter::Comma),
            "semicolon" | ";" => Some(Delimiter::Semicolon),
            "tab" | "\t" | "\\t" => Some(Delimiter::Tab),
            "space" | " " => Some(Delimiter::Space),
            _ => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Delimiter::Comma => "Comma (,)",
            Delimiter::Semicolon => "Semicolon (;)",
            Delimiter::Tab => "Tab (\\t)",
            Delimiter::Space => "Space ( )",
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Headers and tables
// =============================================================================

/// One column of a file's header row.
///
/// `name` is kept byte-for-byte as read (whitespace and hidden characters
/// included) so it can be matched against the file again later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    /// Position in the source file's column order, starting at 0.
    pub index: usize,

    /// Raw header text.
    pub name: String,
}

impl std::fmt::Display for ColumnHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}

/// One data record, one cell per original column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Cell values in original column order.
    pub cells: Vec<String>,

    /// File the row came from.
    pub source: usize,

    /// 1-based line number of the record within its file.
    pub line: u64,
}

impl Row {
    /// Cell at `index`, if the row is wide enough.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// All rows of one input file, sharing that file's header.
///
/// Lives for one extraction only.
#[derive(Debug, Clone)]
pub struct Table {
    /// Path the table was read from.
    pub path: PathBuf,

    /// Delimiter used to parse the file.
    pub delimiter: Delimiter,

    /// Header row, in file order.
    pub headers: Vec<String>,

    /// Data rows, in file order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of columns declared by the header row.
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

// =============================================================================
// Column selection
// =============================================================================

/// Ordered set of column indices to extract.
///
/// The selection order defines the output column order. The first two
/// entries must be the date column and the time column, in that order,
/// so the combined timestamp can be built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    indices: Vec<usize>,
    date_column: usize,
    time_column: usize,
}

impl ColumnSelection {
    /// Build a selection using the default date (0) and time (1) columns.
    pub fn new(indices: Vec<usize>) -> Self {
        Self::with_date_time(
            indices,
            constants::DEFAULT_DATE_COLUMN,
            constants::DEFAULT_TIME_COLUMN,
        )
    }

    /// Build a selection naming which source columns hold the date and time.
    pub fn with_date_time(indices: Vec<usize>, date_column: usize, time_column: usize) -> Self {
        Self {
            indices,
            date_column,
            time_column,
        }
    }

    /// Selected indices, in output order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn date_column(&self) -> usize {
        self.date_column
    }

    pub fn time_column(&self) -> usize {
        self.time_column
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Highest selected source index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Check the selection's structural rules.
    ///
    /// Rules, in order: date and time are distinct columns, no index is
    /// selected twice, both date and time are selected, and they are the
    /// first two entries (date, then time).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.date_column == self.time_column {
            return Err(ValidationError::SameDateTimeColumn {
                index: self.date_column,
            });
        }

        let mut seen = HashSet::with_capacity(self.indices.len());
        for &index in &self.indices {
            if !seen.insert(index) {
                return Err(ValidationError::DuplicateColumn { index });
            }
        }

        if !seen.contains(&self.date_column) || !seen.contains(&self.time_column) {
            return Err(ValidationError::MissingDateTimeColumns {
                date: self.date_column,
                time: self.time_column,
            });
        }

        if self.indices[..2] != [self.date_column, self.time_column][..] {
            return Err(ValidationError::DateTimeNotLeading {
                date: self.date_column,
                time: self.time_column,
                leading: self.indices[..2].to_vec(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Date/time range
// =============================================================================

/// Inclusive timestamp range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateTimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// True when `start <= ts <= end`.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.start <= *ts && *ts <= self.end
    }

    /// Widen the range so it also covers `ts`.
    pub fn extend(&mut self, ts: NaiveDateTime) {
        if ts < self.start {
            self.start = ts;
        }
        if ts > self.end {
            self.end = ts;
        }
    }
}

// =============================================================================
// Extraction request / result
// =============================================================================

/// How the input files are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// One file: rows are filtered by the strict date/time validator and
    /// kept in file order.
    SingleFile,

    /// Two or more files: later files drop repeated header rows, all rows
    /// are merged and sorted by timestamp.
    MultiFile,
}

impl ExtractMode {
    /// Mode implied by the number of input files.
    pub fn for_file_count(count: usize) -> Self {
        if count > 1 {
            ExtractMode::MultiFile
        } else {
            ExtractMode::SingleFile
        }
    }
}

/// Everything the extraction function needs.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    /// Input files, in the order given by the user.
    pub files: Vec<PathBuf>,

    /// Columns to keep.
    pub selection: ColumnSelection,

    /// Inclusive timestamp range to keep.
    pub range: DateTimeRange,
}

/// Row counts collected during one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Data rows read across all files (header rows excluded).
    pub rows_read: usize,

    /// Rows discarded before the range filter (validator or repeated-header policy).
    pub rows_discarded: usize,

    /// Rows outside the range.
    pub rows_out_of_range: usize,

    /// Rows written to the output.
    pub rows_retained: usize,
}

/// Final extraction result: selected columns only, rows in output order.
#[derive(Debug, Clone)]
pub struct OutputTable {
    /// Column names in selection order.
    pub headers: Vec<String>,

    /// Projected rows.
    pub rows: Vec<Vec<String>>,

    /// Which pipeline produced this table.
    pub mode: ExtractMode,

    /// Row accounting.
    pub stats: ExtractStats,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
