// LogExtract - app/session.rs
//
// Interactive session state: the file list, the header catalog, the
// ordered column selection, and the range text. Every front-end action
// maps to one method here, and each runs to completion before returning.
//
// Nothing is persisted; a session lives as long as its front-end.

use crate::core::delimiter::detect_delimiter;
use crate::core::export;
use crate::core::extract::extract;
use crate::core::header::read_headers;
use crate::core::model::{
    ColumnHeader, ColumnSelection, DateTimeRange, Delimiter, ExtractRequest, OutputTable,
};
use crate::core::range::{scan_range, RangeColumns};
use crate::core::timestamp::{format_range_text, parse_range_text};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{DataError, ExtractorError, InputError, Result, ValidationError};
use std::path::{Path, PathBuf};

/// User selections for one extraction workflow.
#[derive(Debug, Clone)]
pub struct Session {
    /// Input files, in extraction order.
    files: Vec<PathBuf>,

    /// Delimiter detected in the first file when the list was set.
    detected_delimiter: Option<Delimiter>,

    /// User-chosen delimiter for header loading; wins over detection.
    delimiter_override: Option<Delimiter>,

    /// File the header catalog was loaded from.
    headers_from: Option<PathBuf>,

    /// Headers not yet selected, in file order.
    catalog: Vec<ColumnHeader>,

    /// Selected headers, in selection (output) order.
    selected: Vec<ColumnHeader>,

    /// Source columns holding the date and time.
    date_column: usize,
    time_column: usize,

    /// Header names used by the range scan.
    range_columns: RangeColumns,

    /// Range start text, `DD/MM/YYYY HH:MM:SS`.
    pub start_text: String,

    /// Range end text, `DD/MM/YYYY HH:MM:SS`.
    pub end_text: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session with default date/time columns and header names.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            detected_delimiter: None,
            delimiter_override: None,
            headers_from: None,
            catalog: Vec::new(),
            selected: Vec::new(),
            date_column: constants::DEFAULT_DATE_COLUMN,
            time_column: constants::DEFAULT_TIME_COLUMN,
            range_columns: RangeColumns::default(),
            start_text: String::new(),
            end_text: String::new(),
        }
    }

    /// Empty session using configured column positions and header names.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            date_column: config.date_column,
            time_column: config.time_column,
            range_columns: RangeColumns {
                date_header: config.date_header.clone(),
                time_header: config.time_header.clone(),
            },
            ..Self::new()
        }
    }

    // -------------------------------------------------------------------------
    // Files and delimiter
    // -------------------------------------------------------------------------

    /// Replace the file list and detect the first file's delimiter.
    ///
    /// Clears any loaded headers and selection, since they described the
    /// previous files.
    pub fn set_files(&mut self, files: Vec<PathBuf>) -> Result<Option<Delimiter>> {
        self.headers_from = None;
        self.catalog.clear();
        self.selected.clear();
        self.detected_delimiter = match files.first() {
            Some(first) => Some(detect_delimiter(first)?),
            None => None,
        };
        self.files = files;

        tracing::info!(
            files = self.files.len(),
            delimiter = ?self.detected_delimiter,
            "File list set"
        );
        Ok(self.detected_delimiter)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Delimiter shown to the user: the override if set, else the detected one.
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter_override
            .or(self.detected_delimiter)
            .unwrap_or_default()
    }

    /// Force the delimiter used for header loading.
    pub fn set_delimiter(&mut self, delimiter: Option<Delimiter>) {
        self.delimiter_override = delimiter;
    }

    /// Override which source columns hold the date and time.
    pub fn set_date_time_columns(&mut self, date_column: usize, time_column: usize) {
        self.date_column = date_column;
        self.time_column = time_column;
    }

    // -------------------------------------------------------------------------
    // Headers and selection
    // -------------------------------------------------------------------------

    /// Load the header row of the file at `position` into the catalog.
    ///
    /// The selection is reset. Without a delimiter override the file's own
    /// delimiter is detected.
    pub fn load_headers(&mut self, position: usize) -> Result<&[ColumnHeader]> {
        let path = self
            .files
            .get(position)
            .ok_or(InputError::NoFileSelected {
                position,
                available: self.files.len(),
            })?
            .clone();

        let delimiter = match self.delimiter_override {
            Some(d) => d,
            None => detect_delimiter(&path)?,
        };

        self.catalog = read_headers(&path, delimiter)?;
        self.selected.clear();
        self.headers_from = Some(path);
        Ok(&self.catalog)
    }

    /// Headers still available for selection.
    pub fn catalog(&self) -> &[ColumnHeader] {
        &self.catalog
    }

    /// Headers selected so far, in output order.
    pub fn selected(&self) -> &[ColumnHeader] {
        &self.selected
    }

    /// Move the catalog entry at `position` to the end of the selection.
    pub fn select_header(&mut self, position: usize) -> Result<()> {
        if position >= self.catalog.len() {
            return Err(InputError::NoHeaderSelected {
                position,
                available: self.catalog.len(),
            }
            .into());
        }
        let header = self.catalog.remove(position);
        tracing::debug!(header = %header, "Header selected");
        self.selected.push(header);
        Ok(())
    }

    /// Select the catalog header whose source index is `index`.
    ///
    /// Picking a column twice is a `DuplicateColumn` error; an index past
    /// the loaded header row is `ColumnOutOfRange` for that file.
    pub fn select_column(&mut self, index: usize) -> Result<()> {
        if self.selected.iter().any(|h| h.index == index) {
            return Err(ValidationError::DuplicateColumn { index }.into());
        }
        if let Some(position) = self.catalog.iter().position(|h| h.index == index) {
            return self.select_header(position);
        }
        match &self.headers_from {
            Some(file) => Err(DataError::ColumnOutOfRange {
                file: file.clone(),
                index,
                width: self.catalog.len() + self.selected.len(),
            }
            .into()),
            None => Err(InputError::NoHeaderSelected {
                position: index,
                available: 0,
            }
            .into()),
        }
    }

    /// Select source columns in the given order.
    pub fn select_columns(&mut self, indices: &[usize]) -> Result<()> {
        indices.iter().try_for_each(|&index| self.select_column(index))
    }

    /// Remove the selected entry at `position`, returning it to the catalog
    /// at its original place.
    pub fn deselect(&mut self, position: usize) -> Result<()> {
        if position >= self.selected.len() {
            return Err(InputError::NoHeaderSelected {
                position,
                available: self.selected.len(),
            }
            .into());
        }
        let header = self.selected.remove(position);
        let at = self
            .catalog
            .iter()
            .position(|h| h.index > header.index)
            .unwrap_or(self.catalog.len());
        tracing::debug!(header = %header, "Header deselected");
        self.catalog.insert(at, header);
        Ok(())
    }

    /// Current selection as an extraction column set.
    pub fn selection(&self) -> ColumnSelection {
        ColumnSelection::with_date_time(
            self.selected.iter().map(|h| h.index).collect(),
            self.date_column,
            self.time_column,
        )
    }

    // -------------------------------------------------------------------------
    // Range
    // -------------------------------------------------------------------------

    /// Fill the range text from the files' earliest and latest timestamps.
    ///
    /// Returns the range found; when nothing is found the text is left as is.
    pub fn populate_range(&mut self) -> Result<Option<DateTimeRange>> {
        if self.files.is_empty() {
            return Ok(None);
        }

        let found = scan_range(&self.files, &self.range_columns)?;
        if let Some(range) = &found {
            self.start_text = format_range_text(&range.start);
            self.end_text = format_range_text(&range.end);
        }
        Ok(found)
    }

    /// Auto-populate whichever bound is blank, leaving typed text alone.
    ///
    /// With no files this is a `NoFiles` error rather than a silent no-op,
    /// so an empty glob is reported as such.
    pub fn fill_missing_range(&mut self) -> Result<()> {
        if self.files.is_empty() {
            return Err(InputError::NoFiles.into());
        }
        let start_blank = self.start_text.trim().is_empty();
        let end_blank = self.end_text.trim().is_empty();
        if !start_blank && !end_blank {
            return Ok(());
        }

        if let Some(found) = scan_range(&self.files, &self.range_columns)? {
            if start_blank {
                self.start_text = format_range_text(&found.start);
            }
            if end_blank {
                self.end_text = format_range_text(&found.end);
            }
            tracing::info!(
                start = %self.start_text,
                end = %self.end_text,
                "Range auto-populated"
            );
        }
        Ok(())
    }

    /// Parse the range text into a range.
    pub fn range(&self) -> Result<DateTimeRange> {
        if self.start_text.trim().is_empty() || self.end_text.trim().is_empty() {
            return Err(InputError::MissingRange.into());
        }
        let start = parse_range_text("start", &self.start_text)?;
        let end = parse_range_text("end", &self.end_text)?;
        Ok(DateTimeRange::new(start, end))
    }

    // -------------------------------------------------------------------------
    // Extraction
    // -------------------------------------------------------------------------

    /// Assemble an extraction request from the current selections.
    pub fn build_request(&self) -> Result<ExtractRequest> {
        if self.files.is_empty() {
            return Err(InputError::NoFiles.into());
        }
        let range = self.range()?;
        Ok(ExtractRequest {
            files: self.files.clone(),
            selection: self.selection(),
            range,
        })
    }

    /// Run the extraction without writing anything.
    pub fn extract(&self) -> Result<OutputTable> {
        extract(&self.build_request()?)
    }

    /// Run the extraction and write the result to `path`.
    ///
    /// Nothing is written unless the extraction succeeds.
    pub fn extract_to(&self, path: &Path) -> Result<OutputTable> {
        let output = self.extract()?;
        save_output(&output, path)?;
        Ok(output)
    }
}

/// Serialise `output` as CSV and write it atomically to `path`.
pub fn save_output(output: &OutputTable, path: &Path) -> Result<usize> {
    let bytes = export::to_csv_bytes(output).map_err(|e| ExtractorError::Io {
        path: path.to_path_buf(),
        operation: "serialise output",
        source: e.into(),
    })?;
    fs::write_atomic(path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        rows = output.len(),
        columns = output.headers.len(),
        "Output saved"
    );
    Ok(output.len())
}

// =============================================================================
// Unit tests
// =============================================================================
