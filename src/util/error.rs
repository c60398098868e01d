// LogExtract - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Each failure class has its own enum; all of them fold into
// `ExtractorError`, which the front-end turns into one user-facing message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogExtract operations.
#[derive(Debug)]
pub enum ExtractorError {
    /// A required selection (file, column, range) was not made.
    Input(InputError),

    /// User-supplied values failed validation.
    Validation(ValidationError),

    /// File content could not be turned into the requested output.
    Data(DataError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

/// User-facing message category for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Something the user must pick was not picked.
    MissingSelection,
    /// Start/end text does not match the fixed format.
    InvalidDateTimeFormat,
    /// Date and time columns are not both part of the selection.
    MissingRequiredColumn,
    /// Anything else; the message carries the underlying cause.
    Operation,
}

impl ErrorCategory {
    /// Short title for the message shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCategory::MissingSelection => "Missing selection",
            ErrorCategory::InvalidDateTimeFormat => "Invalid date/time format",
            ErrorCategory::MissingRequiredColumn => "Missing required column",
            ErrorCategory::Operation => "Operation failed",
        }
    }
}

impl ExtractorError {
    /// Classify this error for presentation.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Input(_) => ErrorCategory::MissingSelection,
            Self::Validation(
                ValidationError::InvalidDateTime { .. } | ValidationError::LeapSecond { .. },
            ) => ErrorCategory::InvalidDateTimeFormat,
            Self::Validation(
                ValidationError::MissingDateTimeColumns { .. }
                | ValidationError::DateTimeNotLeading { .. },
            ) => ErrorCategory::MissingRequiredColumn,
            Self::Validation(_) | Self::Data(_) | Self::Config(_) | Self::Io { .. } => {
                ErrorCategory::Operation
            }
        }
    }

    /// True for failures caused by what the user did (or did not) select,
    /// as opposed to file content or the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Validation(_))
    }
}

impl fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Data(e) => write!(f, "Data error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ExtractorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// A selection required by the requested action is missing.
#[derive(Debug)]
pub enum InputError {
    /// No input files were given.
    NoFiles,

    /// The file chosen for header loading does not exist in the file list.
    NoFileSelected { position: usize, available: usize },

    /// No columns were selected for extraction.
    NoColumns,

    /// A header position does not exist in the list it was picked from.
    NoHeaderSelected { position: usize, available: usize },

    /// Start or end of the range was left blank.
    MissingRange,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFiles => write!(f, "Please select at least one file."),
            Self::NoFileSelected {
                position,
                available,
            } => write!(
                f,
                "Please select a file to load headers (position {position}, {available} file(s) loaded)."
            ),
            Self::NoColumns => write!(f, "Please select the columns to extract."),
            Self::NoHeaderSelected {
                position,
                available,
            } => write!(
                f,
                "No header at position {position} ({available} header(s) available)."
            ),
            Self::MissingRange => write!(f, "Please specify the start and end date/time."),
        }
    }
}

impl std::error::Error for InputError {}

impl From<InputError> for ExtractorError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// User-supplied values that are present but unusable.
#[derive(Debug)]
pub enum ValidationError {
    /// Range text does not match the fixed `DD/MM/YYYY HH:MM:SS` format.
    InvalidDateTime {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },

    /// Range text has the right shape but a seconds field of 60.
    LeapSecond { field: &'static str, value: String },

    /// The date or time column is not part of the selected columns.
    MissingDateTimeColumns { date: usize, time: usize },

    /// Date and time are selected but are not the first two picks.
    DateTimeNotLeading {
        date: usize,
        time: usize,
        leading: Vec<usize>,
    },

    /// A column index was selected more than once.
    DuplicateColumn { index: usize },

    /// Date and time were configured as the same column.
    SameDateTimeColumn { index: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDateTime {
                field,
                value,
                source,
            } => write!(
                f,
                "Invalid {field} date/time '{value}': {source}. Expected {}",
                super::constants::RANGE_FORMAT_HINT
            ),
            Self::LeapSecond { field, value } => write!(
                f,
                "Invalid {field} date/time '{value}': seconds must be 00-59. Expected {}",
                super::constants::RANGE_FORMAT_HINT
            ),
            Self::MissingDateTimeColumns { date, time } => write!(
                f,
                "Date and Time columns must be selected for datetime conversion \
                 (date column [{date}], time column [{time}])."
            ),
            Self::DateTimeNotLeading {
                date,
                time,
                leading,
            } => write!(
                f,
                "The first two selected columns must be Date [{date}] then Time [{time}], \
                 got {leading:?}."
            ),
            Self::DuplicateColumn { index } => {
                write!(f, "Column [{index}] is selected more than once.")
            }
            Self::SameDateTimeColumn { index } => write!(
                f,
                "Date and Time cannot both be column [{index}]."
            ),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDateTime { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for ExtractorError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Data errors
// ---------------------------------------------------------------------------

/// File content that cannot be turned into the requested output.
#[derive(Debug)]
pub enum DataError {
    /// File is not valid UTF-8.
    InvalidEncoding {
        file: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// File has no header row.
    EmptyFile { file: PathBuf },

    /// The delimited content could not be parsed.
    Malformed { file: PathBuf, source: csv::Error },

    /// A data row has a different number of fields than the header.
    RaggedRow {
        file: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A selected column index exceeds the width of a file's table.
    ColumnOutOfRange {
        file: PathBuf,
        index: usize,
        width: usize,
    },

    /// A row's date and time cells do not form a parseable timestamp.
    TimestampParse {
        file: PathBuf,
        line: u64,
        value: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding { file, source } => {
                write!(f, "'{}': invalid UTF-8 encoding: {source}", file.display())
            }
            Self::EmptyFile { file } => {
                write!(f, "'{}': file is empty (no header row)", file.display())
            }
            Self::Malformed { file, source } => {
                write!(f, "'{}': cannot parse delimited data: {source}", file.display())
            }
            Self::RaggedRow {
                file,
                line,
                expected,
                found,
            } => write!(
                f,
                "'{}' line {line}: expected {expected} fields, found {found}",
                file.display()
            ),
            Self::ColumnOutOfRange { file, index, width } => write!(
                f,
                "'{}': column [{index}] is out of bounds, file has {width} column(s)",
                file.display()
            ),
            Self::TimestampParse { file, line, value } => write!(
                f,
                "'{}' line {line}: cannot parse '{value}' as a day-first date and time",
                file.display()
            ),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DataError> for ExtractorError {
    fn from(e: DataError) -> Self {
        Self::Data(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for ExtractorError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogExtract results.
pub type Result<T> = std::result::Result<T, ExtractorError>;
