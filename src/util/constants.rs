// LogExtract - util/constants.rs
//
// Single source of truth for all named constants, fixed formats, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogExtract";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "LogExtract";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Fixed date/time formats
// =============================================================================

/// Date cell format expected by the row validator (day first).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Time cell format expected by the row validator (24-hour, zero-padded).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Format of the user-facing start/end range text.
pub const RANGE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Human-readable form of `RANGE_FORMAT`, used in error messages.
pub const RANGE_FORMAT_HINT: &str = "DD/MM/YYYY HH:MM:SS";

/// Additional day-first layouts accepted when building a combined timestamp
/// from a date cell and a time cell. Tried in order after `RANGE_FORMAT`.
pub const COMBINED_FALLBACK_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

// =============================================================================
// Delimiter detection
// =============================================================================

/// Candidate delimiters in tie-break preference order.
pub const DELIMITER_CANDIDATES: &[u8] = b",\t; ";

/// Delimiter used when detection is ambiguous or finds nothing.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Byte-order mark that may prefix UTF-8 input files.
pub const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// Extraction
// =============================================================================

/// Substring whose presence in the first cell marks a repeated header row
/// in the second and later files of a multi-file merge. Case-sensitive.
pub const REPEATED_HEADER_MARKER: &str = "Date";

/// Default position of the date column in the source files.
pub const DEFAULT_DATE_COLUMN: usize = 0;

/// Default position of the time column in the source files.
pub const DEFAULT_TIME_COLUMN: usize = 1;

/// Header name the range scanner looks for to find the date column.
pub const DEFAULT_DATE_HEADER: &str = "Date";

/// Header name the range scanner looks for to find the time column.
pub const DEFAULT_TIME_HEADER: &str = "Time";

/// Suffix appended to the output path for the temporary file written
/// before the final rename.
pub const OUTPUT_TEMP_SUFFIX: &str = "partial";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a cell value echoed into logs or error messages.
pub const DEBUG_MAX_CELL_PREVIEW: usize = 80;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
