// LogExtract - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation. Invalid values produce warnings and fall back to defaults;
// the tool always starts.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolve the directory holding `config.toml`.
///
/// Falls back to the current directory if platform dirs cannot be determined.
pub fn config_dir() -> PathBuf {
    match ProjectDirs::from("", "", constants::APP_ID) {
        Some(dirs) => {
            let dir = dirs.config_dir().to_path_buf();
            tracing::debug!(config = %dir.display(), "Config directory resolved");
            dir
        }
        None => {
            tracing::warn!("Could not determine platform directories, using current directory");
            PathBuf::from(".")
        }
    }
}

/// Default location of `config.toml`.
pub fn default_config_path() -> PathBuf {
    config_dir().join(constants::CONFIG_FILE_NAME)
}

// =============================================================================
// Raw file shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[range]` section.
    pub range: RangeSection,
    /// `[extract]` section.
    pub extract: ExtractSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[range]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RangeSection {
    /// Header name of the date column scanned for the default range.
    pub date_header: Option<String>,
    /// Header name of the time column scanned for the default range.
    pub time_header: Option<String>,
}

/// `[extract]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Source column index holding the date.
    pub date_column: Option<usize>,
    /// Source column index holding the time.
    pub time_column: Option<usize>,
}

// =============================================================================
// Validated config
// =============================================================================

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Logging level string (applied before tracing is initialised).
    pub log_level: Option<String>,

    /// Header names the range scanner looks for.
    pub date_header: String,
    pub time_header: String,

    /// Source column indices of the date and time fields.
    pub date_column: usize,
    pub time_column: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            date_header: constants::DEFAULT_DATE_HEADER.to_string(),
            time_header: constants::DEFAULT_TIME_HEADER.to_string(),
            date_column: constants::DEFAULT_DATE_COLUMN,
            time_column: constants::DEFAULT_TIME_COLUMN,
        }
    }
}

/// Load and validate a config file.
///
/// Returns the config plus human-readable warnings. A missing file yields
/// defaults with no warnings; an unreadable or unparseable file yields
/// defaults with one warning.
///
/// Runs before logging is initialised (the level comes from here), so
/// problems are reported through the returned warnings.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if !path.exists() {
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(path) {
        Ok(raw) => raw,
        Err(e) => {
            warnings.push(format!("{e}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let config = validate(raw, &mut warnings);
    (config, warnings)
}

/// Read and parse config.toml without validating values.
pub fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate every field of a raw config, accumulating warnings.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Range: header names --
    for (key, value, target) in [
        ("date_header", raw.range.date_header, &mut config.date_header),
        ("time_header", raw.range.time_header, &mut config.time_header),
    ] {
        if let Some(name) = value {
            if name.is_empty() {
                warnings.push(format!(
                    "[range] {key} must not be empty. Using default (\"{target}\")."
                ));
            } else {
                *target = name;
            }
        }
    }

    // -- Extract: date/time columns --
    let date_column = raw.extract.date_column.unwrap_or(config.date_column);
    let time_column = raw.extract.time_column.unwrap_or(config.time_column);
    if date_column == time_column {
        warnings.push(format!(
            "[extract] date_column and time_column are both {date_column}. \
             Using defaults ({} and {}).",
            constants::DEFAULT_DATE_COLUMN,
            constants::DEFAULT_TIME_COLUMN,
        ));
    } else {
        config.date_column = date_column;
        config.time_column = time_column;
    }

    config
}
