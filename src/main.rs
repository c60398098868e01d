// LogExtract - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Dispatch to the delimiter / headers / range / extract commands

use clap::{Parser, Subcommand};
use logextract::app::session::Session;
use logextract::core::delimiter::detect_delimiter;
use logextract::core::header::read_headers;
use logextract::core::model::{ColumnSelection, Delimiter};
use logextract::platform::{config, fs};
use logextract::util::constants;
use logextract::util::error::{ExtractorError, InputError, Result};
use std::path::PathBuf;
use std::process::ExitCode;

/// LogExtract - Extract columns and time windows from delimited logger exports.
///
/// Reads one or more delimited text files whose first two columns carry a
/// date and a time, and writes the selected columns for rows inside a
/// date/time range to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "logextract", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the delimiter detected in a file's first line.
    Delimiter {
        file: PathBuf,
    },

    /// List a file's column headers with their indices.
    Headers {
        file: PathBuf,

        /// Delimiter to split on instead of the detected one.
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<Delimiter>,

        /// Print JSON instead of `[index] name` lines.
        #[arg(long)]
        json: bool,
    },

    /// Print the earliest and latest Date/Time found across files.
    Range {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Extract selected columns for rows inside a date/time range.
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Column indices in output order; date and time must come first.
        #[arg(long, required = true, value_delimiter = ',')]
        columns: Vec<usize>,

        /// Range start, DD/MM/YYYY HH:MM:SS (auto-populated if omitted).
        #[arg(long)]
        start: Option<String>,

        /// Range end, DD/MM/YYYY HH:MM:SS (auto-populated if omitted).
        #[arg(long)]
        end: Option<String>,

        /// Output CSV path.
        #[arg(short = 'o', long, required = true)]
        output: PathBuf,

        /// Source column holding the date.
        #[arg(long)]
        date_column: Option<usize>,

        /// Source column holding the time.
        #[arg(long)]
        time_column: Option<usize>,

        /// Print extraction counts as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_delimiter(name: &str) -> std::result::Result<Delimiter, String> {
    Delimiter::from_name(name)
        .ok_or_else(|| format!("unknown delimiter '{name}' (expected comma, semicolon, tab or space)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let (app_config, warnings) = config::load_config(&config_path);

    logextract::util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "LogExtract starting"
    );
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    match run(cli.command, &app_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, category = e.category().title(), "Command failed");
            eprintln!("Error: {e}");
            if e.is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(command: Command, app_config: &config::AppConfig) -> Result<()> {
    match command {
        Command::Delimiter { file } => {
            let delimiter = detect_delimiter(&file)?;
            println!("{}", delimiter.label());
        }

        Command::Headers {
            file,
            delimiter,
            json,
        } => {
            let delimiter = match delimiter {
                Some(d) => d,
                None => detect_delimiter(&file)?,
            };
            let headers = read_headers(&file, delimiter)?;
            if json {
                let value = serde_json::json!({
                    "delimiter": delimiter,
                    "headers": headers,
                });
                println!("{}", to_json(&value)?);
            } else {
                for header in &headers {
                    println!("{header}");
                }
            }
        }

        Command::Range { files, json } => {
            let mut session = Session::from_config(app_config);
            session.set_files(fs::expand_inputs(&files))?;
            if session.files().is_empty() {
                return Err(InputError::NoFiles.into());
            }
            match session.populate_range()? {
                Some(_) if json => {
                    let value = serde_json::json!({
                        "start": session.start_text,
                        "end": session.end_text,
                    });
                    println!("{}", to_json(&value)?);
                }
                Some(_) => {
                    println!("start: {}", session.start_text);
                    println!("end:   {}", session.end_text);
                }
                None => {
                    eprintln!(
                        "No '{}'/'{}' values found in the given files",
                        app_config.date_header, app_config.time_header
                    );
                }
            }
        }

        Command::Extract {
            files,
            columns,
            start,
            end,
            output,
            date_column,
            time_column,
            json,
        } => {
            let date_column = date_column.unwrap_or(app_config.date_column);
            let time_column = time_column.unwrap_or(app_config.time_column);
            ColumnSelection::with_date_time(columns.clone(), date_column, time_column).validate()?;

            let mut session = Session::from_config(app_config);
            session.set_date_time_columns(date_column, time_column);
            session.set_files(fs::expand_inputs(&files))?;
            if session.files().is_empty() {
                return Err(InputError::NoFiles.into());
            }

            session.load_headers(0)?;
            session.select_columns(&columns)?;

            session.start_text = start.unwrap_or_default();
            session.end_text = end.unwrap_or_default();
            session.fill_missing_range()?;

            let table = session.extract_to(&output)?;

            if json {
                let value = serde_json::json!({
                    "output": output.display().to_string(),
                    "mode": table.mode,
                    "start": session.start_text,
                    "end": session.end_text,
                    "stats": table.stats,
                });
                println!("{}", to_json(&value)?);
            } else {
                println!("Wrote {} rows to {}", table.len(), output.display());
            }
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ExtractorError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "serialise JSON",
        source: e.into(),
    })
}
