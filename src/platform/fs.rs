// LogExtract - platform/fs.rs
//
// Filesystem helpers: whole-file UTF-8 reads with BOM stripping, first-line
// reads for delimiter detection, input glob expansion, and atomic output
// writes. All file access in the crate goes through here.

use crate::util::constants;
use crate::util::error::{DataError, ExtractorError, Result};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Remove a leading UTF-8 byte-order mark, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(constants::UTF8_BOM).unwrap_or(text)
}

/// Read the full content of a file as UTF-8 text with any BOM removed.
///
/// The whole file is held in memory; there is no streaming path.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ExtractorError::Io {
        path: path.to_path_buf(),
        operation: "read input file",
        source: e,
    })?;

    let mut text = String::from_utf8(bytes).map_err(|e| DataError::InvalidEncoding {
        file: path.to_path_buf(),
        source: e,
    })?;

    if text.starts_with(constants::UTF8_BOM) {
        text.replace_range(..constants::UTF8_BOM.len_utf8(), "");
    }

    tracing::debug!(path = %path.display(), bytes = text.len(), "Read input file");
    Ok(text)
}

/// Read only the first line of a file, without its line terminator and BOM.
///
/// Returns `Ok(None)` for an empty file. Invalid UTF-8 is replaced rather
/// than reported, since the caller only sniffs the line.
pub fn read_first_line(path: &Path) -> io::Result<Option<String>> {
    let file = std::fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(&buf);
    let line = strip_bom(&line).trim_end_matches(['\n', '\r']);
    Ok(Some(line.to_string()))
}

/// Expand input arguments into file paths.
///
/// Arguments containing glob metacharacters are expanded and the matches
/// sorted; other arguments are passed through unchanged, in order.
/// A pattern that matches nothing contributes nothing.
pub fn expand_inputs(args: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::with_capacity(args.len());

    for arg in args {
        let text = arg.to_string_lossy();
        if !text.contains(['*', '?', '[']) {
            files.push(arg.clone());
            continue;
        }

        match glob::glob(&text) {
            Ok(paths) => {
                let mut matched: Vec<PathBuf> = paths
                    .filter_map(|entry| match entry {
                        Ok(p) if p.is_file() => Some(p),
                        Ok(_) => None,
                        Err(e) => {
                            tracing::warn!(error = %e, "Skipping unreadable glob match");
                            None
                        }
                    })
                    .collect();
                matched.sort();
                if matched.is_empty() {
                    tracing::warn!(pattern = %text, "Input pattern matched no files");
                }
                files.extend(matched);
            }
            Err(e) => {
                // Not a valid pattern; treat it as a literal path.
                tracing::debug!(pattern = %text, error = %e, "Invalid glob pattern");
                files.push(arg.clone());
            }
        }
    }

    files
}

/// Write `bytes` to `path` atomically (write temp, then rename).
///
/// A failure never leaves a half-written file at `path`, and an existing
/// file at `path` is only replaced once the new content is fully on disk.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);

    std::fs::write(&tmp, bytes).map_err(|e| ExtractorError::Io {
        path: tmp.clone(),
        operation: "write output",
        source: e,
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        ExtractorError::Io {
            path: path.to_path_buf(),
            operation: "finalise output",
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Output written");
    Ok(())
}

/// Sibling temp path used by `write_atomic`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(constants::OUTPUT_TEMP_SUFFIX);
    path.with_file_name(name)
}
