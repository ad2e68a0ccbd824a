//! Append-only CSV output.
//!
//! The file is reopened for every successful day and closed again before the
//! next request, so a crash mid-run loses at most the day being written.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::error::CollectorError;
use crate::types::{Record, Schema};

/// Reports whether `path` already holds data, in which case no header is written.
///
/// # Errors
///
/// Returns [`CollectorError::Io`] if the file exists but cannot be inspected.
pub fn output_has_content(path: &Path) -> Result<bool, CollectorError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() > 0),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CollectorError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Appends `records` to the CSV at `path` in `schema` column order.
///
/// Creates the parent directory and the file when missing, and writes the
/// header first unless `header_written` is already set. Returns the new value
/// of the header flag.
///
/// # Errors
///
/// Returns [`CollectorError::Io`] when the directory or file cannot be
/// created or opened, and [`CollectorError::Csv`] when a row cannot be written.
pub fn append_rows(
    path: &Path,
    records: &[Record],
    schema: &Schema,
    header_written: bool,
) -> Result<bool, CollectorError> {
    let io_err = |source: io::Error| CollectorError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| CollectorError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !header_written {
        writer.write_record(schema.fields()).map_err(csv_err)?;
    }
    for record in records {
        writer.write_record(schema.row(record)).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(true)
}
