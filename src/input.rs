//! Sample file loading.
//!
//! Turns a JSON or CSV file into a [`Dataset`] before any inference runs.
//! Failures here are reported as [`InputError`]; the inference engine itself
//! never sees partially parsed input.

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::{
    infer::{Dataset, Record},
    io_utils,
};

/// Errors raised while reading sample data.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file type: {} (expected .json, .csv or .tsv)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {}: {source}", .path.display())]
    InvalidCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to decode {} (row {row}) as {encoding}", .path.display())]
    Decode {
        path: PathBuf,
        row: usize,
        encoding: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(InputFormat::Json)
        } else if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv") {
            Some(InputFormat::Csv)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let format =
        InputFormat::from_path(path).ok_or_else(|| InputError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = io_utils::open_input(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = match format {
        InputFormat::Json => read_json(reader, path, options.encoding)?,
        InputFormat::Csv => {
            let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
            debug!(
                "Reading {path:?} as CSV with delimiter '{}'",
                io_utils::printable_delimiter(delimiter)
            );
            Dataset::Records(read_csv(reader, path, delimiter, options.encoding)?)
        }
    };
    debug!("Loaded {} row(s) from {path:?}", dataset.row_count());
    Ok(dataset)
}

pub fn read_json<R>(mut reader: R, path: &Path, encoding: &'static Encoding) -> Result<Dataset, InputError>
where
    R: Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let text = io_utils::decode_bytes(&bytes, encoding).ok_or_else(|| InputError::Decode {
        path: path.to_path_buf(),
        row: 0,
        encoding: encoding.name(),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| InputError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Dataset::from_json(value))
}

/// Reads CSV rows keyed by the header row. Every cell stays a string;
/// numeric types are recovered later during reconciliation.
pub fn read_csv<R>(
    reader: R,
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<Record>, InputError>
where
    R: Read,
{
    let invalid = |source| InputError::InvalidCsv {
        path: path.to_path_buf(),
        source,
    };
    let decode_failed = |row| InputError::Decode {
        path: path.to_path_buf(),
        row,
        encoding: encoding.name(),
    };

    let mut reader = io_utils::open_csv_reader(reader, delimiter);
    let header_record = reader.byte_headers().map_err(invalid)?.clone();
    let headers = io_utils::decode_record(&header_record, encoding).ok_or_else(|| decode_failed(1))?;

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(invalid)? {
        let line = rows.len() + 2;
        let fields = io_utils::decode_record(&record, encoding).ok_or_else(|| decode_failed(line))?;
        let row = headers
            .iter()
            .cloned()
            .zip(fields.into_iter().map(Value::String))
            .collect::<Record>();
        rows.push(row);
    }
    Ok(rows)
}
