//! Persistence adapters for DEX read results
//!
//! The parsing core never touches storage. Callers hand a finished
//! [`DexReadResult`] together with its source to a [`ReadSink`], which assigns
//! a durable read identifier and writes the result out.
//!
//! - [`json_sink`] - One pretty-printed JSON document per read
//! - [`parquet_sink`] - Selection and issue tables as Parquet files

pub mod json_sink;
pub mod parquet_sink;

#[cfg(test)]
pub mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::Result;
use crate::app::models::DexReadResult;

pub use json_sink::JsonSink;
pub use parquet_sink::ParquetSink;

/// The raw input a result was produced from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRead {
    /// Machine or device identifier supplied by the caller
    pub device_id: Option<String>,
    pub source_path: Option<PathBuf>,
    pub raw_text: String,
}

impl SourceRead {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            device_id: None,
            source_path: None,
            raw_text: raw_text.into(),
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

/// Where a read ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRead {
    pub read_id: String,
    pub paths: Vec<PathBuf>,
}

/// Output format of the file-based sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    Parquet,
}

/// Destination for parsed reads
pub trait ReadSink: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Store one read and return its identifier and written paths
    fn store(&self, source: &SourceRead, result: &DexReadResult) -> Result<StoredRead>;
}

/// Build a file-based sink writing into `directory`
pub fn create_sink(format: StoreFormat, directory: &Path) -> Box<dyn ReadSink> {
    match format {
        StoreFormat::Json => Box::new(JsonSink::new(directory)),
        StoreFormat::Parquet => Box::new(ParquetSink::new(directory)),
    }
}

/// Hex characters of random suffix appended to every read id
const READ_ID_SUFFIX_LEN: usize = 12;

/// Durable read identifier: `<device-or-file-stem>-<UTC timestamp>-<random hex>`
///
/// The random suffix keeps ids distinct when one device is read twice within
/// the same millisecond.
pub fn generate_read_id(source: &SourceRead, parsed_at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format_read_id(source, parsed_at, &suffix[..READ_ID_SUFFIX_LEN])
}

/// Read identifier with a caller-supplied suffix
pub fn format_read_id(source: &SourceRead, parsed_at: DateTime<Utc>, suffix: &str) -> String {
    let stem = source
        .device_id
        .as_deref()
        .filter(|device| !device.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            source
                .source_path
                .as_deref()
                .and_then(Path::file_stem)
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "read".to_string());

    format!(
        "{}-{}-{}",
        sanitize_id(&stem),
        parsed_at.format("%Y%m%dT%H%M%S%3fZ"),
        sanitize_id(suffix)
    )
}

fn sanitize_id(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Create the output directory if needed
pub(crate) fn ensure_directory(directory: &Path) -> Result<()> {
    std::fs::create_dir_all(directory).map_err(|e| {
        crate::Error::io(
            format!("Failed to create output directory {}", directory.display()),
            e,
        )
    })
}

/// Create a file that must not exist yet
///
/// Stored reads are never overwritten; an existing path is an error.
pub(crate) fn create_new_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::AlreadyExists {
                format!("Refusing to overwrite existing {}", path.display())
            } else {
                format!("Failed to create {}", path.display())
            };
            crate::Error::io(message, e)
        })
}
