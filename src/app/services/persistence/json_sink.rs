//! JSON document sink

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    ReadSink, SourceRead, StoredRead, create_new_file, ensure_directory, generate_read_id,
};
use crate::app::models::DexReadResult;
use crate::{Error, Result};

/// Document layout written for each read
#[derive(Debug, Serialize)]
struct StoredDocument<'a> {
    read_id: &'a str,
    device_id: Option<&'a str>,
    source_path: Option<&'a Path>,
    parsed_at: DateTime<Utc>,
    raw_input: &'a str,
    result: &'a DexReadResult,
}

/// Writes `<read_id>.json` into a directory
#[derive(Debug, Clone)]
pub struct JsonSink {
    directory: PathBuf,
}

impl JsonSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ReadSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn store(&self, source: &SourceRead, result: &DexReadResult) -> Result<StoredRead> {
        ensure_directory(&self.directory)?;

        let parsed_at = Utc::now();
        let read_id = generate_read_id(source, parsed_at);
        let path = self.directory.join(format!("{}.json", read_id));

        let document = StoredDocument {
            read_id: &read_id,
            device_id: source.device_id.as_deref(),
            source_path: source.source_path.as_deref(),
            parsed_at,
            raw_input: &source.raw_text,
            result,
        };

        let file = create_new_file(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document).map_err(|e| {
            Error::serialization(format!("Failed to write {}", path.display()), e)
        })?;
        writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))?;

        info!("Stored read {} as {}", read_id, path.display());

        Ok(StoredRead {
            read_id,
            paths: vec![path],
        })
    }
}
