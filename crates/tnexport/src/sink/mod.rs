//! Writes finished record sets to disk.
//!
//! Payloads are encoded fully in memory before the file is touched, so a
//! failure while encoding never leaves a half-written export behind.

use std::fmt;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::models::RecordSet;
use crate::utils::time::{format_run_stamp, now_local_or_utc};

pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode {format} payload for {path}: {detail}")]
    Encode {
        format: OutputFormat,
        path: PathBuf,
        detail: String,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `YYYYMMDD_HHMMSS` stamp shared by every file of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp(String);

impl RunStamp {
    pub fn now() -> anyhow::Result<Self> {
        Self::at(now_local_or_utc())
    }

    pub fn at(moment: OffsetDateTime) -> anyhow::Result<Self> {
        format_run_stamp(moment).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A file name or path that may embed `{timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate(String);

impl PathTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitutes the stamp and anchors relative results under `out_dir`.
    #[must_use]
    pub fn resolve(&self, out_dir: &Path, stamp: &RunStamp) -> PathBuf {
        let rendered = self.0.replace(TIMESTAMP_PLACEHOLDER, stamp.as_str());
        let path = PathBuf::from(rendered);
        if path.is_absolute() {
            path
        } else {
            out_dir.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub format: OutputFormat,
    pub path: PathTemplate,
}

impl Destination {
    #[must_use]
    pub fn json(path: impl Into<String>) -> Self {
        Self {
            format: OutputFormat::Json,
            path: PathTemplate::new(path),
        }
    }

    #[must_use]
    pub fn csv(path: impl Into<String>) -> Self {
        Self {
            format: OutputFormat::Csv,
            path: PathTemplate::new(path),
        }
    }
}

/// Resolves `destination`, encodes `records` and writes them in one shot.
/// Returns the path written.
pub fn write_records(
    records: &RecordSet,
    destination: &Destination,
    out_dir: &Path,
    stamp: &RunStamp,
) -> Result<PathBuf, SinkError> {
    let path = destination.path.resolve(out_dir, stamp);
    let payload = match destination.format {
        OutputFormat::Json => encode_json(records),
        OutputFormat::Csv => encode_csv(records),
    }
    .map_err(|detail| SinkError::Encode {
        format: destination.format,
        path: path.clone(),
        detail,
    })?;

    write_payload(&path, &payload)?;
    info!(
        path = %path.display(),
        format = destination.format.as_str(),
        records = records.len(),
        "export written"
    );
    Ok(path)
}

/// Two-space indented array of objects, field order preserved.
pub fn encode_json(records: &RecordSet) -> Result<Vec<u8>, String> {
    serde_json::to_vec_pretty(records).map_err(|error| error.to_string())
}

/// Every field quoted, `\n` line endings, header row always present.
pub fn encode_csv(records: &RecordSet) -> Result<Vec<u8>, String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(records.fields())
        .map_err(|error| error.to_string())?;
    for record in records.records() {
        writer
            .write_record(record.iter().map(|(_, value)| value.to_csv_field()))
            .map_err(|error| error.to_string())?;
    }

    writer.into_inner().map_err(|error| error.to_string())
}

fn write_payload(path: &Path, payload: &[u8]) -> Result<(), SinkError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SinkError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, payload).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}
