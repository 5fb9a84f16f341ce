pub mod database;
pub mod queries;
pub mod smartsheet;

use thiserror::Error;

use crate::models::{PositionalRow, SheetData};

pub use self::database::MysqlSource;
pub use self::smartsheet::SmartsheetClient;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to connect to {target}: {detail}")]
    Connection { target: String, detail: String },
    #[error("query `{label}` failed: {detail}")]
    Query { label: String, detail: String },
    #[error("request for {resource} returned HTTP {status}: {body}")]
    Api {
        resource: String,
        status: u16,
        body: String,
    },
    #[error("request for {resource} failed: {detail}")]
    Transport { resource: String, detail: String },
    #[error("failed to decode {resource}: {detail}")]
    Decode { resource: String, detail: String },
}

impl SourceError {
    /// Connection failures abort a command; everything else degrades the
    /// affected dataset to "no data".
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// A relational source answering fixed, parameterless queries with
/// positional rows.
pub trait QuerySource {
    /// `label` names the query in diagnostics.
    fn query(&mut self, label: &str, sql: &str) -> Result<Vec<PositionalRow>, SourceError>;
}

/// A spreadsheet source that returns a whole sheet per request.
pub trait SheetSource {
    fn fetch_sheet(&self, sheet_id: &str) -> Result<SheetData, SourceError>;
}
