//! Shared extract → map → rank → merge steps used by the export commands.

pub mod contacts;
pub mod stats;

use thiserror::Error;
use tracing::warn;

use crate::mapper::{self, MapError};
use crate::merge::MergeError;
use crate::models::RecordSet;
use crate::ranking::RankError;
use crate::schema::Schema;
use crate::sources::{QuerySource, SourceError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Rank(#[from] RankError),
}

impl PipelineError {
    /// True when the failure means "this query produced no data" rather than
    /// "the pipeline cannot continue".
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Source(error) if !error.is_connection())
    }
}

/// Runs `sql` and maps its rows through `schema`.
pub fn extract<S>(
    source: &mut S,
    label: &str,
    sql: &str,
    schema: &Schema,
) -> Result<RecordSet, PipelineError>
where
    S: QuerySource + ?Sized,
{
    let rows = source.query(label, sql)?;
    Ok(mapper::map_positional(&rows, schema)?)
}

/// Like [`extract`], but a failed query is logged and treated as no data.
/// Connection and mapping failures still propagate.
pub fn extract_or_empty<S>(
    source: &mut S,
    label: &str,
    sql: &str,
    schema: &Schema,
) -> Result<RecordSet, PipelineError>
where
    S: QuerySource + ?Sized,
{
    match extract(source, label, sql, schema) {
        Err(error) if error.is_degradable() => {
            warn!(query = label, error = %error, "query failed; continuing with no data");
            Ok(RecordSet::new(schema.field_names()))
        }
        other => other,
    }
}
