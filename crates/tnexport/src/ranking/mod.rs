use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::merge::JoinKey;
use crate::models::{MappedRecord, RecordSet, Scalar};
use crate::utils::time::parse_timestamp_to_unix_ms;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("ranking field `{field}` is missing from the record set")]
    MissingField { field: String },
}

/// Field roles for [`most_recent_per_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSpec<'a> {
    pub group: &'a str,
    pub recency: &'a str,
    pub tie_break: &'a str,
}

/// Keeps the most recent record of each group.
///
/// Records with a null group are discarded. Within a group the latest
/// parseable recency wins; null or unparseable recency ranks below any
/// parseable value. Equal recency falls back to the lexically smallest
/// tie-break value, then to input order. Groups come out in order of first
/// appearance.
pub fn most_recent_per_group(set: &RecordSet, spec: RankSpec<'_>) -> Result<RecordSet, RankError> {
    for field in [spec.group, spec.recency, spec.tie_break] {
        if !set.has_field(field) {
            return Err(RankError::MissingField {
                field: field.to_string(),
            });
        }
    }

    let mut group_order = Vec::<JoinKey>::new();
    let mut winners = HashMap::<JoinKey, Candidate<'_>>::new();
    let mut ungrouped = 0_usize;

    for record in set.records() {
        let Some(group) = record.get(spec.group).and_then(JoinKey::from_scalar) else {
            ungrouped += 1;
            continue;
        };
        let candidate = Candidate::new(record, spec);

        match winners.get_mut(&group) {
            Some(current) => {
                if candidate.outranks(current) {
                    *current = candidate;
                }
            }
            None => {
                group_order.push(group.clone());
                winners.insert(group, candidate);
            }
        }
    }

    let mut ranked = RecordSet::new(set.fields().iter().cloned());
    for group in &group_order {
        if let Some(winner) = winners.remove(group) {
            ranked.push(winner.record.clone());
        }
    }

    debug!(
        group = spec.group,
        candidates = set.len(),
        groups = ranked.len(),
        ungrouped,
        "ranked most recent record per group"
    );
    Ok(ranked)
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    record: &'a MappedRecord,
    recency_ms: Option<i64>,
    tie_break: Option<&'a Scalar>,
}

impl<'a> Candidate<'a> {
    fn new(record: &'a MappedRecord, spec: RankSpec<'_>) -> Self {
        let recency_ms = record.get(spec.recency).and_then(recency_of);
        Self {
            record,
            recency_ms,
            tie_break: record.get(spec.tie_break).filter(|value| !value.is_null()),
        }
    }

    /// Strictly better than `current`; input order keeps the earlier record
    /// on a full tie.
    fn outranks(&self, current: &Candidate<'_>) -> bool {
        match self.recency_ms.cmp(&current.recency_ms) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                compare_tie_break(self.tie_break, current.tie_break) == Ordering::Less
            }
        }
    }
}

fn recency_of(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Null => None,
        Scalar::Int(epoch) => parse_timestamp_to_unix_ms(&epoch.to_string()).ok(),
        Scalar::Float(epoch) => parse_timestamp_to_unix_ms(&(*epoch as i64).to_string()).ok(),
        Scalar::Text(text) => parse_timestamp_to_unix_ms(text).ok(),
    }
}

/// Present values sort before absent ones.
fn compare_tie_break(left: Option<&Scalar>, right: Option<&Scalar>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.to_string().cmp(&right.to_string()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
