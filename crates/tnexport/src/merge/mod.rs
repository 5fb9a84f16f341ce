use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{MappedRecord, RecordSet, Scalar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("join key `{key}` is missing from the {side} record set")]
    MissingKey { key: String, side: &'static str },
}

/// Normalized join key. Integral numbers and their text forms compare equal;
/// null never produces a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Int(i64),
    Text(String),
}

impl JoinKey {
    #[must_use]
    pub fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Null => None,
            Scalar::Int(number) => Some(Self::Int(*number)),
            Scalar::Float(number) if number.fract() == 0.0 && number.abs() < 9.0e15 => {
                Some(Self::Int(*number as i64))
            }
            Scalar::Float(number) => Some(Self::Text(number.to_string())),
            Scalar::Text(text) => {
                let trimmed = text.trim();
                Some(
                    trimmed
                        .parse::<i64>()
                        .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Int),
                )
            }
        }
    }
}

/// Left-joins `secondary` onto `primary` by `key`.
///
/// Output has exactly one record per primary record, in primary order. The
/// secondary set's non-key fields are appended (names the primary already
/// has are skipped) and null-filled where nothing matched. When several
/// secondary records share a key the first one wins; deduplication belongs
/// to the ranking stage.
pub fn left_merge(
    primary: &RecordSet,
    secondary: &RecordSet,
    key: &str,
) -> Result<RecordSet, MergeError> {
    if !primary.has_field(key) {
        return Err(MergeError::MissingKey {
            key: key.to_string(),
            side: "primary",
        });
    }
    if !secondary.has_field(key) {
        return Err(MergeError::MissingKey {
            key: key.to_string(),
            side: "secondary",
        });
    }

    let appended = secondary
        .fields()
        .iter()
        .filter(|field| field.as_str() != key && !primary.has_field(field))
        .cloned()
        .collect::<Vec<_>>();

    let mut index = HashMap::<JoinKey, &MappedRecord>::new();
    for record in secondary.records() {
        if let Some(join_key) = record.get(key).and_then(JoinKey::from_scalar) {
            index.entry(join_key).or_insert(record);
        }
    }

    let mut merged = RecordSet::new(primary.fields().iter().chain(appended.iter()).cloned());
    let mut matched = 0_usize;
    for record in primary.records() {
        let partner = record
            .get(key)
            .and_then(JoinKey::from_scalar)
            .and_then(|join_key| index.get(&join_key).copied());
        if partner.is_some() {
            matched += 1;
        }

        let mut combined = record.clone();
        for field in &appended {
            let value = partner
                .and_then(|found| found.get(field))
                .cloned()
                .unwrap_or(Scalar::Null);
            combined.insert(field.clone(), value);
        }
        merged.push(combined);
    }

    debug!(
        key,
        primary = primary.len(),
        secondary = secondary.len(),
        matched,
        "left merge complete"
    );
    Ok(merged)
}
