use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ColumnId, MappedRecord, PositionalRow, RecordSet, Scalar, SheetData};
use crate::schema::{Coercion, ColumnRef, FieldPolicy, Schema};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error(
        "{schema}: row {row} field `{field}` cannot be coerced to {coercion}: {value:?}"
    )]
    Coercion {
        schema: &'static str,
        row: usize,
        field: &'static str,
        coercion: &'static str,
        value: String,
    },
    #[error("{schema}: field `{field}` references {column:?}, which this source cannot address")]
    UnaddressableColumn {
        schema: &'static str,
        field: &'static str,
        column: ColumnRef,
    },
}

/// Maps cell-keyed sheet rows.
///
/// Required titles are resolved to column ids first; when one is absent the
/// whole sheet maps to an empty set. Rows missing a required value are
/// dropped. Numeric coercion failures are fatal.
pub fn map_sheet(sheet: &SheetData, schema: &Schema) -> Result<RecordSet, MapError> {
    let mut column_ids = Vec::with_capacity(schema.fields.len());
    for policy in schema.fields {
        let ColumnRef::Title(title) = policy.column else {
            return Err(unaddressable(schema, policy));
        };
        let column_id = sheet.column_id(title);
        if column_id.is_none() && policy.required {
            warn!(
                schema = schema.name,
                column = title,
                "required column missing from sheet; no records mapped"
            );
            return Ok(RecordSet::new(schema.field_names()));
        }
        column_ids.push(column_id);
    }

    let mut records = RecordSet::new(schema.field_names());
    let mut dropped = 0_usize;
    for (index, row) in sheet.rows.iter().enumerate() {
        let mut slots = vec![Scalar::Null; schema.fields.len()];
        for cell in &row.cells {
            if let Some(slot) = slot_for(&column_ids, &cell.column_id) {
                slots[slot] = cell.value.clone();
            }
        }

        match build_record(schema, index + 1, slots)? {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(
        schema = schema.name,
        rows = sheet.rows.len(),
        emitted = records.len(),
        dropped,
        "mapped sheet rows"
    );
    Ok(records)
}

/// Maps positional query rows. Database schemas carry defaults rather than
/// required fields, so every input row yields a record.
pub fn map_positional(rows: &[PositionalRow], schema: &Schema) -> Result<RecordSet, MapError> {
    let mut positions = Vec::with_capacity(schema.fields.len());
    for policy in schema.fields {
        let ColumnRef::Position(position) = policy.column else {
            return Err(unaddressable(schema, policy));
        };
        positions.push(position);
    }

    let mut records = RecordSet::new(schema.field_names());
    for (index, row) in rows.iter().enumerate() {
        let slots = positions
            .iter()
            .map(|position| row.get(*position).clone())
            .collect();
        if let Some(record) = build_record(schema, index + 1, slots)? {
            records.push(record);
        }
    }

    debug!(
        schema = schema.name,
        rows = rows.len(),
        emitted = records.len(),
        "mapped positional rows"
    );
    Ok(records)
}

fn slot_for(column_ids: &[Option<&ColumnId>], cell_column: &ColumnId) -> Option<usize> {
    column_ids
        .iter()
        .position(|column_id| *column_id == Some(cell_column))
}

/// `None` means the row is dropped.
fn build_record(
    schema: &Schema,
    row: usize,
    slots: Vec<Scalar>,
) -> Result<Option<MappedRecord>, MapError> {
    let mut record = MappedRecord::with_capacity(schema.fields.len());
    for (policy, raw) in schema.fields.iter().zip(slots) {
        let value = if policy.is_missing(&raw) {
            if policy.required {
                return Ok(None);
            }
            policy.default.to_scalar()
        } else {
            coerce(raw, policy.coercion).map_err(|value| MapError::Coercion {
                schema: schema.name,
                row,
                field: policy.field,
                coercion: policy.coercion.as_str(),
                value: value.to_string(),
            })?
        };
        record.insert(policy.field, value);
    }
    Ok(Some(record))
}

/// Coerces a present value. On failure the original value is handed back.
pub fn coerce(value: Scalar, coercion: Coercion) -> Result<Scalar, Scalar> {
    match (coercion, value) {
        (Coercion::AsIs, value) => Ok(value),
        (Coercion::Text, Scalar::Null) => Ok(Scalar::Null),
        (Coercion::Text, value) => Ok(Scalar::Text(value.to_string())),
        (Coercion::Float, Scalar::Int(number)) => Ok(Scalar::Float(number as f64)),
        (Coercion::Float, Scalar::Float(number)) if number.is_finite() => Ok(Scalar::Float(number)),
        (Coercion::Float, Scalar::Text(text)) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Scalar::Float(number)),
            _ => Err(Scalar::Text(text)),
        },
        (Coercion::Integer, Scalar::Int(number)) => Ok(Scalar::Int(number)),
        (Coercion::Integer, Scalar::Float(number))
            if number.fract() == 0.0 && number.abs() < 9.0e15 =>
        {
            Ok(Scalar::Int(number as i64))
        }
        (Coercion::Integer, Scalar::Text(text)) => match text.trim().parse::<i64>() {
            Ok(number) => Ok(Scalar::Int(number)),
            Err(_) => Err(Scalar::Text(text)),
        },
        (_, other) => Err(other),
    }
}

fn unaddressable(schema: &Schema, policy: &FieldPolicy) -> MapError {
    MapError::UnaddressableColumn {
        schema: schema.name,
        field: policy.field,
        column: policy.column,
    }
}
