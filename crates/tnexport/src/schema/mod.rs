//! Declarative field policies consumed by the row mapper.
//!
//! Each export is described by a table of [`FieldPolicy`] entries: where the
//! raw value comes from, whether the row is dropped without it, what it
//! defaults to, and how it is coerced. The mapper applies every table the
//! same way, so the per-export differences live here and nowhere else.

pub mod tables;

use crate::models::Scalar;

pub use tables::{
    CONTACT_ACTIVITY, DB_LAND_USE, DB_TREATMENT_METHOD, PROJECT, PROJECT_ENTITY, SHEET_LAND_USE,
    SHEET_TREATMENT_METHOD,
};

/// Where a field's raw value is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    /// Sheet column, matched by exact title.
    Title(&'static str),
    /// Zero-based position in a query result row.
    Position(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    AsIs,
    Text,
    Float,
    Integer,
}

impl Coercion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AsIs => "as_is",
            Self::Text => "text",
            Self::Float => "float",
            Self::Integer => "integer",
        }
    }
}

/// The value substituted when an optional field is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Float(f64),
    Text(&'static str),
}

impl DefaultValue {
    #[must_use]
    pub fn to_scalar(self) -> Scalar {
        match self {
            Self::Null => Scalar::Null,
            Self::Float(value) => Scalar::Float(value),
            Self::Text(text) => Scalar::text(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPolicy {
    pub field: &'static str,
    pub column: ColumnRef,
    pub required: bool,
    pub default: DefaultValue,
    pub coercion: Coercion,
}

impl FieldPolicy {
    /// A field that drops its row when missing.
    #[must_use]
    pub const fn required(field: &'static str, column: ColumnRef, coercion: Coercion) -> Self {
        Self {
            field,
            column,
            required: true,
            default: DefaultValue::Null,
            coercion,
        }
    }

    /// A field that falls back to `default` when missing.
    #[must_use]
    pub const fn optional(
        field: &'static str,
        column: ColumnRef,
        default: DefaultValue,
        coercion: Coercion,
    ) -> Self {
        Self {
            field,
            column,
            required: false,
            default,
            coercion,
        }
    }

    /// Null is always missing. A required text field also treats the empty
    /// string as missing; whitespace and every other value are kept.
    #[must_use]
    pub fn is_missing(&self, value: &Scalar) -> bool {
        value.is_null()
            || (self.required && self.coercion == Coercion::Text && value.is_empty_text())
    }
}

/// A named policy table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldPolicy],
}

impl Schema {
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|policy| policy.field)
    }
}
