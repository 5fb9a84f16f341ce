use std::fmt;

use serde::{Deserialize, Deserializer};

use super::record::Scalar;

/// Source-specific column key. Smartsheet sends numeric ids; the value is
/// only ever compared, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnId(String);

impl ColumnId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<u64> for ColumnId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ColumnId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(id) => Self(id.to_string()),
            RawId::Signed(id) => Self(id.to_string()),
            RawId::Text(id) => Self(id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_id: ColumnId,
    #[serde(default)]
    pub value: Scalar,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SheetRow {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A materialized sheet: column descriptors plus cell-keyed rows.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SheetData {
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub rows: Vec<SheetRow>,
}

impl SheetData {
    /// Exact, case-sensitive title lookup.
    #[must_use]
    pub fn column_id(&self, title: &str) -> Option<&ColumnId> {
        self.columns
            .iter()
            .find(|column| column.title == title)
            .map(|column| &column.id)
    }
}

/// A database row whose meaning is fixed by the issuing query's column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionalRow(pub Vec<Scalar>);

impl PositionalRow {
    /// Value at `index`; past-the-end reads as null.
    #[must_use]
    pub fn get(&self, index: usize) -> &Scalar {
        const NULL: &Scalar = &Scalar::Null;
        self.0.get(index).unwrap_or(NULL)
    }
}

impl<T: Into<Scalar>> FromIterator<T> for PositionalRow {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
