pub mod raw;
pub mod record;

pub use raw::{Cell, ColumnDescriptor, ColumnId, PositionalRow, SheetData, SheetRow};
pub use record::{MappedRecord, RecordSet, Scalar};
