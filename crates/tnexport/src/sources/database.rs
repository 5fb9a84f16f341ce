use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row, Value};
use tracing::{debug, info};

use super::{QuerySource, SourceError};
use crate::config::DatabaseConfig;
use crate::models::{PositionalRow, Scalar};

/// A MySQL connection scoped to one command run. The connection is closed
/// when the value is dropped, whichever way the command exits.
pub struct MysqlSource {
    conn: Conn,
    target: String,
}

impl MysqlSource {
    pub fn connect(config: &DatabaseConfig) -> Result<Self, SourceError> {
        let target = config.target();
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()));

        let conn = Conn::new(opts).map_err(|error| SourceError::Connection {
            target: target.clone(),
            detail: error.to_string(),
        })?;
        info!(target = %target, "database connection opened");

        Ok(Self { conn, target })
    }
}

impl QuerySource for MysqlSource {
    fn query(&mut self, label: &str, sql: &str) -> Result<Vec<PositionalRow>, SourceError> {
        let rows: Vec<Row> = self.conn.query(sql).map_err(|error| SourceError::Query {
            label: label.to_string(),
            detail: error.to_string(),
        })?;
        debug!(query = label, rows = rows.len(), "query returned");

        Ok(rows.iter().map(positional_row).collect())
    }
}

impl Drop for MysqlSource {
    fn drop(&mut self) {
        debug!(target = %self.target, "database connection closed");
    }
}

fn positional_row(row: &Row) -> PositionalRow {
    (0..row.len())
        .map(|index| row.as_ref(index).map_or(Scalar::Null, scalar_from_value))
        .collect()
}

/// Text-protocol results arrive as bytes; the row mapper coerces them per field.
#[must_use]
pub fn scalar_from_value(value: &Value) -> Scalar {
    match value {
        Value::NULL => Scalar::Null,
        Value::Bytes(bytes) => Scalar::Text(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(number) => Scalar::Int(*number),
        Value::UInt(number) => {
            i64::try_from(*number).map_or_else(|_| Scalar::Text(number.to_string()), Scalar::Int)
        }
        Value::Float(number) => Scalar::Float(f64::from(*number)),
        Value::Double(number) => Scalar::Float(*number),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            Scalar::Text(format_date(*year, *month, *day, *hour, *minute, *second, *micros))
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let total_hours = u64::from(*days) * 24 + u64::from(*hours);
            let sign = if *negative { "-" } else { "" };
            let mut text = format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}");
            if *micros > 0 {
                text.push_str(&format!(".{micros:06}"));
            }
            Scalar::Text(text)
        }
    }
}

fn format_date(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8, micros: u32) -> String {
    if hour == 0 && minute == 0 && second == 0 && micros == 0 {
        return format!("{year:04}-{month:02}-{day:02}");
    }
    let mut text = format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}");
    if micros > 0 {
        text.push_str(&format!(".{micros:06}"));
    }
    text
}
