use anyhow::{Result, anyhow, bail};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const EPOCH_SECONDS_CUTOFF: i128 = 100_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Parses an activity timestamp into unix milliseconds.
///
/// Accepts what the database and exports produce: `YYYY-MM-DD HH:MM:SS`
/// with optional fractional seconds (read as UTC), a bare `YYYY-MM-DD`,
/// RFC 3339, and integer epoch seconds or milliseconds.
pub fn parse_timestamp_to_unix_ms(raw: &str) -> Result<i64> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        bail!("timestamp input is empty");
    }

    if let Ok(epoch_raw) = candidate.parse::<i128>() {
        return epoch_to_unix_ms(epoch_raw);
    }

    if let Ok(parsed) = OffsetDateTime::parse(candidate, &Rfc3339) {
        return to_unix_ms(parsed);
    }

    let datetime_with_fraction =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
    let datetime = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(candidate, datetime_with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(candidate, datetime))
    {
        return to_unix_ms(parsed.assume_utc());
    }

    if let Ok(parsed) = Date::parse(candidate, format_description!("[year]-[month]-[day]")) {
        return to_unix_ms(parsed.midnight().assume_utc());
    }

    bail!("unsupported timestamp format: {candidate}");
}

/// `YYYYMMDD_HHMMSS`, the stamp embedded in generated file names.
pub fn format_run_stamp(moment: OffsetDateTime) -> Result<String> {
    moment
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .map_err(|error| anyhow!("failed to format run stamp: {error}"))
}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
#[must_use]
pub fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn epoch_to_unix_ms(epoch_raw: i128) -> Result<i64> {
    let epoch_ms = if epoch_raw.abs() < EPOCH_SECONDS_CUTOFF {
        epoch_raw.checked_mul(1_000)
    } else {
        Some(epoch_raw)
    }
    .ok_or_else(|| anyhow!("epoch conversion overflow"))?;

    i64::try_from(epoch_ms).map_err(|_| anyhow!("timestamp exceeds supported millisecond range"))
}

fn to_unix_ms(parsed: OffsetDateTime) -> Result<i64> {
    let unix_ms = parsed.unix_timestamp_nanos() / NANOS_PER_MILLI;
    i64::try_from(unix_ms).map_err(|_| anyhow!("timestamp exceeds supported millisecond range"))
}
