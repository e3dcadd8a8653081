//! Column codecs shared by the repositories: the stored timestamp format and
//! typed reads out of a positional `libsql::Row`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::de::value::StrDeserializer;

use crate::error::DatabaseError;

/// Format a timestamp for storage.
///
/// Fixed millisecond precision with a `Z` suffix keeps lexicographic order
/// equal to chronological order, which the `ORDER BY` and window queries rely
/// on.
#[must_use]
pub fn fmt_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, truncated to the stored precision.
#[must_use]
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    parse_datetime(&fmt_datetime(now)).unwrap_or(now)
}

/// Legacy rows written by `datetime('now')` lack the `T` and the offset.
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp column to `DateTime<Utc>`. Accepts the stored RFC 3339 form and
/// `SQLite`'s `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// `DatabaseError::Query` when neither form matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, SQLITE_DATETIME).map(|n| n.and_utc()))
        .map_err(|e| DatabaseError::Query(format!("bad timestamp {s:?}: {e}")))
}

/// Nullable timestamp column; NULL and `""` are both `None`.
///
/// # Errors
///
/// `DatabaseError::Query` for a non-empty value that does not parse.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    s.filter(|v| !v.is_empty()).map(parse_datetime).transpose()
}

/// Enum column stored as its serde name (`"high"`, `"farmer"`, ...).
///
/// # Errors
///
/// `DatabaseError::Query` for an unknown name.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    T::deserialize(StrDeserializer::<serde::de::value::Error>::new(s))
        .map_err(|e| DatabaseError::Query(format!("bad enum value {s:?}: {e}")))
}

/// Nullable TEXT column; `""` reads as `None` like NULL does.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?.filter(|s| !s.is_empty()))
}

/// INTEGER 0/1 flag column.
///
/// # Errors
///
/// Propagates the column read error.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// `COUNT(*)` result as `u64`.
///
/// # Errors
///
/// Propagates the column read error; a negative value is a `Query` error.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let n = row.get::<i64>(idx)?;
    u64::try_from(n).map_err(|_| DatabaseError::Query(format!("negative count: {n}")))
}
