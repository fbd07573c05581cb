//! Column-value conversion helpers.
//!
//! Drivers hand back loosely typed values (`libsql::Value`, SQLite TEXT
//! timestamps). These helpers turn them into the types the checks consume.

use chrono::{DateTime, NaiveDateTime};

use crate::error::DatabaseError;

/// Parse a timestamp column.
///
/// Handles RFC 3339 (`"2026-02-09T14:30:00+00:00"`, converted to UTC wall
/// time) and SQLite's formats with or without fractional seconds
/// (`"2026-02-09 14:30:00"`, `"2026-02-09T14:30:00.250"`).
///
/// # Errors
///
/// Returns `DatabaseError::Decode` if the string matches no known format.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| DatabaseError::Decode(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a numeric column as `f64`. Integer columns widen.
///
/// # Errors
///
/// Returns `DatabaseError::Decode` for NULL, text, or blob values.
#[allow(clippy::cast_precision_loss)]
pub fn value_to_f64(value: &libsql::Value) -> Result<f64, DatabaseError> {
    match value {
        libsql::Value::Real(v) => Ok(*v),
        libsql::Value::Integer(v) => Ok(*v as f64),
        other => Err(DatabaseError::Decode(format!(
            "expected a number, got {other:?}"
        ))),
    }
}

/// Read a `COUNT(*)` column.
///
/// # Errors
///
/// Returns `DatabaseError::Decode` for non-integer or negative values.
pub fn value_to_count(value: &libsql::Value) -> Result<u64, DatabaseError> {
    match value {
        libsql::Value::Integer(v) => u64::try_from(*v)
            .map_err(|_| DatabaseError::Decode(format!("negative count {v}"))),
        other => Err(DatabaseError::Decode(format!(
            "expected a count, got {other:?}"
        ))),
    }
}

/// Read a nullable key column as text. Integer keys are rendered in decimal.
///
/// # Errors
///
/// Returns `DatabaseError::Decode` for real or blob values.
pub fn value_to_opt_string(value: &libsql::Value) -> Result<Option<String>, DatabaseError> {
    match value {
        libsql::Value::Null => Ok(None),
        libsql::Value::Text(s) => Ok(Some(s.clone())),
        libsql::Value::Integer(v) => Ok(Some(v.to_string())),
        other => Err(DatabaseError::Decode(format!(
            "expected a text key, got {other:?}"
        ))),
    }
}

/// Read a timestamp column stored as TEXT.
///
/// # Errors
///
/// Returns `DatabaseError::Decode` for NULL or unparseable values.
pub fn value_to_datetime(value: &libsql::Value) -> Result<NaiveDateTime, DatabaseError> {
    match value {
        libsql::Value::Text(s) => parse_datetime(s),
        other => Err(DatabaseError::Decode(format!(
            "expected a timestamp, got {other:?}"
        ))),
    }
}
