//! Explicit conversion of SQLite's dynamic values.
//!
//! The source tables have no column affinities: the log parser writes ids
//! as text, coordinates as reals, and timestamps as ISO strings, but any
//! column may hold any storage class. Readers convert by column name and
//! report the offending column when a value does not fit.

use rusqlite::types::ValueRef;
use rusqlite::Row;

use crate::{DbError, Result};

/// Read an integer column. Accepts integers, integral reals, and
/// decimal text.
pub fn integer(row: &Row<'_>, column: &str) -> Result<i64> {
    match row.get_ref(column)? {
        ValueRef::Integer(i) => Ok(i),
        // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
        ValueRef::Real(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        ValueRef::Text(bytes) => {
            let text = utf8(column, bytes)?;
            text.trim()
                .parse()
                .map_err(|_| conversion(column, "integer", format!("text '{text}'")))
        }
        other => Err(conversion(column, "integer", describe(other))),
    }
}

/// Read a floating-point column. Accepts reals, integers, and numeric text.
pub fn real(row: &Row<'_>, column: &str) -> Result<f64> {
    match row.get_ref(column)? {
        ValueRef::Real(f) => Ok(f),
        ValueRef::Integer(i) => Ok(i as f64),
        ValueRef::Text(bytes) => {
            let text = utf8(column, bytes)?;
            text.trim()
                .parse()
                .map_err(|_| conversion(column, "real", format!("text '{text}'")))
        }
        other => Err(conversion(column, "real", describe(other))),
    }
}

/// Read a text column; `NULL` becomes `None`, numbers are rendered.
pub fn text(row: &Row<'_>, column: &str) -> Result<Option<String>> {
    match row.get_ref(column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => utf8(column, bytes).map(|s| Some(s.to_string())),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Blob(_) => Err(conversion(column, "text", "blob".to_string())),
    }
}

/// Like [`text`], but a column absent from the result set reads as `None`.
pub fn optional_text(row: &Row<'_>, column: &str) -> Result<Option<String>> {
    if has_column(row, column) {
        text(row, column)
    } else {
        Ok(None)
    }
}

/// Whether the statement behind `row` returns a column with this name.
pub fn has_column(row: &Row<'_>, column: &str) -> bool {
    row.as_ref().column_index(column).is_ok()
}

fn utf8<'a>(column: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| conversion(column, "UTF-8 text", "invalid bytes".into()))
}

fn conversion(column: &str, expected: &'static str, found: String) -> DbError {
    DbError::Conversion {
        column: column.to_string(),
        expected,
        found,
    }
}

fn describe(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => format!("integer {i}"),
        ValueRef::Real(f) => format!("real {f}"),
        ValueRef::Text(t) => format!("text '{}'", String::from_utf8_lossy(t)),
        ValueRef::Blob(b) => format!("blob of {} bytes", b.len()),
    }
}
