//! Access log with a deduplicated location table.
//!
//! Coordinates are compared only after formatting to six decimals, so two
//! readings that round to the same string share one location index.
//! Indices are handed out in order of first appearance.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::Connection;
use slicerstats_db::queries::access::{self, AccessRow};
use slicerstats_types::AccessEvent;
use tracing::info;

use crate::{EtlError, Result};

/// `"lat,lng"` with six decimals each.
pub fn format_location(latitude: f64, longitude: f64) -> String {
    format!("{:.6},{:.6}", positive_zero(latitude), positive_zero(longitude))
}

/// Maps `-0.0` to `0.0` so both print as `0.000000`.
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Normalize a stored access timestamp to UTC minute precision
/// (`YYYY-MM-DDTHH:MM`).
///
/// Timestamps with an offset are shifted to UTC; naive timestamps and bare
/// dates are taken as UTC already.
pub fn minute_timestamp(ts: &str) -> Option<String> {
    let ts = ts.trim();
    let utc = if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        dt.with_timezone(&Utc).naive_utc()
    } else if let Ok(dt) = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f%z") {
        dt.with_timezone(&Utc).naive_utc()
    } else {
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(ts, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?
    };
    Some(utc.format("%Y-%m-%dT%H:%M").to_string())
}

/// Append-only table of formatted coordinates.
#[derive(Debug, Default)]
pub struct LocationTable {
    lookup: HashMap<String, usize>,
    locations: Vec<String>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the formatted coordinate pair, appending it when unseen.
    pub fn intern(&mut self, latitude: f64, longitude: f64) -> usize {
        let key = format_location(latitude, longitude);
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.locations.len();
        self.locations.push(key.clone());
        self.lookup.insert(key, index);
        index
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.locations
    }
}

/// Result of the access scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccessLog {
    /// Events in row order.
    pub access: Vec<AccessEvent>,
    /// Locations referenced by `AccessEvent::location_index`.
    pub location: Vec<String>,
}

/// Fold over joined access rows.
#[derive(Debug, Default)]
pub struct AccessLogBuilder {
    access: Vec<AccessEvent>,
    locations: LocationTable,
}

impl AccessLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: AccessRow) -> Result<()> {
        let timestamp = minute_timestamp(&row.ts).ok_or_else(|| EtlError::Timestamp {
            bitstream_id: row.bitstream_id,
            value: row.ts.clone(),
        })?;
        let location_index = self.locations.intern(row.latitude, row.longitude);
        self.access.push(AccessEvent {
            bitstream_id: row.bitstream_id,
            timestamp,
            country_code: row.country_code,
            location_index,
        });
        Ok(())
    }

    pub fn finish(self) -> AccessLog {
        AccessLog {
            access: self.access,
            location: self.locations.into_vec(),
        }
    }
}

/// Scan the access log for one browser type.
pub fn build(conn: &Connection, browser_type: &str) -> Result<AccessLog> {
    let mut builder = AccessLogBuilder::new();
    access::each(conn, browser_type, |row| builder.push(row))?;
    let log = builder.finish();
    info!(
        "Access log built: {} events at {} distinct locations",
        log.access.len(),
        log.location.len()
    );
    Ok(log)
}
