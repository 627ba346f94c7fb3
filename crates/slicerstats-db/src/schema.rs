//! Source table definitions.
//!
//! These mirror the tables written by the log parser. Columns carry no
//! type affinity there, so values may arrive as text or numbers.

use rusqlite::Connection;

use crate::Result;

/// The four source tables, without type affinities.
pub const SOURCE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS access (bitstream_id, ip, ts, useragent);

CREATE UNIQUE INDEX IF NOT EXISTS access_unique_idx
    ON access(bitstream_id, ip, ts);

CREATE TABLE IF NOT EXISTS uainfo (
    useragent PRIMARY KEY, browser_type, ua_name, os_name, os_family
);

CREATE TABLE IF NOT EXISTS ipinfo (
    ip PRIMARY KEY, country_code, country_code3, country_name,
    region_name, city, latitude, longitude
);

CREATE TABLE IF NOT EXISTS bsinfo (
    bitstream_id PRIMARY KEY, filename, os, arch,
    product_name, codebase, release, revision, date_creation, checkout_date, size
);
"#;

/// Create any missing source tables.
pub fn create(conn: &Connection) -> Result<()> {
    tracing::debug!("Ensuring source tables exist");
    conn.execute_batch(SOURCE_SCHEMA)?;
    Ok(())
}
