//! Access log joined with build metadata, geolocation and user agents.

use rusqlite::{Connection, Row};

use crate::{value, DbError, Result};

/// One row per (ip, bitstream) for the given browser type, oldest first.
///
/// `?1` is the `uainfo.browser_type` to keep.
pub const ACCESS_SQL: &str = "SELECT bsinfo.bitstream_id AS bitstream_id, ipinfo.country_code AS country_code,
        ipinfo.latitude AS latitude, ipinfo.longitude AS longitude, access.ts AS ts
 FROM access
 JOIN bsinfo ON access.bitstream_id = bsinfo.bitstream_id
 JOIN ipinfo ON access.ip = ipinfo.ip
 JOIN uainfo ON access.useragent = uainfo.useragent
 WHERE uainfo.browser_type = ?1
 GROUP BY access.ip, bsinfo.bitstream_id
 ORDER BY access.ts";

/// A joined access row.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRow {
    pub bitstream_id: i64,
    /// `NULL` codes read as the empty string.
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Timestamp as stored by the log parser (ISO 8601).
    pub ts: String,
}

impl AccessRow {
    fn read(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            bitstream_id: value::integer(row, "bitstream_id")?,
            country_code: value::text(row, "country_code")?.unwrap_or_default(),
            latitude: value::real(row, "latitude")?,
            longitude: value::real(row, "longitude")?,
            ts: value::text(row, "ts")?.unwrap_or_default(),
        })
    }
}

/// Stream joined access rows in timestamp order. Returns the row count.
pub fn each<E, F>(conn: &Connection, browser_type: &str, mut f: F) -> std::result::Result<usize, E>
where
    E: From<DbError>,
    F: FnMut(AccessRow) -> std::result::Result<(), E>,
{
    let mut stmt = conn.prepare(ACCESS_SQL).map_err(DbError::from)?;
    let mut rows = stmt.query([browser_type]).map_err(DbError::from)?;
    let mut count = 0;
    while let Some(row) = rows.next().map_err(DbError::from)? {
        f(AccessRow::read(row)?)?;
        count += 1;
    }
    tracing::debug!("Read {count} access rows");
    Ok(count)
}

/// Collect all joined access rows.
pub fn list(conn: &Connection, browser_type: &str) -> Result<Vec<AccessRow>> {
    let mut out = Vec::new();
    each(conn, browser_type, |row| {
        out.push(row);
        Ok::<_, DbError>(())
    })?;
    Ok(out)
}

/// Record a download.
pub fn insert(conn: &Connection, bitstream_id: i64, ip: &str, ts: &str, useragent: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO access (bitstream_id, ip, ts, useragent) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![bitstream_id, ip, ts, useragent],
    )?;
    Ok(())
}

/// Classify a user agent.
pub fn insert_useragent(conn: &Connection, useragent: &str, browser_type: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO uainfo (useragent, browser_type) VALUES (?1, ?2)",
        rusqlite::params![useragent, browser_type],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{bsinfo, ipinfo};

    const FIREFOX: &str = "Mozilla/5.0 Firefox/40.0";
    const CURL: &str = "curl/7.35.0";

    fn test_db() -> Connection {
        let conn = crate::open_memory().expect("open test db");
        bsinfo::insert(
            &conn,
            &bsinfo::BitstreamRow {
                bitstream_id: 1,
                filename: "Slicer-4.4.0-win-amd64.exe".into(),
                os: "win".into(),
                arch: "amd64".into(),
                ..Default::default()
            },
        )
        .expect("bitstream");
        ipinfo::insert(&conn, "1.1.1.1", Some("AU"), Some("Australia"), -33.86, 151.2)
            .expect("ip");
        ipinfo::insert(&conn, "2.2.2.2", Some("FR"), Some("France"), 48.85, 2.35).expect("ip");
        insert_useragent(&conn, FIREFOX, "Browser").expect("ua");
        insert_useragent(&conn, CURL, "Library").expect("ua");
        conn
    }

    #[test]
    fn test_ordered_by_timestamp() {
        let conn = test_db();
        insert(&conn, 1, "2.2.2.2", "2015-03-02T10:00:00+00:00", FIREFOX).expect("access");
        insert(&conn, 1, "1.1.1.1", "2015-03-01T10:00:00+00:00", FIREFOX).expect("access");

        let rows = list(&conn, "Browser").expect("list");
        let codes: Vec<&str> = rows.iter().map(|r| r.country_code.as_str()).collect();
        assert_eq!(codes, ["AU", "FR"]);
        assert_eq!(rows[0].latitude, -33.86);
    }

    #[test]
    fn test_browser_filter() {
        let conn = test_db();
        insert(&conn, 1, "1.1.1.1", "2015-03-01T10:00:00+00:00", CURL).expect("access");
        assert!(list(&conn, "Browser").expect("list").is_empty());
        assert_eq!(list(&conn, "Library").expect("list").len(), 1);
    }

    #[test]
    fn test_grouped_per_ip_and_bitstream() {
        let conn = test_db();
        insert(&conn, 1, "1.1.1.1", "2015-03-01T10:00:00+00:00", FIREFOX).expect("access");
        insert(&conn, 1, "1.1.1.1", "2015-03-01T11:00:00+00:00", FIREFOX).expect("access");
        assert_eq!(list(&conn, "Browser").expect("list").len(), 1);
    }

    #[test]
    fn test_unknown_ip_is_dropped_by_join() {
        let conn = test_db();
        insert(&conn, 1, "9.9.9.9", "2015-03-01T10:00:00+00:00", FIREFOX).expect("access");
        assert!(list(&conn, "Browser").expect("list").is_empty());
    }
}
