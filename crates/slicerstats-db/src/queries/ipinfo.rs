//! Geolocation table: distinct countries.

use rusqlite::{Connection, Row};

use crate::{value, DbError, Result};

/// Every distinct country seen in the geolocation table.
pub const DISTINCT_COUNTRIES_SQL: &str =
    "SELECT DISTINCT country_code, country_name FROM ipinfo ORDER BY country_code";

/// A distinct (code, name) pair from `ipinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCodeRow {
    /// `NULL` codes read as the empty string.
    pub country_code: String,
    /// `NULL` names read as the empty string.
    pub country_name: String,
    /// Value of a `countryCode` column, if the result set carries one.
    /// [`DISTINCT_COUNTRIES_SQL`] never selects it, so this is always
    /// `None` for rows produced by [`each`].
    pub country_code_alias: Option<String>,
}

impl CountryCodeRow {
    fn read(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            country_code: value::text(row, "country_code")?.unwrap_or_default(),
            country_name: value::text(row, "country_name")?.unwrap_or_default(),
            country_code_alias: value::optional_text(row, "countryCode")?,
        })
    }
}

/// Stream distinct countries ordered by code. Returns the row count.
pub fn each<E, F>(conn: &Connection, mut f: F) -> std::result::Result<usize, E>
where
    E: From<DbError>,
    F: FnMut(CountryCodeRow) -> std::result::Result<(), E>,
{
    let mut stmt = conn.prepare(DISTINCT_COUNTRIES_SQL).map_err(DbError::from)?;
    let mut rows = stmt.query([]).map_err(DbError::from)?;
    let mut count = 0;
    while let Some(row) = rows.next().map_err(DbError::from)? {
        f(CountryCodeRow::read(row)?)?;
        count += 1;
    }
    tracing::debug!("Read {count} distinct countries");
    Ok(count)
}

/// Collect all distinct countries.
pub fn list(conn: &Connection) -> Result<Vec<CountryCodeRow>> {
    let mut out = Vec::new();
    each(conn, |row| {
        out.push(row);
        Ok::<_, DbError>(())
    })?;
    Ok(out)
}

/// Insert a geolocation record for an IP address.
pub fn insert(
    conn: &Connection,
    ip: &str,
    country_code: Option<&str>,
    country_name: Option<&str>,
    latitude: f64,
    longitude: f64,
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO ipinfo
         (ip, country_code, country_code3, country_name, latitude, longitude)
         VALUES (?1, ?2, ?2, ?3, ?4, ?5)",
        rusqlite::params![ip, country_code, country_name, latitude, longitude],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_distinct_and_ordered() {
        let conn = test_db();
        insert(&conn, "10.0.0.1", Some("US"), Some("United States"), 40.0, -74.0)
            .expect("insert");
        insert(&conn, "10.0.0.2", Some("DE"), Some("Germany"), 52.5, 13.4).expect("insert");
        insert(&conn, "10.0.0.3", Some("US"), Some("United States"), 34.0, -118.2)
            .expect("insert");

        let rows = list(&conn).expect("list");
        let codes: Vec<&str> = rows.iter().map(|r| r.country_code.as_str()).collect();
        assert_eq!(codes, ["DE", "US"]);
        assert!(rows.iter().all(|r| r.country_code_alias.is_none()));
    }

    #[test]
    fn test_null_code_reads_empty() {
        let conn = test_db();
        insert(&conn, "10.0.0.9", None, None, 0.0, 0.0).expect("insert");
        let rows = list(&conn).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_code, "");
        assert_eq!(rows[0].country_name, "");
    }

    #[test]
    fn test_callback_error_stops_scan() {
        let conn = test_db();
        insert(&conn, "10.0.0.1", Some("AA"), Some("A"), 0.0, 0.0).expect("insert");
        insert(&conn, "10.0.0.2", Some("BB"), Some("B"), 0.0, 0.0).expect("insert");

        let mut seen = 0;
        let result = each(&conn, |_| {
            seen += 1;
            Err(DbError::Conversion {
                column: "country_code".into(),
                expected: "text",
                found: "test".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }
}
