//! # slicerstats-db
//!
//! Read access to the download-statistics SQLite database produced by the
//! log parser.
//!
//! ## Source tables
//!
//! - `access`: one row per logged download (`bitstream_id, ip, ts, useragent`)
//! - `uainfo`: user-agent classification
//! - `ipinfo`: IP geolocation (country and coordinates)
//! - `bsinfo`: build metadata for each bitstream
//!
//! The tables are created without column affinities, so every reader in
//! [`queries`] converts SQLite's dynamic values explicitly (see [`value`]).

pub mod queries;
pub mod schema;
pub mod value;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("column '{column}': expected {expected}, found {found}")]
    Conversion {
        column: String,
        expected: &'static str,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open an existing database for reading only.
///
/// This is what the extraction uses: the source is never written.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure(&conn)?;
    conn.pragma_update(None, "query_only", true)?;
    Ok(conn)
}

/// Open or create a database at the given path, creating any missing
/// source tables.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    schema::create(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the source tables (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    schema::create(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 5000;
         PRAGMA cache_size = -8000;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_creates_tables() {
        let conn = open_memory().expect("open in-memory db");
        for table in ["access", "uainfo", "ipinfo", "bsinfo"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .expect("query sqlite_master");
            assert_eq!(count, 1, "Table '{table}' should exist");
        }
    }

    #[test]
    fn test_reopen_keeps_existing_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.db");
        {
            let conn = open(&path).expect("create");
            conn.execute("INSERT INTO uainfo (useragent, browser_type) VALUES ('ua', 'Browser')", [])
                .expect("insert");
        }

        let conn = open(&path).expect("reopen");
        schema::create(&conn).expect("create again");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM uainfo", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.db");
        drop(open(&path).expect("create"));

        let conn = open_read_only(&path).expect("open read-only");
        let result = conn.execute("DELETE FROM access", []);
        assert!(result.is_err(), "read-only connection must refuse writes");
    }
}
