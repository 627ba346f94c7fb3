//! Build metadata table.

use rusqlite::{Connection, Row};

use crate::{value, DbError, Result};

/// All bitstreams, by id. Columns are read by name.
pub const BITSTREAMS_SQL: &str = "SELECT * FROM bsinfo ORDER BY bitstream_id";

/// A row of `bsinfo`, reduced to the columns the extraction reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitstreamRow {
    pub bitstream_id: i64,
    pub filename: String,
    pub os: String,
    pub arch: String,
    /// `NULL` is kept distinct from the empty string.
    pub release: Option<String>,
    pub checkout_date: Option<String>,
    pub date_creation: Option<String>,
}

impl BitstreamRow {
    fn read(row: &Row<'_>) -> Result<Self> {
        // Older parser versions named the creation column `creation_date`.
        let date_creation = if value::has_column(row, "date_creation") {
            value::text(row, "date_creation")?
        } else {
            value::optional_text(row, "creation_date")?
        };
        Ok(Self {
            bitstream_id: value::integer(row, "bitstream_id")?,
            filename: value::text(row, "filename")?.unwrap_or_default(),
            os: value::text(row, "os")?.unwrap_or_default(),
            arch: value::text(row, "arch")?.unwrap_or_default(),
            release: value::optional_text(row, "release")?,
            checkout_date: value::optional_text(row, "checkout_date")?,
            date_creation,
        })
    }
}

/// Stream every bitstream ordered by id. Returns the row count.
pub fn each<E, F>(conn: &Connection, mut f: F) -> std::result::Result<usize, E>
where
    E: From<DbError>,
    F: FnMut(BitstreamRow) -> std::result::Result<(), E>,
{
    let mut stmt = conn.prepare(BITSTREAMS_SQL).map_err(DbError::from)?;
    let mut rows = stmt.query([]).map_err(DbError::from)?;
    let mut count = 0;
    while let Some(row) = rows.next().map_err(DbError::from)? {
        f(BitstreamRow::read(row)?)?;
        count += 1;
    }
    tracing::debug!("Read {count} bitstreams");
    Ok(count)
}

/// Collect all bitstreams.
pub fn list(conn: &Connection) -> Result<Vec<BitstreamRow>> {
    let mut out = Vec::new();
    each(conn, |row| {
        out.push(row);
        Ok::<_, DbError>(())
    })?;
    Ok(out)
}

/// Insert a bitstream.
pub fn insert(conn: &Connection, row: &BitstreamRow) -> Result<()> {
    conn.execute(
        "INSERT INTO bsinfo
         (bitstream_id, filename, os, arch, release, date_creation, checkout_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            row.bitstream_id,
            row.filename,
            row.os,
            row.arch,
            row.release,
            row.date_creation,
            row.checkout_date,
        ],
    )?;
    Ok(())
}
