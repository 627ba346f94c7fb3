//! Where the table builders get their connection from.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::Result;

/// A connection shared between builders. Scans take turns on it.
pub type SharedConnection = Arc<tokio::sync::Mutex<Connection>>;

/// Database handle for the extraction.
#[derive(Debug, Clone)]
pub enum Source {
    /// Each scan opens its own read-only connection, so scans run in
    /// parallel.
    File(PathBuf),
    /// All scans go through one connection, one at a time.
    Shared(SharedConnection),
}

impl Source {
    pub fn shared(conn: Connection) -> Self {
        Source::Shared(Arc::new(tokio::sync::Mutex::new(conn)))
    }

    /// Run `f` against a connection from this source.
    ///
    /// Blocks the calling thread; call from a blocking task.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match self {
            Source::File(path) => {
                let conn = slicerstats_db::open_read_only(path)?;
                f(&conn)
            }
            Source::Shared(conn) => {
                let guard = conn.blocking_lock();
                f(&guard)
            }
        }
    }
}
