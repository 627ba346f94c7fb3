//! # slicerstats-etl
//!
//! Builds the download-statistics document from the source database.
//!
//! Three independent scans each fold their row stream into one table:
//!
//! - [`country_codes`]: distinct countries, resolved against a [`CountryIndex`]
//! - [`bitstreams`]: build metadata keyed by bitstream id
//! - [`access`]: the access log plus its deduplicated location table
//!
//! [`assemble`] runs the scans concurrently and merges the results into an
//! [`OutputDocument`](slicerstats_types::OutputDocument).

pub mod access;
pub mod assemble;
pub mod bitstreams;
pub mod countries;
pub mod country_codes;
pub mod source;

use std::path::PathBuf;

use slicerstats_db::DbError;

pub use assemble::{extract, run, write_document, ExtractOptions};
pub use countries::CountryIndex;
pub use source::{SharedConnection, Source};

/// Extraction error types.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("bitstream {bitstream_id}: unparseable access timestamp '{value}'")]
    Timestamp { bitstream_id: i64, value: String },

    #[error("failed to read country reference {path}: {source}")]
    ReferenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed country reference: {0}")]
    ReferenceFormat(#[source] serde_json::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table builder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EtlError>;
