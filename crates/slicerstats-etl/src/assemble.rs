//! Concurrent extraction and document output.

use std::path::Path;
use std::sync::Arc;

use slicerstats_types::{OutputDocument, DEFAULT_BROWSER_TYPE};
use tokio::task::JoinHandle;
use tracing::info;

use crate::{access, bitstreams, country_codes, CountryIndex, EtlError, Result, Source};

/// Knobs for the extraction queries.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// `uainfo.browser_type` kept by the access scan.
    pub browser_type: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            browser_type: DEFAULT_BROWSER_TYPE.to_string(),
        }
    }
}

/// Run the three table scans concurrently and merge their results.
///
/// The first failing scan fails the whole extraction. Scans still running
/// at that point finish on their blocking threads and are discarded.
pub async fn extract(
    source: Source,
    countries: Arc<CountryIndex>,
    options: &ExtractOptions,
) -> Result<OutputDocument> {
    let country_task = {
        let source = source.clone();
        tokio::task::spawn_blocking(move || {
            source.with_connection(|conn| country_codes::build(conn, &countries))
        })
    };
    let bitstream_task = {
        let source = source.clone();
        tokio::task::spawn_blocking(move || source.with_connection(bitstreams::build))
    };
    let access_task = {
        let browser_type = options.browser_type.clone();
        tokio::task::spawn_blocking(move || {
            source.with_connection(|conn| access::build(conn, &browser_type))
        })
    };

    let (country_code, bitstream, access_log) = tokio::try_join!(
        joined(country_task),
        joined(bitstream_task),
        joined(access_task)
    )?;

    Ok(OutputDocument::new(
        country_code,
        bitstream,
        access_log.access,
        access_log.location,
    ))
}

async fn joined<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    handle.await?
}

/// Serialize a document as a single JSON value.
pub fn render(document: &OutputDocument, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(document)
    } else {
        serde_json::to_vec(document)
    };
    bytes.map_err(EtlError::Serialize)
}

/// Overwrite `path` with the serialized document in one write.
pub async fn write_document(document: &OutputDocument, path: &Path, pretty: bool) -> Result<()> {
    let bytes = render(document, pretty)?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|source| EtlError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Extract and write. Nothing is written if extraction fails.
pub async fn run(
    source: Source,
    countries: Arc<CountryIndex>,
    options: &ExtractOptions,
    output: &Path,
    pretty: bool,
) -> Result<OutputDocument> {
    let document = extract(source, countries, options).await?;
    info!(
        "Document assembled: {} countries, {} bitstreams, {} accesses, {} locations",
        document.country_code.len(),
        document.bitstream.len(),
        document.access.len(),
        document.location.len()
    );
    write_document(&document, output, pretty).await?;
    Ok(document)
}
