//! Bitstream table: build metadata keyed by bitstream id.

use std::collections::BTreeMap;

use rusqlite::Connection;
use slicerstats_db::queries::bsinfo::{self, BitstreamRow};
use slicerstats_types::{Arch, BitstreamId, BitstreamRecord, Os};
use tracing::info;

use crate::Result;

/// Version components kept from a filename.
const VERSION_COMPONENTS: usize = 3;

/// Extract the version from an artifact filename.
///
/// The filename must look like `<word>-<version>` optionally followed by
/// `-<anything>`, where `<word>` is ASCII word characters and `<version>`
/// is word characters and dots. The first three dotted components are
/// kept, with any suffix after a component's leading digits dropped.
/// Returns an empty string when the filename does not match.
///
/// ```
/// use slicerstats_etl::bitstreams::parse_version;
/// assert_eq!(parse_version("Slicer-4.10.2-linux-amd64.tar.gz"), "4.10.2");
/// assert_eq!(parse_version("firefox-4.1.0b2-win32.exe"), "4.1.0");
/// assert_eq!(parse_version("noversionhere.exe"), "");
/// ```
pub fn parse_version(filename: &str) -> String {
    let Some(captured) = version_capture(filename) else {
        return String::new();
    };
    captured
        .split('.')
        .take(VERSION_COMPONENTS)
        .map(strip_suffix)
        .collect::<Vec<_>>()
        .join(".")
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn version_capture(filename: &str) -> Option<&str> {
    let rest = filename.trim_start_matches(is_word).strip_prefix('-')?;
    let end = rest
        .find(|c: char| !(is_word(c) || c == '.'))
        .unwrap_or(rest.len());
    let (captured, tail) = rest.split_at(end);
    (tail.is_empty() || tail.starts_with('-')).then_some(captured)
}

/// `"0b2"` → `"0"`; components without leading digits are kept whole.
fn strip_suffix(component: &str) -> &str {
    match component.find(|c: char| !c.is_ascii_digit()) {
        Some(0) | None => component,
        Some(end) => &component[..end],
    }
}

/// First non-empty of checkout date and creation date.
pub fn checkout(row: &BitstreamRow) -> String {
    [&row.checkout_date, &row.date_creation]
        .into_iter()
        .flatten()
        .find(|date| !date.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Only an explicitly empty release marks a nightly build.
pub fn is_stable(row: &BitstreamRow) -> bool {
    row.release.as_deref() != Some("")
}

pub fn record(row: BitstreamRow) -> BitstreamRecord {
    let version = parse_version(&row.filename);
    let stable = is_stable(&row);
    let checkout = checkout(&row);
    let arch = Arch::from(row.arch);
    BitstreamRecord {
        os: Os::from(row.os),
        bits: arch.bits(),
        arch,
        version,
        stable,
        checkout,
    }
}

/// Fold over `bsinfo` rows.
#[derive(Debug, Default)]
pub struct BitstreamBuilder {
    table: BTreeMap<BitstreamId, BitstreamRecord>,
}

impl BitstreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: BitstreamRow) {
        let id = row.bitstream_id;
        self.table.insert(id, record(row));
    }

    pub fn finish(self) -> BTreeMap<BitstreamId, BitstreamRecord> {
        self.table
    }
}

/// Scan `bsinfo` and build the bitstream table.
pub fn build(conn: &Connection) -> Result<BTreeMap<BitstreamId, BitstreamRecord>> {
    let mut builder = BitstreamBuilder::new();
    bsinfo::each(conn, |row| {
        builder.push(row);
        Ok::<_, crate::EtlError>(())
    })?;
    let table = builder.finish();
    info!("Bitstream table built: {} bitstreams", table.len());
    Ok(table)
}
