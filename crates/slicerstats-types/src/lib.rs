//! # slicerstats-types
//!
//! Shared domain types for the download-statistics document.
//!
//! The output document is consumed by a browser-side visualization, so
//! every type here serializes to the compact JSON shape that consumer
//! expects: countries and access events as positional arrays, bitstreams
//! as objects keyed by id.

pub mod access;
pub mod bitstream;
pub mod country;
pub mod document;

pub use access::AccessEvent;
pub use bitstream::{Arch, BitstreamRecord, Os};
pub use country::{CountryCodeTable, CountryEntry, CountryInfo};
pub use document::OutputDocument;

/// Bitstream identifier as stored in the download server.
pub type BitstreamId = i64;

/// Version of the output document layout.
///
/// Bump whenever a consumer-visible key or tuple position changes.
pub const FORMAT_VERSION: u32 = 1;

/// User-agent category kept by the access scan unless configured otherwise.
pub const DEFAULT_BROWSER_TYPE: &str = "Browser";
