//! Country reference lookup.
//!
//! The reference is a JSON array of country records. Two layouts are
//! accepted: the flat one shipped in `data/countries.json`
//!
//! ```json
//! {"cca2": "FR", "name": "France", "subregion": "Western Europe", "region": "Europe"}
//! ```
//!
//! and the public countries dataset, where `name` is an object carrying a
//! `common` field. Unknown fields are ignored.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use slicerstats_types::CountryInfo;

use crate::{EtlError, Result};

/// Reference data compiled into the binary.
const BUILTIN_COUNTRIES: &str = include_str!("../data/countries.json");

#[derive(Deserialize)]
struct ReferenceRecord {
    #[serde(alias = "code")]
    cca2: String,
    name: ReferenceName,
    #[serde(default)]
    subregion: String,
    #[serde(default)]
    region: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceName {
    Plain(String),
    Localized { common: String },
}

impl From<ReferenceRecord> for CountryInfo {
    fn from(record: ReferenceRecord) -> Self {
        let name = match record.name {
            ReferenceName::Plain(name) => name,
            ReferenceName::Localized { common } => common,
        };
        CountryInfo {
            code: record.cca2,
            name,
            subregion: record.subregion,
            region: record.region,
        }
    }
}

/// Country records indexed by 2-letter code.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    by_code: HashMap<String, CountryInfo>,
}

impl CountryIndex {
    /// Index the given records. Later records replace earlier ones with the
    /// same code.
    pub fn new(records: impl IntoIterator<Item = CountryInfo>) -> Self {
        let by_code = records
            .into_iter()
            .map(|info| (info.code.clone(), info))
            .collect();
        Self { by_code }
    }

    /// The reference shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_COUNTRIES)
    }

    /// Parse a reference document.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ReferenceRecord> =
            serde_json::from_str(json).map_err(EtlError::ReferenceFormat)?;
        Ok(Self::new(records.into_iter().map(CountryInfo::from)))
    }

    /// Load a reference document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| EtlError::ReferenceIo {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json(&json)?;
        tracing::debug!("Loaded {} reference countries from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn get(&self, code: &str) -> Option<&CountryInfo> {
        self.by_code.get(code)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
