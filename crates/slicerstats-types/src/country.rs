//! Country reference data and the per-run country-code table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One record of the static country reference dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
    pub subregion: String,
    pub region: String,
}

/// Resolved country metadata, serialized as `[name, subregion, region]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct CountryEntry {
    pub name: String,
    pub subregion: String,
    pub region: String,
}

impl CountryEntry {
    pub fn new(
        name: impl Into<String>,
        subregion: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subregion: subregion.into(),
            region: region.into(),
        }
    }
}

impl From<&CountryInfo> for CountryEntry {
    fn from(info: &CountryInfo) -> Self {
        Self::new(&info.name, &info.subregion, &info.region)
    }
}

impl From<(String, String, String)> for CountryEntry {
    fn from((name, subregion, region): (String, String, String)) -> Self {
        Self {
            name,
            subregion,
            region,
        }
    }
}

impl From<CountryEntry> for (String, String, String) {
    fn from(entry: CountryEntry) -> Self {
        (entry.name, entry.subregion, entry.region)
    }
}

/// Country code → resolved metadata, for every code seen in the access data.
pub type CountryCodeTable = BTreeMap<String, CountryEntry>;
