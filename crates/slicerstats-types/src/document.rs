//! The assembled output document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AccessEvent, BitstreamId, BitstreamRecord, CountryCodeTable, FORMAT_VERSION};

/// Everything the visualization needs, in one JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    #[serde(rename = "countryCode")]
    pub country_code: CountryCodeTable,
    /// Integer ids become string keys in JSON.
    pub bitstream: BTreeMap<BitstreamId, BitstreamRecord>,
    pub access: Vec<AccessEvent>,
    /// `"lat,lng"` strings, referenced by `AccessEvent::location_index`.
    pub location: Vec<String>,
    #[serde(rename = "_formatVersion")]
    pub format_version: u32,
}

impl OutputDocument {
    pub fn new(
        country_code: CountryCodeTable,
        bitstream: BTreeMap<BitstreamId, BitstreamRecord>,
        access: Vec<AccessEvent>,
        location: Vec<String>,
    ) -> Self {
        Self {
            country_code,
            bitstream,
            access,
            location,
            format_version: FORMAT_VERSION,
        }
    }

    /// Whether every access event points at an existing location.
    pub fn locations_consistent(&self) -> bool {
        self.access
            .iter()
            .all(|event| event.location_index < self.location.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arch, CountryEntry, Os};

    fn sample() -> OutputDocument {
        let mut countries = CountryCodeTable::new();
        countries.insert(
            "FR".to_string(),
            CountryEntry::new("France", "Western Europe", "Europe"),
        );
        let mut bitstreams = BTreeMap::new();
        bitstreams.insert(
            7,
            BitstreamRecord {
                os: Os::Mac,
                arch: Arch::Amd64,
                bits: Some(64),
                version: "4.2.0".to_string(),
                stable: true,
                checkout: "2012-11-02".to_string(),
            },
        );
        let access = vec![AccessEvent {
            bitstream_id: 7,
            timestamp: "2013-01-01T10:00".to_string(),
            country_code: "FR".to_string(),
            location_index: 0,
        }];
        OutputDocument::new(
            countries,
            bitstreams,
            access,
            vec!["48.856600,2.352200".to_string()],
        )
    }

    #[test]
    fn test_document_keys() {
        let value = serde_json::to_value(sample()).expect("serialize");
        let obj = value.as_object().expect("object");
        for key in ["countryCode", "bitstream", "access", "location", "_formatVersion"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(value["_formatVersion"], FORMAT_VERSION);
        assert_eq!(value["bitstream"]["7"]["bits"], 64);
        assert_eq!(value["countryCode"]["FR"][0], "France");
    }

    #[test]
    fn test_locations_consistent() {
        let mut doc = sample();
        assert!(doc.locations_consistent());
        doc.access[0].location_index = 1;
        assert!(!doc.locations_consistent());
    }
}
