//! Country-code table: every distinct country in the geolocation data,
//! resolved to `[name, subregion, region]`.

use rusqlite::Connection;
use slicerstats_db::queries::ipinfo::{self, CountryCodeRow};
use slicerstats_types::{CountryCodeTable, CountryEntry};
use tracing::{debug, info};

use crate::{CountryIndex, Result};

/// Label for subregion and region when a code has no reference entry.
pub const UNKNOWN: &str = "unknown";

const EUROPEAN_UNION: (&str, &str, &str) = ("European Union", "Western Europe", "Europe");

/// Resolve one distinct-country row.
///
/// The EU fallback looks at the row's `countryCode` column, which the
/// distinct-country query does not select. EU rows therefore resolve
/// through the unknown branch with their own name.
pub fn resolve(index: &CountryIndex, row: &CountryCodeRow) -> CountryEntry {
    if let Some(info) = index.get(&row.country_code) {
        CountryEntry::from(info)
    } else if row.country_code_alias.as_deref() == Some("EU") {
        let (name, subregion, region) = EUROPEAN_UNION;
        CountryEntry::new(name, subregion, region)
    } else {
        CountryEntry::new(&row.country_name, UNKNOWN, UNKNOWN)
    }
}

/// Fold over distinct-country rows.
#[derive(Debug)]
pub struct CountryCodeBuilder<'a> {
    index: &'a CountryIndex,
    table: CountryCodeTable,
    unresolved: usize,
}

impl<'a> CountryCodeBuilder<'a> {
    pub fn new(index: &'a CountryIndex) -> Self {
        Self {
            index,
            table: CountryCodeTable::new(),
            unresolved: 0,
        }
    }

    pub fn push(&mut self, row: CountryCodeRow) {
        if self.index.get(&row.country_code).is_none() {
            debug!("No reference data for country code '{}'", row.country_code);
            self.unresolved += 1;
        }
        let entry = resolve(self.index, &row);
        self.table.insert(row.country_code, entry);
    }

    /// Codes that fell back to the unknown entry so far.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    pub fn finish(self) -> CountryCodeTable {
        self.table
    }
}

/// Scan the geolocation table and build the country-code table.
pub fn build(conn: &Connection, index: &CountryIndex) -> Result<CountryCodeTable> {
    let mut builder = CountryCodeBuilder::new(index);
    ipinfo::each(conn, |row| {
        builder.push(row);
        Ok::<_, crate::EtlError>(())
    })?;
    info!(
        "Country-code table built: {} codes, {} without reference data",
        builder.table.len(),
        builder.unresolved()
    );
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicerstats_types::CountryInfo;

    fn index() -> CountryIndex {
        CountryIndex::new([CountryInfo {
            code: "CA".to_string(),
            name: "Canada".to_string(),
            subregion: "North America".to_string(),
            region: "Americas".to_string(),
        }])
    }

    fn row(code: &str, name: &str) -> CountryCodeRow {
        CountryCodeRow {
            country_code: code.to_string(),
            country_name: name.to_string(),
            country_code_alias: None,
        }
    }

    #[test]
    fn test_reference_hit_uses_reference_name() {
        let entry = resolve(&index(), &row("CA", "CANADA (geoip)"));
        assert_eq!(entry, CountryEntry::new("Canada", "North America", "Americas"));
    }

    #[test]
    fn test_unknown_code_keeps_row_name() {
        let entry = resolve(&index(), &row("ZZ", "Nowhere"));
        assert_eq!(entry, CountryEntry::new("Nowhere", "unknown", "unknown"));
    }

    #[test]
    fn test_eu_without_reference_falls_through() {
        let entry = resolve(&index(), &row("EU", "Europe"));
        assert_eq!(entry, CountryEntry::new("Europe", "unknown", "unknown"));
    }

    #[test]
    fn test_eu_alias_column() {
        let mut eu = row("EU", "Europe");
        eu.country_code_alias = Some("EU".to_string());
        let entry = resolve(&index(), &eu);
        assert_eq!(
            entry,
            CountryEntry::new("European Union", "Western Europe", "Europe")
        );
    }

    #[test]
    fn test_builder_keys_every_code() {
        let index = index();
        let mut builder = CountryCodeBuilder::new(&index);
        builder.push(row("CA", "Canada"));
        builder.push(row("ZZ", "Nowhere"));
        builder.push(row("EU", "Europe"));
        assert_eq!(builder.unresolved(), 2);

        let table = builder.finish();
        assert_eq!(table.len(), 3);
        assert!(table.contains_key("ZZ"));
        assert!(table.contains_key("EU"));
    }

    #[test]
    fn test_build_from_database() {
        let conn = slicerstats_db::open_memory().expect("open");
        ipinfo::insert(&conn, "1.2.3.4", Some("CA"), Some("Canada"), 45.4, -75.7).expect("ip");
        ipinfo::insert(&conn, "5.6.7.8", Some("EU"), Some("Europe"), 47.0, 8.0).expect("ip");

        let table = build(&conn, &index()).expect("build");
        assert_eq!(table["CA"].name, "Canada");
        assert_eq!(table["EU"].subregion, "unknown");
    }
}
