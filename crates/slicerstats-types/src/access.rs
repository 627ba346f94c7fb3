//! Access events.

use serde::{Deserialize, Serialize};

use crate::BitstreamId;

/// One download, serialized as
/// `[bitstreamId, "YYYY-MM-DDTHH:MM", countryCode, locationIndex]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(BitstreamId, String, String, usize)",
    into = "(BitstreamId, String, String, usize)"
)]
pub struct AccessEvent {
    pub bitstream_id: BitstreamId,
    /// UTC, minute precision.
    pub timestamp: String,
    pub country_code: String,
    /// Index into the document's `location` table.
    pub location_index: usize,
}

impl From<(BitstreamId, String, String, usize)> for AccessEvent {
    fn from(
        (bitstream_id, timestamp, country_code, location_index): (
            BitstreamId,
            String,
            String,
            usize,
        ),
    ) -> Self {
        Self {
            bitstream_id,
            timestamp,
            country_code,
            location_index,
        }
    }
}

impl From<AccessEvent> for (BitstreamId, String, String, usize) {
    fn from(event: AccessEvent) -> Self {
        (
            event.bitstream_id,
            event.timestamp,
            event.country_code,
            event.location_index,
        )
    }
}
