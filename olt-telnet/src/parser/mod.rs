//! Parsers turning scan transcripts into ONU records.

mod available;
mod unactivated;

pub use available::{available_ids, occupied_ids, scan_available};
pub use unactivated::{UnactivatedItems, scan_unactivated};

use serde::{Deserialize, Serialize};

/// Status attached to a parsed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnuStatus {
    /// The ONU id is free on the port.
    Available,
    /// The ONU is discovered but not provisioned.
    Unactivated,
}

/// A free ONU id from the availability scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOnuRecord {
    pub id: u32,
    pub status: OnuStatus,
}

/// A discovered ONU from the unconfigured scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedOnuItem {
    pub olt_index: String,
    pub model: String,
    pub serial_number: String,
    pub status: OnuStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let record = ParsedOnuRecord {
            id: 4,
            status: OnuStatus::Available,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":4,"status":"available"}"#
        );

        let item = ParsedOnuItem {
            olt_index: "gpon-olt_1/1/1".into(),
            model: "F670L".into(),
            serial_number: "ZTEGC0FFEE01".into(),
            status: OnuStatus::Unactivated,
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({
                "oltIndex": "gpon-olt_1/1/1",
                "model": "F670L",
                "serialNumber": "ZTEGC0FFEE01",
                "status": "unactivated",
            })
        );
    }
}
