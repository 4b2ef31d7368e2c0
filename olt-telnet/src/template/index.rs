//! Interface addressing on the OLT.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;

/// Highest ONU id a GPON port accepts.
pub const MAX_ONU_ID: u32 = 128;

static OLT_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gpon-olt_1/([0-9]+)/([0-9]+)$").expect("Invalid regex pattern"));

/// A PON port, written `gpon-olt_1/<slot>/<port>` on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OltIndex {
    pub slot: u32,
    pub port: u32,
}

impl OltIndex {
    pub fn new(slot: u32, port: u32) -> Self {
        Self { slot, port }
    }
}

impl fmt::Display for OltIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpon-olt_1/{}/{}", self.slot, self.port)
    }
}

impl FromStr for OltIndex {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemplateError::InvalidOltIndex {
            index: s.to_string(),
        };
        let caps = OLT_INDEX.captures(s.trim()).ok_or_else(invalid)?;
        let slot = caps[1].parse().map_err(|_| invalid())?;
        let port = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self { slot, port })
    }
}

/// One ONU on a PON port, written `gpon-onu_1/<slot>/<port>:<onu>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OnuTarget {
    pub olt: OltIndex,
    pub onu: u32,
}

impl OnuTarget {
    /// Address ONU `onu` on `olt`; ids run from 1 to [`MAX_ONU_ID`].
    pub fn new(olt: OltIndex, onu: u32) -> Result<Self, TemplateError> {
        if !(1..=MAX_ONU_ID).contains(&onu) {
            return Err(TemplateError::InvalidOnuId { id: onu });
        }
        Ok(Self { olt, onu })
    }
}

impl fmt::Display for OnuTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gpon-onu_1/{}/{}:{}",
            self.olt.slot, self.olt.port, self.onu
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_olt_index() {
        let index: OltIndex = "gpon-olt_1/2/15".parse().unwrap();
        assert_eq!(index, OltIndex::new(2, 15));
        assert_eq!(index.to_string(), "gpon-olt_1/2/15");
    }

    #[test]
    fn test_parse_olt_index_via_from_str() {
        let index = OltIndex::from_str("  gpon-olt_1/1/1\r\n").unwrap();
        assert_eq!(index, OltIndex::new(1, 1));
        assert!(OltIndex::from_str("gpon-olt_1/٣/1").is_err());
    }

    #[test]
    fn test_parse_olt_index_rejects_garbage() {
        for bad in ["", "gpon-olt_1/2", "gpon-onu_1/1/1:3", "gpon-olt_1/a/1", "gpon-olt_1/1/99999999999"] {
            assert_eq!(
                bad.parse::<OltIndex>(),
                Err(TemplateError::InvalidOltIndex {
                    index: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_onu_target_bounds() {
        let olt = OltIndex::new(1, 1);
        assert!(OnuTarget::new(olt, 1).is_ok());
        assert!(OnuTarget::new(olt, MAX_ONU_ID).is_ok());
        assert_eq!(
            OnuTarget::new(olt, 0),
            Err(TemplateError::InvalidOnuId { id: 0 })
        );
        assert!(OnuTarget::new(olt, MAX_ONU_ID + 1).is_err());
    }

    #[test]
    fn test_onu_target_display() {
        let target = OnuTarget::new(OltIndex::new(1, 4), 17).unwrap();
        assert_eq!(target.to_string(), "gpon-onu_1/1/4:17");
    }
}
