//! Unconfigured ONU scan over `show pon onu uncfg` output.
//!
//! ```text
//! OltIndex            Model                SN
//! -------------------------------------------------------------
//! gpon-olt_1/1/1      F670LV7.1            ZTEGC0FFEE01
//! ```
//!
//! When nothing is waiting the device prints a "no data" notice instead:
//!
//! ```text
//! %Code 32310-GPONSRV : No related information to show.
//! ```

use super::{OnuStatus, ParsedOnuItem};
use crate::platform::OltPlatform;

/// Result of the unconfigured scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnactivatedItems {
    /// Discovered ONUs, in transcript order.
    pub items: Vec<ParsedOnuItem>,

    /// The device explicitly reported there was nothing to show.
    pub no_data: bool,
}

/// Parse the unconfigured ONU table.
///
/// A device "no data" notice is a successful, empty result. So is output
/// that opens with a device error code; an error code after real rows is
/// ignored.
pub fn scan_unactivated(transcript: &str, platform: &OltPlatform) -> UnactivatedItems {
    if reports_no_data(transcript, platform) {
        return UnactivatedItems {
            items: Vec::new(),
            no_data: true,
        };
    }

    let items = transcript
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("---") && !line.starts_with("OltIndex"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let (olt_index, model, serial_number) = (fields.next()?, fields.next()?, fields.next()?);
            Some(ParsedOnuItem {
                olt_index: olt_index.to_string(),
                model: model.to_string(),
                serial_number: serial_number.to_string(),
                status: OnuStatus::Unactivated,
            })
        })
        .collect();

    UnactivatedItems {
        items,
        no_data: false,
    }
}

fn reports_no_data(transcript: &str, platform: &OltPlatform) -> bool {
    if platform
        .no_data_markers
        .iter()
        .any(|m| transcript.contains(m.as_str()))
    {
        return true;
    }
    let trimmed = transcript.trim();
    platform
        .error_code_prefixes
        .iter()
        .any(|p| trimmed.starts_with(p.as_str()))
}
