//! Free ONU id scan over `show gpon onu state` output.
//!
//! ```text
//! OnuIndex   Admin State  OMCC State  Phase State  Channel
//! --------------------------------------------------------------
//! 1/1/1:1    enable       enable      working      1(GPON)
//! 1/1/1:3    enable       disable     offline      1(GPON)
//! ONU Number: 2/2
//! ```

use std::collections::BTreeSet;

use super::{OnuStatus, ParsedOnuRecord};

/// ONU ids present in the transcript.
///
/// Only lines whose first token has the `slot:index` shape count; anything
/// else (headers, separators, echoes, footers) is skipped.
pub fn occupied_ids(transcript: &str) -> BTreeSet<u32> {
    transcript
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("OnuIndex") && !line.contains("---"))
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(onu_id)
        .collect()
}

/// Ids in `1..=max` not present in the transcript, ascending.
pub fn available_ids(transcript: &str, max: u32) -> BTreeSet<u32> {
    if max == 0 {
        return BTreeSet::new();
    }
    let occupied = occupied_ids(transcript);
    (1..=max).filter(|id| !occupied.contains(id)).collect()
}

/// Free ids as records, ascending.
pub fn scan_available(transcript: &str, max: u32) -> Vec<ParsedOnuRecord> {
    available_ids(transcript, max)
        .into_iter()
        .map(|id| ParsedOnuRecord {
            id,
            status: OnuStatus::Available,
        })
        .collect()
}

fn onu_id(token: &str) -> Option<u32> {
    let mut parts = token.split(':');
    let (_, index) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    index.parse().ok()
}
