//! Best-effort transcoding of device output.
//!
//! The CLI prints in GBK. Decoding never fails: malformed input comes back as
//! the original bytes read as lossy UTF-8. Prompts and dialog phrases are
//! plain ASCII, which both paths preserve.

use std::borrow::Cow;

use encoding_rs::GBK;
use log::warn;

/// Outcome of decoding a byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// The bytes were valid GBK.
    Clean(Cow<'a, str>),
    /// The bytes were malformed and fell back to a raw reinterpretation.
    Degraded(Cow<'a, str>),
}

impl<'a> Decoded<'a> {
    /// Whether decoding had to fall back to the raw bytes.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Decoded::Degraded(_))
    }

    /// Borrow the decoded text.
    pub fn as_str(&self) -> &str {
        match self {
            Decoded::Clean(text) | Decoded::Degraded(text) => text,
        }
    }

    /// Take the decoded text.
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            Decoded::Clean(text) | Decoded::Degraded(text) => text,
        }
    }
}

/// Decode GBK device output, reporting whether the fallback was taken.
pub fn transcode(raw: &[u8]) -> Decoded<'_> {
    match GBK.decode_without_bom_handling_and_without_replacement(raw) {
        Some(text) => Decoded::Clean(text),
        None => Decoded::Degraded(String::from_utf8_lossy(raw)),
    }
}

/// Decode GBK device output to text. Never fails.
pub fn decode(raw: &[u8]) -> String {
    let decoded = transcode(raw);
    if decoded.is_degraded() {
        warn!("device output is not valid GBK ({} bytes), keeping raw text", raw.len());
    }
    decoded.into_text().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_clean() {
        let decoded = transcode(b"OLT#show clock\r\n");
        assert!(!decoded.is_degraded());
        assert_eq!(decoded.as_str(), "OLT#show clock\r\n");
    }

    #[test]
    fn test_gbk_double_byte() {
        // "设备" in GBK
        let raw = [0xC9, 0xE8, 0xB1, 0xB8];
        assert_eq!(decode(&raw), "设备");
    }

    #[test]
    fn test_truncated_double_byte_falls_back() {
        // Lead byte with its trail byte missing.
        let raw = b"Confirm?[yes/no]\xC9";
        let decoded = transcode(raw);
        assert!(decoded.is_degraded());
        assert!(decoded.as_str().starts_with("Confirm?[yes/no]"));
    }

    #[test]
    fn test_malformed_never_panics() {
        let samples: [&[u8]; 4] = [b"\xFF", b"\x80\x80\x80", b"\xFE\x30", b""];
        for raw in samples {
            let text = decode(raw);
            assert!(text.len() <= raw.len() * 3);
        }
    }
}
