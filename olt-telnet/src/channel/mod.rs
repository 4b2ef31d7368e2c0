//! Channel layer for byte-level matching and text decoding.
//!
//! This module handles what sits between raw socket bytes and the driver:
//! the rolling fragment used for dialog detection and GBK transcoding.

mod buffer;
mod decode;

pub use buffer::FragmentBuffer;
pub use decode::{Decoded, decode, transcode};
