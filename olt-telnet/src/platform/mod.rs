//! Platform definitions for device CLI vocabulary.
//!
//! This module defines the vendor-specific phrases the driver reacts to:
//! confirmation dialogs, login field prompts, and the markers scan parsers
//! use to recognise empty or duplicate results.

mod definition;
pub mod vendors;

pub use definition::OltPlatform;
pub use vendors::zte;
