//! # olt-telnet
//!
//! Async telnet CLI driver for ZTE GPON OLT provisioning.
//!
//! olt-telnet logs in to the OLT's line-oriented CLI, sends command blocks,
//! answers the device's two-phase confirmation dialogs, and turns scan output
//! into structured ONU records.
//!
//! ## Features
//!
//! - Async TCP sessions via tokio, one scoped session per operation
//! - Deadline-driven output collection for a CLI without message framing
//! - Automatic `Confirm ... [yes/no]` handling, at most one reply per line
//! - GBK transcoding of device output
//! - Command templates for activate, reboot and remove
//! - Parsers for free ONU ids and unconfigured ONUs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use olt_telnet::{ClientBuilder, OltIndex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), olt_telnet::Error> {
//!     let client = ClientBuilder::new("10.0.0.2")
//!         .username("zte")
//!         .password("zte")
//!         .prompt("GPON-D1-JKT#")
//!         .build()?;
//!
//!     let olt: OltIndex = "gpon-olt_1/1/1".parse()?;
//!     let scan = client.scan_available(&olt, 128).await?;
//!     println!("{} free ids", scan.records.len());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod parser;
pub mod platform;
pub mod template;
pub mod transport;

// Re-export main types for convenience
pub use driver::{
    ActivateOnu, Activation, ActivationOutcome, AvailableScan, ClientBuilder, CommandRequest,
    DeviceResponse, DeviceSession, OltClient, SessionState, UnactivatedScan,
};
pub use error::{Error, Phase, Result};
pub use parser::{OnuStatus, ParsedOnuItem, ParsedOnuRecord};
pub use platform::OltPlatform;
pub use template::{ActivationDetails, OltIndex, OnuTarget, Operation, PppoeProfile, ServiceProfile};
pub use transport::{DeviceConfig, Timeouts};
