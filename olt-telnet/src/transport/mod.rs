//! Raw TCP transport layer.
//!
//! This module provides the low-level connection management: dialing the
//! device with a bounded connect timeout, deadline-bound reads that honour
//! caller cancellation, and line writes.

pub mod config;
mod tcp;

pub use config::{DEFAULT_PORT, DeviceConfig, Timeouts};
pub use tcp::{Connect, ReadEnd, ReadOutcome, ReadUntil, TcpConnector, Transport};
