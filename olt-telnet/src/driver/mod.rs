//! High-level driver for device interaction.
//!
//! The driver layer owns the session lifecycle: login, command execution with
//! confirmation handling, and the per-operation [`OltClient`] API.

mod builder;
mod client;
pub mod dialog;
mod executor;
mod login;
mod request;
pub(crate) mod response;
mod session;

pub use builder::ClientBuilder;
pub use client::{
    ActivateOnu, Activation, ActivationOutcome, AvailableScan, OltClient, UnactivatedScan,
};
pub use dialog::{DialogAction, DialogEvent, DialogHandler, DialogState};
pub use request::CommandRequest;
pub use response::DeviceResponse;
pub use session::{DeviceSession, SessionState};
