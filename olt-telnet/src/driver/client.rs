//! High-level OLT operations, one scoped session each.

use std::fmt;

use log::debug;
use tokio_util::sync::CancellationToken;

use super::request::CommandRequest;
use super::response::DeviceResponse;
use super::session::DeviceSession;
use crate::error::{DriverError, Result};
use crate::parser::{self, ParsedOnuItem, ParsedOnuRecord};
use crate::platform::OltPlatform;
use crate::template::{self, ActivationDetails, MAX_ONU_ID, OltIndex, OnuTarget};
use crate::transport::{Connect, DeviceConfig, TcpConnector};

/// Free ONU ids on one PON port.
#[derive(Debug, Clone)]
pub struct AvailableScan {
    pub response: DeviceResponse,
    pub records: Vec<ParsedOnuRecord>,
}

/// ONUs waiting for provisioning.
#[derive(Debug, Clone)]
pub struct UnactivatedScan {
    pub response: DeviceResponse,
    pub items: Vec<ParsedOnuItem>,
    /// The device reported there was nothing to show.
    pub no_data: bool,
}

/// Parameters for [`OltClient::activate`].
#[derive(Debug, Clone)]
pub struct ActivateOnu {
    pub olt: OltIndex,
    /// ONU id to use; the lowest free id is picked when `None`.
    pub onu: Option<u32>,
    pub details: ActivationDetails,
}

/// How the device took an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated,
    /// The serial or service was already provisioned.
    AlreadyRegistered,
}

/// Result of [`OltClient::activate`].
#[derive(Debug, Clone)]
pub struct Activation {
    pub target: OnuTarget,
    pub outcome: ActivationOutcome,
    pub response: DeviceResponse,
}

/// Client for one OLT.
///
/// Holds no connection. Every operation opens a session, authenticates, runs
/// one command block and closes the session on every exit path, so calls on
/// a shared client never interfere.
pub struct OltClient<C = TcpConnector> {
    config: DeviceConfig,
    platform: OltPlatform,
    connector: C,
    cancel: CancellationToken,
}

impl<C> fmt::Debug for OltClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OltClient")
            .field("config", &self.config)
            .field("platform", &self.platform.name)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<C: Connect> OltClient<C> {
    /// Create a client from its parts. See also [`ClientBuilder`](super::ClientBuilder).
    pub fn new(
        config: DeviceConfig,
        platform: OltPlatform,
        connector: C,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            platform,
            connector,
            cancel,
        }
    }

    /// Connection configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Platform definition.
    pub fn platform(&self) -> &OltPlatform {
        &self.platform
    }

    /// Run a literal command block.
    pub async fn run(&self, request: impl Into<CommandRequest>) -> Result<DeviceResponse> {
        let request = request.into();
        let cancel = self.cancel.child_token();
        let mut session = DeviceSession::new(&self.config, &self.platform, cancel);

        let result = self.drive(&mut session, &request).await;
        session.close().await;
        result
    }

    /// Scan `olt` for free ONU ids in `1..=max`.
    pub async fn scan_available(&self, olt: &OltIndex, max: u32) -> Result<AvailableScan> {
        let response = self.run(template::show_onu_state(olt)).await?;
        let records = parser::scan_available(&response.output(), max);
        debug!("{}: {} free ONU ids", olt, records.len());
        Ok(AvailableScan { response, records })
    }

    /// List discovered but unconfigured ONUs.
    pub async fn scan_unactivated(&self) -> Result<UnactivatedScan> {
        let response = self.run(template::show_unconfigured()).await?;
        let parsed = parser::scan_unactivated(&response.output(), &self.platform);
        debug!(
            "unconfigured scan: {} items (no data: {})",
            parsed.items.len(),
            parsed.no_data
        );
        Ok(UnactivatedScan {
            response,
            items: parsed.items,
            no_data: parsed.no_data,
        })
    }

    /// Provision an ONU.
    pub async fn activate(&self, request: ActivateOnu) -> Result<Activation> {
        let onu = match request.onu {
            Some(onu) => onu,
            None => self.lowest_free_id(&request.olt).await?,
        };
        let target = OnuTarget::new(request.olt, onu)?;

        let response = self.run(template::activate(&target, &request.details)).await?;
        let outcome = if self.platform.reports_existing(&response.result) {
            ActivationOutcome::AlreadyRegistered
        } else {
            ActivationOutcome::Activated
        };
        debug!("activate {} ({}): {:?}", target, request.details.serial_number, outcome);

        Ok(Activation {
            target,
            outcome,
            response,
        })
    }

    /// Reboot an ONU, answering the device's confirmation.
    pub async fn reboot(&self, target: &OnuTarget) -> Result<DeviceResponse> {
        debug!("reboot {}", target);
        self.run(template::reboot(target)).await
    }

    /// Deregister an ONU and save the configuration.
    pub async fn remove(&self, target: &OnuTarget) -> Result<DeviceResponse> {
        debug!("remove {}", target);
        self.run(template::remove(target)).await
    }

    async fn lowest_free_id(&self, olt: &OltIndex) -> Result<u32> {
        let scan = self.scan_available(olt, MAX_ONU_ID).await?;
        scan.records.first().map(|r| r.id).ok_or_else(|| {
            DriverError::NoAvailableOnu {
                olt_index: olt.to_string(),
            }
            .into()
        })
    }

    async fn drive(
        &self,
        session: &mut DeviceSession<'_, C::Stream>,
        request: &CommandRequest,
    ) -> Result<DeviceResponse> {
        session.connect(&self.connector).await?;
        session.login().await?;
        session.execute(request).await
    }
}
