//! Builder for device configuration and clients.

use std::time::Duration;

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use super::client::OltClient;
use crate::error::{DriverError, Result};
use crate::platform::{OltPlatform, zte};
use crate::transport::{Connect, DEFAULT_PORT, DeviceConfig, TcpConnector, Timeouts};

/// Builder for constructing an [`OltClient`].
///
/// # Example
///
/// ```rust,no_run
/// use olt_telnet::ClientBuilder;
///
/// # async fn example() -> Result<(), olt_telnet::Error> {
/// let client = ClientBuilder::new("10.0.0.2")
///     .username("zte")
///     .password("zte")
///     .prompt("GPON-D1-JKT#")
///     .build()?;
///
/// let scan = client.scan_unactivated().await?;
/// println!("{} waiting", scan.items.len());
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: SecretString,
    prompt: Option<String>,
    line_ending: String,
    timeouts: Timeouts,
    platform: OltPlatform,
    cancel: Option<CancellationToken>,
}

impl ClientBuilder {
    /// Create a new builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            password: SecretString::from(String::new()),
            prompt: None,
            line_ending: "\n".to_string(),
            timeouts: Timeouts::default(),
            platform: zte::platform(),
            cancel: None,
        }
    }

    /// Set the CLI port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Set the substring that identifies the authenticated prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the delimiter appended to each line (default: `"\n"`).
    pub fn line_ending(mut self, ending: impl Into<String>) -> Self {
        self.line_ending = ending.into();
        self
    }

    /// Replace all timeouts.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connect = timeout;
        self
    }

    /// Set the per-command-line response deadline.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.command = timeout;
        self
    }

    /// End a command's burst early after this much silence.
    pub fn command_idle(mut self, idle: Duration) -> Self {
        self.timeouts.command_idle = Some(idle);
        self
    }

    /// Use a custom platform definition instead of the ZTE C300 default.
    pub fn platform(mut self, platform: OltPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Tie every session of the client to `cancel`.
    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build just the connection configuration.
    pub fn config(&self) -> Result<DeviceConfig> {
        let username = self.username.clone().ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;
        let prompt = self.prompt.clone().ok_or_else(|| DriverError::InvalidConfig {
            message: "Prompt is required".to_string(),
        })?;
        if prompt.trim().is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "Prompt must not be blank".to_string(),
            }
            .into());
        }

        Ok(DeviceConfig {
            host: self.host.clone(),
            port: self.port,
            username,
            password: self.password.clone(),
            prompt,
            line_ending: self.line_ending.clone(),
            timeouts: self.timeouts.clone(),
        })
    }

    /// Build a client that dials the device over TCP.
    ///
    /// This does not connect; every client operation opens its own session.
    pub fn build(self) -> Result<OltClient> {
        self.build_with(TcpConnector)
    }

    /// Build a client that opens its streams through `connector`.
    pub fn build_with<C: Connect>(self, connector: C) -> Result<OltClient<C>> {
        let config = self.config()?;
        let cancel = self.cancel.unwrap_or_default();
        Ok(OltClient::new(config, self.platform, connector, cancel))
    }
}
