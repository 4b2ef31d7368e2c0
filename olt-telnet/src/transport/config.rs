//! Device connection configuration.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Default management port of the device CLI (telnet).
pub const DEFAULT_PORT: u16 = 23;

/// Timeouts bounding every blocking step of a session.
///
/// Durations deserialize from integer milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// TCP connect timeout.
    #[serde(with = "millis")]
    pub connect: Duration,

    /// How long to collect the pre-login banner.
    #[serde(with = "millis")]
    pub banner: Duration,

    /// Pause after each credential line, used to drain device output.
    #[serde(with = "millis")]
    pub login_step: Duration,

    /// Deadline for the authenticated prompt after credentials are sent.
    #[serde(with = "millis")]
    pub login: Duration,

    /// Per-command-line response deadline.
    #[serde(with = "millis")]
    pub command: Duration,

    /// Optional silence period that also ends a command's burst early.
    #[serde(with = "millis_opt")]
    pub command_idle: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            banner: Duration::from_secs(5),
            login_step: Duration::from_secs(1),
            login: Duration::from_secs(8),
            command: Duration::from_secs(3),
            command_idle: None,
        }
    }
}

/// Connection parameters for one device.
///
/// Built once by the caller (or deserialized by an external loader) and
/// handed to every session explicitly.
#[derive(Clone, Deserialize)]
pub struct DeviceConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// CLI port (default: 23).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login username.
    pub username: String,

    /// Login password.
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,

    /// Substring identifying the authenticated prompt, e.g. `GPON-D1-JKT#`.
    pub prompt: String,

    /// Delimiter appended to every line sent.
    #[serde(default = "default_line_ending")]
    pub line_ending: String,

    /// Step timeouts.
    #[serde(default)]
    pub timeouts: Timeouts,
}

impl DeviceConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("prompt", &self.prompt)
            .field("line_ending", &self.line_ending)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_line_ending() -> String {
    "\n".to_string()
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
