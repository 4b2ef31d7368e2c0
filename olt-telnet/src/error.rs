//! Error types for olt-telnet.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::driver::SessionState;

/// Main error type for olt-telnet operations.
#[derive(Error, Debug)]
pub enum Error {
    /// TCP transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session driver errors (login, command execution)
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Command template and addressing errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl Error {
    /// The phase of the operation that failed.
    pub fn phase(&self) -> Phase {
        match self {
            Error::Transport(_) => Phase::Connect,
            Error::Driver(DriverError::InvalidConfig { .. }) => Phase::Config,
            Error::Driver(DriverError::LoginFailed { .. }) => Phase::Login,
            Error::Driver(DriverError::Cancelled { phase }) => *phase,
            Error::Driver(_) => Phase::Execute,
            Error::Template(_) => Phase::Template,
        }
    }
}

/// Operation phase an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Config,
    Connect,
    Login,
    Execute,
    Template,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Config => "config",
            Phase::Connect => "connect",
            Phase::Login => "login",
            Phase::Execute => "execute",
            Phase::Template => "template",
        };
        f.write_str(name)
    }
}

/// Transport layer errors (dialing the device).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The connect attempt did not finish in time
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Why the login sequence did not reach the authenticated prompt.
#[derive(Error, Debug)]
pub enum LoginFailure {
    /// The prompt did not show up before the login deadline.
    #[error("prompt not seen within {0:?}")]
    Timeout(Duration),

    /// Reading from the device failed.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// The device closed the connection.
    #[error("connection closed by device")]
    Closed,

    /// Sending a credential line failed.
    #[error("write error: {0}")]
    Write(#[source] io::Error),
}

/// Driver layer errors (login, command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The authenticated prompt was never observed
    #[error("Login failed waiting for prompt '{prompt}': {reason}")]
    LoginFailed {
        prompt: String,
        #[source]
        reason: LoginFailure,
    },

    /// A command line could not be sent
    #[error("Failed to send '{line}': {source}")]
    WriteFailed {
        line: String,
        #[source]
        source: io::Error,
    },

    /// Commands were issued before login completed
    #[error("Session not authenticated (state: {state})")]
    NotAuthenticated { state: SessionState },

    /// The session already served its one operation
    #[error("Session already finished - open a new one")]
    SessionFinished,

    /// The caller cancelled the operation
    #[error("Operation cancelled during {phase}")]
    Cancelled { phase: Phase },

    /// No free ONU id left on the port
    #[error("No available ONU id on {olt_index}")]
    NoAvailableOnu { olt_index: String },

    /// Invalid configuration in the client builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Command template and addressing errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// OLT interface name could not be parsed
    #[error("Invalid olt_index format: {index}")]
    InvalidOltIndex { index: String },

    /// ONU id outside the device range
    #[error("Invalid ONU id: {id}")]
    InvalidOnuId { id: u32 },

    /// Operation name not known to the template builder
    #[error("Unknown operation '{name}'")]
    UnknownOperation { name: String },

    /// Activation requested without serial number, code and profile
    #[error("Activation requires serial number, code and service profile")]
    MissingActivationDetails,
}

/// Result type alias using olt-telnet's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        let err: Error = TransportError::ConnectTimeout {
            host: "10.0.0.1".into(),
            port: 23,
            timeout: Duration::from_secs(5),
        }
        .into();
        assert_eq!(err.phase(), Phase::Connect);

        let err: Error = DriverError::LoginFailed {
            prompt: "OLT#".into(),
            reason: LoginFailure::Timeout(Duration::from_secs(8)),
        }
        .into();
        assert_eq!(err.phase(), Phase::Login);

        let err: Error = DriverError::WriteFailed {
            line: "wr".into(),
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        }
        .into();
        assert_eq!(err.phase(), Phase::Execute);

        let err: Error = TemplateError::InvalidOnuId { id: 0 }.into();
        assert_eq!(err.phase(), Phase::Template);

        let err: Error = DriverError::InvalidConfig {
            message: "Username is required".into(),
        }
        .into();
        assert_eq!(err.phase(), Phase::Config);
    }

    #[test]
    fn test_cancelled_keeps_its_phase() {
        for phase in [Phase::Connect, Phase::Login, Phase::Execute] {
            let err: Error = DriverError::Cancelled { phase }.into();
            assert_eq!(err.phase(), phase);
            assert!(err.to_string().contains(&phase.to_string()));
        }
    }

    #[test]
    fn test_login_error_message_names_prompt() {
        let err = DriverError::LoginFailed {
            prompt: "GPON-D1#".into(),
            reason: LoginFailure::Closed,
        };
        let msg = err.to_string();
        assert!(msg.contains("GPON-D1#"));
        assert!(msg.contains("closed"));
    }
}
