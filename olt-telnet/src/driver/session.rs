//! One device session: connect, authenticate, execute once, close.

use std::fmt;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use super::executor;
use super::login;
use super::request::CommandRequest;
use super::response::DeviceResponse;
use crate::error::{DriverError, Phase, Result};
use crate::platform::OltPlatform;
use crate::transport::{Connect, DeviceConfig, Transport};

/// Protocol state of a [`DeviceSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotConnected,
    Connected,
    Authenticating,
    Authenticated,
    Executing,
    Done,
    Failed,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::NotConnected => "not connected",
            SessionState::Connected => "connected",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
            SessionState::Executing => "executing",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A connection to one device, owned by the operation that opened it.
///
/// A session serves a single command request. Once it is `Done` (or
/// `Failed`) the only remaining step is [`close`](Self::close).
pub struct DeviceSession<'a, S> {
    config: &'a DeviceConfig,
    platform: &'a OltPlatform,
    transport: Option<Transport<S>>,
    state: SessionState,
    history: Vec<SessionState>,
    cancel: CancellationToken,
}

impl<'a, S> DeviceSession<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create an unconnected session.
    pub fn new(
        config: &'a DeviceConfig,
        platform: &'a OltPlatform,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            platform,
            transport: None,
            state: SessionState::NotConnected,
            history: vec![SessionState::NotConnected],
            cancel,
        }
    }

    /// Dial the device through `connector`.
    pub async fn connect<C>(&mut self, connector: &C) -> Result<()>
    where
        C: Connect<Stream = S>,
    {
        let config = self.config;
        let cancel = self.cancel.clone();
        let dialed = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            stream = connector.connect(&config.host, config.port, config.timeouts.connect) => {
                Some(stream)
            }
        };

        match dialed {
            None => {
                self.set_state(SessionState::Failed);
                Err(DriverError::Cancelled {
                    phase: Phase::Connect,
                }
                .into())
            }
            Some(Ok(stream)) => {
                debug!("connected to {}", self.config.socket_addr());
                self.attach(stream);
                Ok(())
            }
            Some(Err(e)) => {
                self.set_state(SessionState::Failed);
                Err(e)
            }
        }
    }

    /// Adopt an already connected stream.
    pub fn attach(&mut self, stream: S) {
        self.transport = Some(Transport::new(stream, self.cancel.clone()));
        self.set_state(SessionState::Connected);
    }

    /// Run the login sequence.
    pub async fn login(&mut self) -> Result<()> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(DriverError::NotAuthenticated { state: self.state }.into());
        };
        if self.state != SessionState::Connected {
            return Err(DriverError::NotAuthenticated { state: self.state }.into());
        }

        self.state = SessionState::Authenticating;
        self.history.push(SessionState::Authenticating);

        match login::login(transport, self.config, self.platform).await {
            Ok(()) => {
                debug!("login complete on {}", self.config.host);
                self.set_state(SessionState::Authenticated);
                Ok(())
            }
            Err(e) => {
                self.set_state(SessionState::Failed);
                Err(e.into())
            }
        }
    }

    /// Execute one command request on the authenticated session.
    pub async fn execute(&mut self, request: &CommandRequest) -> Result<DeviceResponse> {
        match self.state {
            SessionState::Authenticated => {}
            SessionState::Done => return Err(DriverError::SessionFinished.into()),
            state => return Err(DriverError::NotAuthenticated { state }.into()),
        }
        let Some(transport) = self.transport.as_mut() else {
            return Err(DriverError::NotAuthenticated { state: self.state }.into());
        };

        self.state = SessionState::Executing;
        self.history.push(SessionState::Executing);

        match executor::execute(transport, self.config, self.platform, request).await {
            Ok(response) => {
                self.set_state(SessionState::Done);
                Ok(response)
            }
            Err(e) => {
                self.set_state(SessionState::Failed);
                Err(e.into())
            }
        }
    }

    /// Release the connection. Safe in any state.
    pub async fn close(mut self) {
        if let Some(transport) = self.transport.take() {
            transport.close().await;
        } else if self.state != SessionState::NotConnected {
            warn!("closing session in state '{}' without a connection", self.state);
        }
        self.set_state(SessionState::Closed);
        debug!("session history: {:?}", self.history);
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state the session has passed through, oldest first.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.history.push(state);
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use tokio_test::io::{Builder, Mock};

    use super::*;
    use crate::driver::ClientBuilder;
    use crate::error::{Error, Phase};
    use crate::platform::zte;

    fn config() -> DeviceConfig {
        ClientBuilder::new("olt.test")
            .username("zte")
            .password("zte")
            .prompt("OLT#")
            .config()
            .unwrap()
    }

    fn login_script(builder: &mut Builder) -> &mut Builder {
        builder
            .read(b"Username:")
            .write(b"zte\n")
            .read(b"Password:")
            .write(b"zte\n")
            .write(b"\n")
            .read(b"\r\nOLT#")
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_lifecycle_history() {
        let config = config();
        let platform = zte::platform();
        let mock = login_script(&mut Builder::new())
            .write(b"show clock\n")
            .read(b"show clock\r\n10:00:00 UTC")
            .read(b"\r\nOLT#")
            .write(b"show version\n")
            .read(b"show version\r\nV2.1.0\r\nOLT#")
            .build();

        let mut session: DeviceSession<'_, Mock> =
            DeviceSession::new(&config, &platform, CancellationToken::new());
        session.attach(mock);
        session.login().await.unwrap();
        let response = session
            .execute(&CommandRequest::new(["show clock", "show version"]))
            .await
            .unwrap();
        assert_eq!(
            response.result,
            "show clock\r\n10:00:00 UTC\r\nOLT#show version\r\nV2.1.0\r\nOLT#"
        );
        assert_eq!(response.confirmations, 0);
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(
            session.history(),
            &[
                SessionState::NotConnected,
                SessionState::Connected,
                SessionState::Authenticating,
                SessionState::Authenticated,
                SessionState::Executing,
                SessionState::Done,
            ]
        );
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_before_login_is_rejected() {
        let config = config();
        let platform = zte::platform();
        let mut session = DeviceSession::new(&config, &platform, CancellationToken::new());
        session.attach(Builder::new().build());

        let err = session
            .execute(&CommandRequest::from("show clock"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Driver(DriverError::NotAuthenticated {
                state: SessionState::Connected
            })
        ));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_execute_is_finished() {
        let config = config();
        let platform = zte::platform();
        let mock = login_script(&mut Builder::new())
            .write(b"show clock\n")
            .build();

        let mut session = DeviceSession::new(&config, &platform, CancellationToken::new());
        session.attach(mock);
        session.login().await.unwrap();
        session
            .execute(&CommandRequest::from("show clock"))
            .await
            .unwrap();
        let err = session
            .execute(&CommandRequest::from("show clock"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::SessionFinished)));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_failure_marks_failed() {
        let config = config();
        let platform = zte::platform();
        let mock = Builder::new().read(b"Username:").write(b"zte\n").build();

        let mut session = DeviceSession::new(&config, &platform, CancellationToken::new());
        session.attach(mock);
        let err = session.login().await.unwrap_err();
        assert_eq!(err.phase(), Phase::Login);
        assert_eq!(session.state(), SessionState::Failed);
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_login_reports_login_phase() {
        let config = config();
        let platform = zte::platform();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut session = DeviceSession::new(&config, &platform, cancel);
        session.attach(Builder::new().build());
        let err = session.login().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Driver(DriverError::Cancelled {
                phase: Phase::Login
            })
        ));
        assert_eq!(err.phase(), Phase::Login);
        assert_eq!(session.state(), SessionState::Failed);
        session.close().await;
    }

    struct Refused;

    impl Connect for Refused {
        type Stream = Mock;

        async fn connect(&self, host: &str, port: u16, _timeout: Duration) -> Result<Mock> {
            Err(crate::error::TransportError::ConnectionFailed {
                host: host.to_string(),
                port,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_connect_failure_is_connect_phase() {
        let config = config();
        let platform = zte::platform();
        let mut session = DeviceSession::new(&config, &platform, CancellationToken::new());

        let err = session.connect(&Refused).await.unwrap_err();
        assert_eq!(err.phase(), Phase::Connect);
        assert_eq!(session.state(), SessionState::Failed);
        session.close().await;
    }
}
