//! Scripted credential exchange.
//!
//! ```text
//! banner ─► username ─► (drain) ─► password ─► (drain) ─► empty line ─► prompt
//! ```
//!
//! Each drain is one deadline-bound read: it returns as soon as the next field
//! prompt shows up, or when the step delay runs out. Only the final wait for
//! the authenticated prompt can fail.

use log::{debug, trace};
use secrecy::ExposeSecret;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;

use crate::channel::decode;
use crate::error::{DriverError, LoginFailure, Phase};
use crate::platform::OltPlatform;
use crate::transport::{DeviceConfig, ReadEnd, Transport};

/// Run the login sequence on a freshly connected transport.
pub(crate) async fn login<S>(
    transport: &mut Transport<S>,
    config: &DeviceConfig,
    platform: &OltPlatform,
) -> Result<(), DriverError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let timeouts = &config.timeouts;
    let failed = |reason| DriverError::LoginFailed {
        prompt: config.prompt.clone(),
        reason,
    };

    drain(
        transport,
        config,
        platform.username_prompt.as_deref(),
        Instant::now() + timeouts.banner,
        "banner",
    )
    .await?;

    transport
        .send_line(&config.username, &config.line_ending)
        .await
        .map_err(|e| failed(LoginFailure::Write(e)))?;

    drain(
        transport,
        config,
        platform.password_prompt.as_deref(),
        Instant::now() + timeouts.login_step,
        "username",
    )
    .await?;

    transport
        .send_line(config.password.expose_secret(), &config.line_ending)
        .await
        .map_err(|e| failed(LoginFailure::Write(e)))?;

    drain(
        transport,
        config,
        None,
        Instant::now() + timeouts.login_step,
        "password",
    )
    .await?;

    transport
        .send_line("", &config.line_ending)
        .await
        .map_err(|e| failed(LoginFailure::Write(e)))?;

    let wait = transport
        .read_until(Some(config.prompt.as_bytes()), Instant::now() + timeouts.login)
        .await
        .map_err(|e| failed(LoginFailure::Read(e)))?;
    trace!("login: {}", decode(&wait.data).trim());

    match wait.end {
        ReadEnd::Matched => {
            debug!("login: found prompt '{}'", config.prompt);
            Ok(())
        }
        ReadEnd::Deadline => Err(failed(LoginFailure::Timeout(timeouts.login))),
        ReadEnd::Eof => Err(failed(LoginFailure::Closed)),
        ReadEnd::Cancelled => Err(DriverError::Cancelled {
            phase: Phase::Login,
        }),
    }
}

/// Read until `marker` or `deadline`; neither outcome is an error here.
async fn drain<S>(
    transport: &mut Transport<S>,
    config: &DeviceConfig,
    marker: Option<&str>,
    deadline: Instant,
    label: &str,
) -> Result<(), DriverError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let failed = |reason| DriverError::LoginFailed {
        prompt: config.prompt.clone(),
        reason,
    };
    let read = transport
        .read_until(marker.map(str::as_bytes), deadline)
        .await
        .map_err(|e| failed(LoginFailure::Read(e)))?;
    trace!("[{}] {}", label, decode(&read.data).trim());

    match read.end {
        ReadEnd::Matched | ReadEnd::Deadline => Ok(()),
        ReadEnd::Eof => Err(failed(LoginFailure::Closed)),
        ReadEnd::Cancelled => Err(DriverError::Cancelled {
            phase: Phase::Login,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::io::Builder;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::driver::ClientBuilder;
    use crate::platform::zte;

    fn config() -> DeviceConfig {
        ClientBuilder::new("olt.test")
            .username("zte")
            .password("secret")
            .prompt("GPON-D1-JKT#")
            .config()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_happy_path() {
        let mock = Builder::new()
            .read(b"\r\n\r\nUsername:")
            .write(b"zte\n")
            .read(b"Password:")
            .write(b"secret\n")
            .write(b"\n")
            .read(b"\r\nGPON-D1-JKT#")
            .build();
        let mut transport = Transport::new(mock, CancellationToken::new());

        login(&mut transport, &config(), &zte::platform()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_without_field_prompts_waits_step_delays() {
        let start = Instant::now();
        let mock = Builder::new()
            .write(b"zte\n")
            .write(b"secret\n")
            .write(b"\n")
            .read(b"GPON-D1-JKT#")
            .build();
        let mut transport = Transport::new(mock, CancellationToken::new());

        login(&mut transport, &config(), &zte::platform()).await.unwrap();

        // banner (5s) + two step delays (1s each) on the virtual clock.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7) && elapsed < Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_wrong_prompt_times_out() {
        let mock = Builder::new()
            .read(b"Username:")
            .write(b"zte\n")
            .read(b"Password:")
            .write(b"secret\n")
            .write(b"\n")
            .read(b"OTHER-HOST#")
            .wait(Duration::from_secs(60))
            .build();
        let mut transport = Transport::new(mock, CancellationToken::new());

        let err = login(&mut transport, &config(), &zte::platform())
            .await
            .unwrap_err();
        match err {
            DriverError::LoginFailed {
                prompt,
                reason: LoginFailure::Timeout(limit),
            } => {
                assert_eq!(prompt, "GPON-D1-JKT#");
                assert_eq!(limit, Duration::from_secs(8));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_connection_closed() {
        let mock = Builder::new().read(b"Username:").write(b"zte\n").build();
        let mut transport = Transport::new(mock, CancellationToken::new());

        let err = login(&mut transport, &config(), &zte::platform())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DriverError::LoginFailed {
                reason: LoginFailure::Closed,
                ..
            }
        ));
    }
}
