//! Command execution over an unframed stream.
//!
//! The CLI has no message framing, so the only end-of-response signal is
//! time: after each line is sent, output is collected until the per-line
//! deadline passes (or, when configured, until the device falls silent).
//! Expiry is the normal way a burst ends, never an error. Every byte is also
//! fed to the [`DialogHandler`], which decides when a confirmation must be
//! answered.

use std::cmp;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;

use super::dialog::DialogHandler;
use super::request::CommandRequest;
use super::response::DeviceResponse;
use crate::error::{DriverError, Phase};
use crate::platform::OltPlatform;
use crate::transport::{DeviceConfig, ReadOutcome, Transport};

/// Send every line of `request` and collect the device's output.
pub(crate) async fn execute<S>(
    transport: &mut Transport<S>,
    config: &DeviceConfig,
    platform: &OltPlatform,
    request: &CommandRequest,
) -> Result<DeviceResponse, DriverError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let start = Instant::now();
    let mut raw = Vec::new();
    let mut dialog = DialogHandler::new(platform);

    for line in request.lines() {
        if transport.is_cancelled() {
            return Err(DriverError::Cancelled {
                phase: Phase::Execute,
            });
        }

        dialog.next_command();
        debug!("execute: sending '{}'", line);
        transport
            .send_line(line, &config.line_ending)
            .await
            .map_err(|source| DriverError::WriteFailed {
                line: line.clone(),
                source,
            })?;

        collect_burst(transport, config, platform, &mut dialog, &mut raw).await?;
    }

    let response = DeviceResponse::new(
        request.lines().to_vec(),
        raw,
        config.prompt.clone(),
        start.elapsed(),
        dialog.replies(),
    );
    if response.degraded {
        warn!("execute: transcript is not valid GBK, keeping raw text");
    }
    debug!(
        "execute: {} lines, {} bytes, {} confirmations in {:?}",
        request.len(),
        response.raw_result.len(),
        response.confirmations,
        response.elapsed
    );
    Ok(response)
}

/// Collect output for one command line until its deadline.
async fn collect_burst<S>(
    transport: &mut Transport<S>,
    config: &DeviceConfig,
    platform: &OltPlatform,
    dialog: &mut DialogHandler<'_>,
    raw: &mut Vec<u8>,
) -> Result<(), DriverError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let deadline = Instant::now() + config.timeouts.command;

    loop {
        let wait_until = match config.timeouts.command_idle {
            Some(idle) => cmp::min(deadline, Instant::now() + idle),
            None => deadline,
        };

        let chunk = match transport.read_chunk(wait_until).await {
            Ok(ReadOutcome::Data(chunk)) => chunk,
            Ok(ReadOutcome::Deadline) => return Ok(()),
            Ok(ReadOutcome::Eof) => {
                debug!("execute: device closed the stream");
                return Ok(());
            }
            Ok(ReadOutcome::Cancelled) => {
                return Err(DriverError::Cancelled {
                    phase: Phase::Execute,
                });
            }
            Err(e) => {
                warn!("execute: read error ends burst: {}", e);
                return Ok(());
            }
        };

        raw.extend_from_slice(&chunk);
        for &byte in chunk.iter() {
            if dialog.feed(byte) {
                let reply = &platform.affirmative_reply;
                debug!("execute: confirmation prompt, replying '{}'", reply);
                transport
                    .send_line(reply, &config.line_ending)
                    .await
                    .map_err(|source| DriverError::WriteFailed {
                        line: reply.clone(),
                        source,
                    })?;
            }
        }
    }
}
