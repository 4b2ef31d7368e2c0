//! TCP transport implementation using tokio.

use std::future::Future;
use std::io;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use log::{trace, warn};
use memchr::memmem;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TransportError};

/// Opens the byte stream a session runs over.
///
/// [`TcpConnector`] dials the device; tests substitute scripted streams.
pub trait Connect: Send + Sync {
    /// The stream type produced by this connector.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Dial `host:port`, giving up after `timeout`.
    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// Connector for plain TCP, the device's cleartext CLI transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connect for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16, limit: Duration) -> Result<TcpStream> {
        let stream = timeout(limit, TcpStream::connect((host, port)))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout: limit,
            })?
            .map_err(|source| TransportError::ConnectionFailed {
                host: host.to_string(),
                port,
                source,
            })?;

        // Command lines are tiny; don't let Nagle hold them back.
        stream.set_nodelay(true).map_err(TransportError::Io)?;
        Ok(stream)
    }
}

/// Result of one deadline-bound read.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes arrived before the deadline.
    Data(Bytes),
    /// The deadline passed with nothing to read.
    Deadline,
    /// The device closed its side of the stream.
    Eof,
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Result of [`Transport::read_until`].
#[derive(Debug)]
pub struct ReadUntil {
    /// Everything read, in arrival order.
    pub data: Vec<u8>,
    /// How the read ended.
    pub end: ReadEnd,
}

/// Why [`Transport::read_until`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEnd {
    /// The marker was found.
    Matched,
    /// The deadline passed first.
    Deadline,
    /// The stream hit EOF first.
    Eof,
    /// The caller cancelled.
    Cancelled,
}

/// A connected byte stream plus the read buffer and cancellation signal.
pub struct Transport<S> {
    stream: S,
    buffer: BytesMut,
    cancel: CancellationToken,
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already connected stream.
    pub fn new(stream: S, cancel: CancellationToken) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            cancel,
        }
    }

    /// Whether the caller has cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Write `line` followed by `ending` and flush.
    pub async fn send_line(&mut self, line: &str, ending: &str) -> io::Result<()> {
        let mut data = Vec::with_capacity(line.len() + ending.len());
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(ending.as_bytes());
        self.stream.write_all(&data).await?;
        self.stream.flush().await
    }

    /// Read whatever arrives next, waiting no later than `deadline`.
    pub async fn read_chunk(&mut self, deadline: Instant) -> io::Result<ReadOutcome> {
        self.buffer.clear();
        let read = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Ok(ReadOutcome::Cancelled),
            read = timeout_at(deadline, self.stream.read_buf(&mut self.buffer)) => read,
        };

        match read {
            Err(_) => Ok(ReadOutcome::Deadline),
            Ok(Ok(0)) => Ok(ReadOutcome::Eof),
            Ok(Ok(n)) => {
                trace!("read {} bytes", n);
                Ok(ReadOutcome::Data(self.buffer.split().freeze()))
            }
            Ok(Err(e)) => Err(e),
        }
    }

    /// Read until `marker` appears in the accumulated data or `deadline` passes.
    ///
    /// With no marker this drains the stream until the deadline. Only the
    /// tail that could still complete the marker is rescanned per chunk.
    pub async fn read_until(
        &mut self,
        marker: Option<&[u8]>,
        deadline: Instant,
    ) -> io::Result<ReadUntil> {
        let mut data = Vec::new();
        let finder = marker.filter(|m| !m.is_empty()).map(memmem::Finder::new);

        loop {
            let chunk = match self.read_chunk(deadline).await? {
                ReadOutcome::Data(chunk) => chunk,
                ReadOutcome::Deadline => return Ok(ReadUntil { data, end: ReadEnd::Deadline }),
                ReadOutcome::Eof => return Ok(ReadUntil { data, end: ReadEnd::Eof }),
                ReadOutcome::Cancelled => {
                    return Ok(ReadUntil { data, end: ReadEnd::Cancelled });
                }
            };

            let overlap = finder.as_ref().map_or(0, |f| f.needle().len() - 1);
            let scan_from = data.len().saturating_sub(overlap);
            data.extend_from_slice(&chunk);

            if let Some(finder) = &finder {
                if finder.find(&data[scan_from..]).is_some() {
                    return Ok(ReadUntil { data, end: ReadEnd::Matched });
                }
            }
        }
    }

    /// Shut the stream down. Errors are logged, never returned.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            warn!("failed to shut down device stream: {}", e);
        }
    }
}
