//! Response type for command execution results.

use std::time::Duration;

use crate::channel::transcode;

/// Response from executing one [`CommandRequest`](super::CommandRequest).
#[derive(Debug, Clone)]
pub struct DeviceResponse {
    /// The command lines that were sent.
    pub commands: Vec<String>,

    /// The decoded transcript of everything the device sent back.
    pub result: String,

    /// The raw bytes, in arrival order.
    pub raw_result: Vec<u8>,

    /// The authenticated prompt substring of the session.
    pub prompt: String,

    /// Time taken to execute the request.
    pub elapsed: Duration,

    /// Confirmation dialogs answered during execution.
    pub confirmations: usize,

    /// Whether the transcript failed to decode as GBK and kept raw text.
    pub degraded: bool,
}

impl DeviceResponse {
    /// Build a response, decoding the raw bytes as a whole so multi-byte
    /// characters split across reads come out intact.
    pub fn new(
        commands: Vec<String>,
        raw_result: Vec<u8>,
        prompt: impl Into<String>,
        elapsed: Duration,
        confirmations: usize,
    ) -> Self {
        let decoded = transcode(&raw_result);
        let degraded = decoded.is_degraded();
        let result = decoded.into_text().into_owned();
        Self {
            commands,
            result,
            raw_result,
            prompt: prompt.into(),
            elapsed,
            confirmations,
            degraded,
        }
    }

    /// The transcript without echoed command lines and prompt lines.
    pub fn output(&self) -> String {
        self.result
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| self.prompt.is_empty() || !line.contains(self.prompt.as_str()))
            .filter(|line| !self.commands.iter().any(|c| c.trim() == line.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the transcript lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the transcript contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for DeviceResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
