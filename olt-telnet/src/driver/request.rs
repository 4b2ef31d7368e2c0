//! Command request type.

/// An ordered, immutable block of command lines.
///
/// Empty and whitespace-only lines are dropped; the remaining lines keep their
/// exact text (leading whitespace included), minus any trailing `\r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    lines: Vec<String>,
}

impl CommandRequest {
    /// Build a request from individual lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|l| l.as_ref().trim_end_matches('\r').to_string())
            .filter(|l| !l.trim().is_empty())
            .collect();
        Self { lines }
    }

    /// Build a request from a multi-line command block.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n'))
    }

    /// The command lines, in send order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of command lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the request holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for CommandRequest {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for CommandRequest {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}
