//! Rolling fragment buffer for dialog detection.
//!
//! The fragment holds the bytes seen since the last line terminator (or the
//! last explicit reset). It is only ever used for pattern matching; the full
//! response is kept separately. Growth is bounded by `depth`: once the cap is
//! reached the oldest half is dropped, so a device that never prints a newline
//! cannot make it grow without limit.

/// Buffer of the current, unterminated output line.
#[derive(Debug)]
pub struct FragmentBuffer {
    /// Bytes since the last reset.
    buffer: Vec<u8>,

    /// Maximum number of bytes kept.
    depth: usize,
}

impl FragmentBuffer {
    /// Create a fragment buffer holding at most `depth` bytes.
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            buffer: Vec::with_capacity(depth.min(1024)),
            depth,
        }
    }

    /// Append one byte. A `\n` clears the fragment instead of being stored.
    ///
    /// Returns `true` when the byte was a line terminator.
    pub fn push(&mut self, byte: u8) -> bool {
        if byte == b'\n' {
            self.buffer.clear();
            return true;
        }
        if self.buffer.len() == self.depth {
            let keep_from = self.depth / 2;
            self.buffer.drain(..keep_from);
        }
        self.buffer.push(byte);
        false
    }

    /// Whether the fragment currently ends with `needle`.
    ///
    /// Checked after every push, this sees each occurrence exactly when its
    /// last byte arrives.
    pub fn ends_with(&self, needle: &[u8]) -> bool {
        !needle.is_empty() && self.buffer.ends_with(needle)
    }

    /// Whether any of `needles` ends the fragment.
    pub fn ends_with_any<S: AsRef<[u8]>>(&self, needles: &[S]) -> bool {
        needles.iter().any(|n| self.ends_with(n.as_ref()))
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the depth setting.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for FragmentBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
