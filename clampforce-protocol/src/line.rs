//! Line framing for the host serial link.
//!
//! Line format:
//! - ASCII payload, at most `MAX_LINE_LEN` bytes
//! - Terminated by `\r` or `\n`; a `\r\n` pair ends one line and the
//!   empty remainder is dropped

use heapless::Vec;

/// Maximum accepted line length in bytes, excluding the terminator
pub const MAX_LINE_LEN: usize = 64;

/// A complete line without its terminator
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while framing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN` and was discarded up to its terminator
    Overflow,
}

/// Accumulates incoming bytes into terminated lines
#[derive(Debug, Clone)]
pub struct LineBuffer {
    buffer: Line,
    /// Current line overflowed, skip until the terminator
    discarding: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes buffered for the current line
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no partial line is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && !self.discarding
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is terminated,
    /// `Ok(None)` when more bytes are needed, or `Err(Overflow)` when the
    /// terminator of an over-long line arrives.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if is_terminator(byte) {
            if self.discarding {
                self.reset();
                return Err(LineError::Overflow);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(core::mem::take(&mut self.buffer)));
        }

        if !self.discarding && self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
        }
        Ok(None)
    }
}
