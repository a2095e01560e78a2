//! Newline framing for the daemon's TCP stream.
//!
//! TCP is a *stream* protocol: a single `read()` may return half a line, or
//! several lines at once.  [`LineBuffer`] accumulates received bytes and hands
//! back complete lines one at a time.

use thiserror::Error;

/// Longest line accepted before the buffer gives up and resynchronises.
///
/// Matches the daemon's 512-byte receive buffer; real lines are ~40 bytes.
pub const MAX_LINE_LEN: usize = 512;

/// Errors reported by [`LineBuffer`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Bytes were dropped because no newline arrived within [`MAX_LINE_LEN`].
    #[error("line exceeded {max} bytes without a terminator; {dropped} bytes dropped")]
    LineTooLong { max: usize, dropped: usize },
}

/// Accumulates stream bytes and yields complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Set while skipping the tail of an over-long line.
    discarding: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly received bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::LineTooLong`] when the pending partial line
    /// exceeds [`MAX_LINE_LEN`]; the partial line is dropped and everything up
    /// to the next newline is skipped.  Complete lines already buffered are
    /// kept.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), FramingError> {
        let bytes = if self.discarding {
            match bytes.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.discarding = false;
                    &bytes[pos + 1..]
                }
                None => return Ok(()),
            }
        } else {
            bytes
        };
        self.buf.extend_from_slice(bytes);

        let tail_start = self
            .buf
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let tail_len = self.buf.len() - tail_start;
        if tail_len > MAX_LINE_LEN {
            self.buf.truncate(tail_start);
            self.discarding = true;
            return Err(FramingError::LineTooLong {
                max: MAX_LINE_LEN,
                dropped: tail_len,
            });
        }
        Ok(())
    }

    /// Removes and returns the next complete line without its terminator.
    ///
    /// Blank lines are skipped.  Invalid UTF-8 is replaced lossily; the
    /// parser rejects whatever that produces.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let pos = self.buf.iter().position(|&b| b == b'\n')?;
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                return Some(line.to_string());
            }
        }
    }

    /// Bytes of the incomplete trailing line still waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drops any partial data, e.g. after the connection was lost.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}
