//! Bounded buffer writing.

use core::{cmp, fmt};

/// A truncating buffer writer.
///
/// This keeps track of how much of the buffer is filled. Anything that does not fit is dropped,
/// and writing never fails, so a `write!` into it always runs to completion.
pub struct BufWriter<'a> {
    /// The underlying buffer.
    buffer: &'a mut [u8],
    /// The number of bytes filled so far.
    filled: usize,
    /// Was anything dropped?
    truncated: bool,
}

impl<'a> BufWriter<'a> {
    /// Create a writer filling `buffer` from the start.
    pub fn new(buffer: &'a mut [u8]) -> BufWriter<'a> {
        BufWriter {
            buffer,
            filled: 0,
            truncated: false,
        }
    }

    /// Append raw bytes, keeping only what fits.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        // Find the appropriate length of the copied subbuffer.
        let amt = cmp::min(bytes.len(), self.buffer.len() - self.filled);
        self.buffer[self.filled..self.filled + amt].copy_from_slice(&bytes[..amt]);
        self.filled += amt;

        if amt < bytes.len() {
            self.truncated = true;
        }
    }

    /// The number of bytes written into the buffer.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Whether some output did not fit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> fmt::Write for BufWriter<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());

        Ok(())
    }
}

/// Cut bytes into zero-terminated records.
///
/// Zero bytes end a record, and records longer than `buffer.len() - 1` bytes are split. Each
/// non-empty record is copied into `buffer`, terminated, and handed to `emit` (terminator
/// included). An empty `buffer` emits nothing.
pub fn c_records<F: FnMut(&[u8])>(bytes: &[u8], buffer: &mut [u8], mut emit: F) {
    let room = match buffer.len().checked_sub(1) {
        Some(0) | None => return,
        Some(room) => room,
    };

    for segment in bytes.split(|&b| b == 0) {
        for chunk in segment.chunks(room) {
            buffer[..chunk.len()].copy_from_slice(chunk);
            buffer[chunk.len()] = 0;

            emit(&buffer[..chunk.len() + 1]);
        }
    }
}
