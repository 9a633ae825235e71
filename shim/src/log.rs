//! The log sink.

use core::fmt::{self, Write};

use crate::buf::BufWriter;
use crate::config;

/// Write a record to the log.
///
/// The record is rendered into a fixed stack buffer, so this never allocates. If the record
/// does not fit, it is cut and ends with `...`.
pub fn write(lv: u8, kind: &str, args: fmt::Arguments, file: &str, line: u32) {
    if lv >= config::MIN_LOG_LEVEL {
        // The buffer. We add some extra slots, which are reserved for overflows. We start out with
        // all dots, so we don't have to set these up later on in case of the buffer being full.
        let mut buffer = [b'.'; config::LOG_BUFFER_SIZE + 4];
        buffer[config::LOG_BUFFER_SIZE + 3] = b'\n';

        // The bytes of the buffer that are filled.
        let filled = {
            let mut writer = BufWriter::new(&mut buffer[..config::LOG_BUFFER_SIZE]);
            let _ = writeln!(writer, "{:10}{} (@ {}:{})", kind, args, file, line);

            if writer.is_truncated() {
                config::LOG_BUFFER_SIZE + 4
            } else {
                writer.filled()
            }
        };

        raw(&buffer[..filled]);
    }
}

/// Write bytes to the log target, bypassing levels and formatting.
///
/// Returns the number of bytes written, or `!0` on failure.
#[cfg(unix)]
pub fn raw(s: &[u8]) -> usize {
    crate::syscalls::write(config::LOG_TARGET, s)
}

/// Write bytes to the log target.
///
/// There is no log target on this platform, so the bytes are dropped.
#[cfg(not(unix))]
pub fn raw(s: &[u8]) -> usize {
    s.len()
}
