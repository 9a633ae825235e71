//! Console byte forwarding.
//!
//! Bytes go to the console verbatim: no encoding transform, embedded zero bytes included, and the
//! byte count is authoritative.

use std::io::{self, BufRead};
use std::sync::atomic::{self, AtomicPtr};
use std::{cmp, mem, ptr};

/// A console sink.
///
/// It gets the stream and the bytes to write, and reports whether all of them were written.
pub type Sink = fn(Stream, &[u8]) -> Result<(), ()>;

/// The installed sink, or null for the native streams.
static SINK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Set up the console.
///
/// None of the supported targets need any setup, but the runtime calls this before its first
/// console output.
#[inline]
pub fn init() {
    log!(CALL, "Console initialized.");
}

/// Install a console sink.
///
/// All console output goes to `sink` from then on, instead of the native streams. The wasm32
/// sandbox has no streams of its own, so the embedder installs a sink forwarding to the host
/// there.
#[inline]
pub fn set_sink(sink: Sink) {
    SINK.store(sink as *mut (), atomic::Ordering::SeqCst);
}

/// Write bytes to the standard output.
pub fn write_out(bytes: &[u8]) -> Result<(), ()> {
    write(Stream::Out, bytes)
}

/// Write bytes to the standard error.
pub fn write_err(bytes: &[u8]) -> Result<(), ()> {
    write(Stream::Err, bytes)
}

/// Write bytes to a stream, through the installed sink if any.
fn write(stream: Stream, bytes: &[u8]) -> Result<(), ()> {
    let sink = SINK.load(atomic::Ordering::SeqCst);

    if sink.is_null() {
        write_all(stream, bytes)
    } else {
        unsafe { mem::transmute::<*mut (), Sink>(sink)(stream, bytes) }
    }
}

/// A console output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    /// The standard output.
    Out,
    /// The standard error.
    Err,
}

/// Write all of `bytes` to a stream, going to the system log.
///
/// The output streams of Android apps lead nowhere. Standard output is logged at the info
/// priority, and standard error at the error priority.
#[cfg(target_os = "android")]
fn write_all(stream: Stream, bytes: &[u8]) -> Result<(), ()> {
    use shim::android;

    let priority = match stream {
        Stream::Out => android::PRIORITY_INFO,
        Stream::Err => android::PRIORITY_ERROR,
    };

    if android::write(priority, bytes) {
        Ok(())
    } else {
        Err(())
    }
}

/// Write all of `bytes` to a stream, going straight to its descriptor.
#[cfg(all(unix, not(target_os = "android")))]
fn write_all(stream: Stream, mut bytes: &[u8]) -> Result<(), ()> {
    let fd = match stream {
        Stream::Out => libc::STDOUT_FILENO,
        Stream::Err => libc::STDERR_FILENO,
    };

    while !bytes.is_empty() {
        let written = shim::syscalls::write(fd, bytes);

        if written == !0 {
            if io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }

            return Err(());
        } else if written == 0 {
            return Err(());
        }

        bytes = &bytes[written..];
    }

    Ok(())
}

/// Write all of `bytes` to a stream, through the standard library.
#[cfg(not(unix))]
fn write_all(stream: Stream, bytes: &[u8]) -> Result<(), ()> {
    use std::io::Write;

    let res = match stream {
        Stream::Out => io::stdout().write_all(bytes).and_then(|()| io::stdout().flush()),
        Stream::Err => io::stderr().write_all(bytes),
    };

    res.map_err(|_| ())
}

/// Read a line from the standard input.
///
/// See `read_line_from`. Targets without a standard input always report the end of the stream.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn read_line(buf: &mut [u8]) -> Option<usize> {
    read_line_from(&mut io::stdin().lock(), buf)
}

/// Read a line from the standard input.
///
/// There is no standard input in the sandbox, so this is always the end of the stream.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn read_line(_buf: &mut [u8]) -> Option<usize> {
    None
}

/// Read a line from `reader` into `buf`.
///
/// At most `buf.len() - 1` bytes are read, stopping after a newline or at the end of the stream.
/// Trailing CR and LF bytes are then stripped, and a zero byte is stored right after the line.
/// The length of the stripped line is returned.
///
/// `None` means the end of the stream was hit before anything was read, or the read failed. An
/// empty buffer is also `None`, while a single byte buffer holds nothing but the terminator.
pub fn read_line_from<R: BufRead + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Option<usize> {
    // Keep a byte for the terminator.
    let limit = buf.len().checked_sub(1)?;
    let mut length = 0;

    while length < limit {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return None,
        };

        if available.is_empty() {
            // End of stream.
            if length == 0 {
                return None;
            }

            break;
        }

        let take = cmp::min(available.len(), limit - length);
        let (amt, newline) = match available[..take].iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (take, false),
        };

        buf[length..length + amt].copy_from_slice(&available[..amt]);
        reader.consume(amt);
        length += amt;

        if newline {
            break;
        }
    }

    while length > 0 && matches!(buf[length - 1], b'\n' | b'\r') {
        length -= 1;
    }
    buf[length] = 0;

    Some(length)
}
