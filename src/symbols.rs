//! C symbols.
//!
//! These expose the layer to a runtime written in another language, with sentinels in place of
//! `Option` and `Result`.

use std::{cmp, slice};

use crate::{brk, console, page, process, thread_exit, time};

/// Grow the backing region, returning the old top or `MFAIL`.
///
/// # Safety
///
/// See `brk::more_core`.
#[no_mangle]
pub unsafe extern "C" fn rtport_more_core(delta: isize) -> *mut u8 {
    brk::more_core(delta).unwrap_or(brk::MFAIL)
}

/// The page size, in bytes.
#[no_mangle]
pub extern "C" fn rtport_page_size() -> usize {
    page::page_size()
}

/// Register a destructor to run with `arg` when the current thread exits.
///
/// # Safety
///
/// See `thread_exit::register`.
#[no_mangle]
pub unsafe extern "C" fn rtport_on_thread_exit(dtor: thread_exit::Destructor, arg: *mut u8) {
    thread_exit::register(dtor, arg);
}

/// Write `size` bytes to the standard output.
///
/// # Safety
///
/// `bytes` must be valid for reads of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rtport_console_write(bytes: *const u8, size: u32) {
    if !bytes.is_null() {
        let _ = console::write_out(slice::from_raw_parts(bytes, size as usize));
    }
}

/// Write `size` bytes to the standard error.
///
/// # Safety
///
/// `bytes` must be valid for reads of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rtport_console_error(bytes: *const u8, size: u32) {
    if !bytes.is_null() {
        let _ = console::write_err(slice::from_raw_parts(bytes, size as usize));
    }
}

/// Read a line from the standard input into `buf`, zero-terminated.
///
/// Returns the length of the line, or `-1` at the end of the stream.
///
/// # Safety
///
/// `buf` must be valid for writes of `max_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rtport_console_read(buf: *mut u8, max_size: u32) -> i32 {
    if buf.is_null() {
        return -1;
    }

    match console::read_line(slice::from_raw_parts_mut(buf, read_window(max_size))) {
        // Lines are shorter than the window, so they fit.
        Some(length) => length as i32,
        None => -1,
    }
}

/// The part of a read buffer of `max_size` bytes that may be filled.
///
/// Line lengths are reported as `i32`, so the window holds at most `i32::MAX` bytes besides the
/// terminator.
fn read_window(max_size: u32) -> usize {
    cmp::min(max_size as usize, i32::MAX as usize + 1)
}

/// Abort the process.
#[no_mangle]
pub extern "C" fn rtport_abort() -> ! {
    process::abort()
}

/// Exit the process with `status`.
#[no_mangle]
pub extern "C" fn rtport_exit(status: i32) -> ! {
    process::exit(status)
}

/// Milliseconds since the epoch.
#[no_mangle]
pub extern "C" fn rtport_time_millis() -> u64 {
    time::now_millis()
}

/// Microseconds since the epoch.
#[no_mangle]
pub extern "C" fn rtport_time_micros() -> u64 {
    time::now_micros()
}

/// Nanoseconds since the epoch.
#[no_mangle]
pub extern "C" fn rtport_time_nanos() -> u64 {
    time::now_nanos()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_size() {
        assert_eq!(rtport_page_size(), page::page_size());
    }

    #[test]
    fn test_negative_growth() {
        unsafe {
            assert_eq!(rtport_more_core(-4096), brk::MFAIL);
        }
    }

    #[test]
    fn test_read_window() {
        assert_eq!(read_window(0), 0);
        assert_eq!(read_window(80), 80);
        assert_eq!(read_window(i32::MAX as u32 + 1), i32::MAX as usize + 1);
        assert_eq!(read_window(u32::MAX), i32::MAX as usize + 1);
    }

    #[test]
    fn test_null_buffers() {
        unsafe {
            rtport_console_write(std::ptr::null(), 4);
            rtport_console_error(std::ptr::null(), 4);
            assert_eq!(rtport_console_read(std::ptr::null_mut(), 4), -1);
        }
    }
}
