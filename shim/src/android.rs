//! The Android log.
//!
//! Standard output and error lead nowhere on Android, so console bytes go to the system log.

use core::ffi::c_char;

use crate::buf;
use crate::config;

/// The log priority of standard output.
pub const PRIORITY_INFO: i32 = 4;
/// The log priority of standard error.
pub const PRIORITY_ERROR: i32 = 6;

#[link(name = "log")]
extern "C" {
    fn __android_log_write(prio: libc::c_int, tag: *const c_char, text: *const c_char) -> libc::c_int;
}

/// Write bytes to the Android log at `priority`.
///
/// Log records are C strings, so the bytes are cut at zero bytes and at `ANDROID_LOG_CHUNK`.
/// Returns `false` if the log refused a record.
pub fn write(priority: i32, bytes: &[u8]) -> bool {
    let mut buffer = [0u8; config::ANDROID_LOG_CHUNK];
    let mut ok = true;

    buf::c_records(bytes, &mut buffer, |record| {
        let res = unsafe {
            __android_log_write(
                priority,
                config::ANDROID_LOG_TAG.as_ptr() as *const c_char,
                record.as_ptr() as *const c_char,
            )
        };

        if res < 0 {
            ok = false;
        }
    });

    ok
}
