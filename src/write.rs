//! Direct shim-based write for logging.
//!
//! Records go straight to the log target through a non-allocating writer, so logging is safe
//! from thread destructors and from out-of-memory paths.

use std::fmt;
#[cfg(feature = "log")]
use std::sync::Mutex;

/// The log lock.
///
/// This lock is used to avoid bungling and intertwining the log.
#[cfg(feature = "log")]
static LOG_LOCK: Mutex<()> = Mutex::new(());

/// Write a record to the log.
///
/// Without the `log` feature this is a no-op.
pub fn record(lv: u8, kind: &str, args: fmt::Arguments, file: &str, line: u32) {
    #[cfg(feature = "log")]
    {
        // A panic while holding the lock leaves the log usable.
        let _guard = LOG_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shim::log::write(lv, kind, args, file, line);
    }

    #[cfg(not(feature = "log"))]
    let _ = (lv, kind, args, file, line);
}

/// Write a message straight to the log target, whatever the features.
///
/// This is for the last words before the process dies.
pub fn emergency(s: &str) {
    shim::log::raw(s.as_bytes());
}
