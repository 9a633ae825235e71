//! Clocks.
//!
//! Time is measured since the Unix epoch, from the best clock the target has. In the wasm32
//! sandbox that is a host clock with millisecond precision, which the embedder installs with
//! `set_clock`. The finer units are then derived from the milliseconds.

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use std::sync::atomic::{self, AtomicPtr};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use std::{mem, ptr};

/// The time elapsed since the epoch.
///
/// A clock set before the epoch reads as the epoch.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn since_epoch() -> Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO)
}

/// A duration in milliseconds, in microseconds, and in nanoseconds.
///
/// Each saturates at `u64::MAX`.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn units(elapsed: Duration) -> (u64, u64, u64) {
    let clamp = |x: u128| u64::try_from(x).unwrap_or(u64::MAX);

    (
        clamp(elapsed.as_millis()),
        clamp(elapsed.as_micros()),
        clamp(elapsed.as_nanos()),
    )
}

/// Milliseconds since the epoch.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn now_millis() -> u64 {
    units(since_epoch()).0
}

/// Microseconds since the epoch.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn now_micros() -> u64 {
    units(since_epoch()).1
}

/// Nanoseconds since the epoch.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn now_nanos() -> u64 {
    units(since_epoch()).2
}

/// The host clock, or null.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
static CLOCK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Install the host clock.
///
/// The clock reports milliseconds since the epoch. Until one is installed, time stands still at
/// zero.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn set_clock(clock: fn() -> u64) {
    CLOCK.store(clock as *mut (), atomic::Ordering::SeqCst);
}

/// Milliseconds since the epoch.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn now_millis() -> u64 {
    let clock = CLOCK.load(atomic::Ordering::SeqCst);

    if clock.is_null() {
        0
    } else {
        unsafe { mem::transmute::<*mut (), fn() -> u64>(clock)() }
    }
}

/// Microseconds since the epoch, at millisecond precision.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn now_micros() -> u64 {
    now_millis().saturating_mul(1_000)
}

/// Nanoseconds since the epoch, at millisecond precision.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn now_nanos() -> u64 {
    now_millis().saturating_mul(1_000_000)
}
