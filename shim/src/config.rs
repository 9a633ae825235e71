//! Configuration.
//!
//! This module contains anything which can be tweaked and customized to the users preferences.

/// The minimum log level.
///
/// Records below this level are dropped. The default hides internal records.
pub const MIN_LOG_LEVEL: u8 = 2;

/// The log target.
///
/// This points to stderr, but could be changed arbitrarily.
pub const LOG_TARGET: i32 = 2;

/// The size of the log buffer.
///
/// Records longer than this are cut, and end with `...` to show that there was more.
pub const LOG_BUFFER_SIZE: usize = 256;

/// The capacity of the formatting scratch buffer.
///
/// Rendered text beyond this is dropped.
pub const SCRATCH_SIZE: usize = 1024;

/// The page size exponent of the wasm32 linear memory.
pub const WASM_PAGE_SHIFT: u32 = 16;
/// The page size of the wasm32 linear memory (64 KiB).
pub const WASM_PAGE_SIZE: usize = 1 << WASM_PAGE_SHIFT;

/// The page size assumed when the host cannot tell.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// The number of destructor entries a thread reserves on its first registration.
pub const CHAIN_INITIAL_CAPACITY: usize = 4;

/// The tag of console records in the Android log.
///
/// This must be zero-terminated.
pub const ANDROID_LOG_TAG: &[u8] = b"rtport\0";
/// The size of the buffer console bytes are cut into for the Android log, terminator included.
pub const ANDROID_LOG_CHUNK: usize = 1024;
