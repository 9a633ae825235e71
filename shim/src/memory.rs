//! The linear memory of the wasm32 sandbox.
//!
//! Sizes are counted in 64 KiB pages.

use core::arch::wasm32;

/// The current size of memory 0, in pages.
pub fn size() -> usize {
    wasm32::memory_size(0)
}

/// Grow memory 0 by `delta` pages.
///
/// Returns the previous size in pages, or `!0` if the sandbox refused to grow.
pub fn grow(delta: usize) -> usize {
    wasm32::memory_grow(0, delta)
}
