//! Symbols and primitives that `rtport` depends on.
//!
//! This crate provides the raw platform layer: the program break, the page size, direct writes
//! to the standard descriptors and the paged linear memory of the wasm32 sandbox.

#![no_std]
#![warn(missing_docs)]

pub mod buf;
pub mod config;
pub mod log;
pub mod syscalls;

#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_arch = "wasm32")]
pub mod memory;
