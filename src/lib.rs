//! **rtport:** the portability core of a language runtime.
//!
//! This crate maps the few OS services a runtime needs onto its execution targets:
//!
//! - thread exit destructors, multiplexed through a single thread-local slot per thread
//!   (`thread_exit`),
//! - backing memory growth for an external allocator, by program break extension or by paged
//!   linear memory growth in the wasm32 sandbox (`brk`, `page`),
//! - plain forwarding of console bytes, bounded formatting, clocks and process control.

#![warn(missing_docs)]

extern crate rtport_shim as shim;

#[macro_use]
mod log;
mod write;

pub mod brk;
pub mod bytes;
pub mod console;
pub mod fail;
pub mod format;
pub mod page;
pub mod process;
pub mod thread_exit;
pub mod time;
pub mod tls;

#[cfg(feature = "ffi")]
pub mod symbols;

pub use brk::more_core;
pub use page::page_size;
pub use thread_exit::register;
