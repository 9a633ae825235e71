//! The thread-local slot.
//!
//! Every thread owns exactly one slot, holding its destructor chain. The slot lives in native
//! thread-local storage, whose once-per-thread initialization replaces a global init guard:
//! touching the slot is enough to set it up, and to bind the thread exit dispatcher to it.
//!
//! The slot is never seen by any other thread.

use std::cell::Cell;
use std::ptr;

use crate::thread_exit::{self, Chain};

/// A thread's slot.
///
/// Dropping it is what runs the thread's destructors, when the host tears down the thread's
/// locals.
struct Slot {
    /// The destructor chain of this thread.
    chain: Chain,
}

impl Slot {
    /// Create an empty slot.
    const fn new() -> Slot {
        Slot {
            chain: Chain::new(),
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        DRAINING.with(|draining| draining.set(&self.chain));

        thread_exit::dispatch(&self.chain);

        DRAINING.with(|draining| draining.set(ptr::null()));
    }
}

thread_local! {
    /// The slot of this thread.
    static SLOT: Slot = const { Slot::new() };

    /// The chain currently being drained on this thread, or null.
    ///
    /// Once the host starts tearing the slot down, it cannot be reached through `SLOT` anymore.
    /// Destructors registering further destructors find the chain through this instead. It has
    /// no destructor itself, so it stays reachable for the whole life of the thread.
    static DRAINING: Cell<*const Chain> = const { Cell::new(ptr::null()) };
}

/// Make sure the slot of the current thread exists, and is bound to the dispatcher.
///
/// Calling this again, from any thread, is a no-op.
#[inline]
pub fn ensure_initialized() {
    // Once the slot is torn down this fails, which `with` reports on the next access.
    let _ = SLOT.try_with(|_| ());
}

/// Run `f` on the chain of the current thread.
///
/// While the thread is exiting, this reaches the chain being drained. `Err(())` is returned if
/// the chain is gone for good, i.e. the thread's destructors already ran.
pub(crate) fn with<R, F: FnOnce(&Chain) -> R>(f: F) -> Result<R, ()> {
    let chain = match SLOT.try_with(|slot| &slot.chain as *const Chain) {
        Ok(chain) => chain,
        Err(_) => DRAINING.with(Cell::get),
    };

    if chain.is_null() {
        Err(())
    } else {
        // Either the live slot of this thread, or the one being dropped on this very thread.
        // Both outlive the call, as this thread cannot tear down its locals in the meantime.
        Ok(f(unsafe { &*chain }))
    }
}
