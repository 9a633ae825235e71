//! Thread exit destructors.
//!
//! Runtime subsystems register cleanup callbacks on the current thread. When the thread ends,
//! they run on that same thread, exactly once each, most recent first, so resources are released
//! in reverse dependency order.
//!
//! All of a thread's registrations share the single thread-local slot of `tls`, where they form
//! the thread's chain. Chains are private to their thread.
//!
//! # Reentrancy
//!
//! A destructor may register further destructors while the chain is draining. These join the
//! draining chain, and run next. Registering once the chain is gone for good (i.e. from a
//! thread-local destructor that runs after the dispatch finished) aborts the process, since the
//! cleanup could never run.
//!
//! # The main thread
//!
//! Like any native thread-local, the chain of the main thread is not guaranteed to be drained
//! when the process exits.

use std::cell::RefCell;

use shim::config;

use crate::{fail, tls};

/// A thread destructor.
///
/// It gets the context pointer it was registered with.
pub type Destructor = unsafe extern "C" fn(*mut u8);

/// A registered destructor, and its context.
#[derive(Clone, Copy)]
struct Entry {
    /// The callback.
    dtor: Destructor,
    /// The context. The chain never looks at it.
    arg: *mut u8,
}

/// A destructor chain.
///
/// This is a stack: the top is the most recent registration.
pub struct Chain {
    /// The entries, oldest first.
    entries: RefCell<Vec<Entry>>,
}

impl Chain {
    /// Create an empty chain.
    pub(crate) const fn new() -> Chain {
        Chain {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Push an entry on top of the chain.
    ///
    /// # Failure
    ///
    /// Losing an entry is not an option, so this calls the OOM handler if it cannot make room.
    fn push(&self, entry: Entry) {
        let mut entries = self.entries.borrow_mut();

        if entries.len() == entries.capacity() {
            let additional = if entries.capacity() == 0 {
                config::CHAIN_INITIAL_CAPACITY
            } else {
                entries.capacity()
            };

            if entries.try_reserve(additional).is_err() {
                fail::oom();
            }
        }

        entries.push(entry);
    }

    /// Pop the most recent entry.
    fn pop(&self) -> Option<Entry> {
        self.entries.borrow_mut().pop()
    }

    /// Empty the chain, and release its memory.
    fn reset(&self) {
        *self.entries.borrow_mut() = Vec::new();
    }

    /// The number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Is the chain empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Register a thread destructor.
///
/// This will add a destructor to _the current thread_, which will be called with `arg` when the
/// thread exits. Destructors run in reverse registration order.
///
/// # Failure
///
/// This never fails. Running out of memory while recording the destructor calls the OOM handler,
/// and registering after the thread's destructors already ran aborts.
///
/// # Safety
///
/// `dtor` must be safe to call with `arg` on this thread at exit. The pointee of `arg` is the
/// caller's business: it must stay valid until the destructor ran.
pub unsafe fn register(dtor: Destructor, arg: *mut u8) {
    tls::ensure_initialized();

    let entry = Entry { dtor, arg };
    if tls::with(|chain| chain.push(entry)).is_err() {
        fail::abort_with("thread destructor registered after the thread's destructors ran");
    }

    log!(CALL, "Registered thread destructor with context {:p}.", arg);
}

/// The number of destructors waiting for the current thread to exit.
pub fn pending() -> usize {
    tls::with(Chain::len).unwrap_or(0)
}

/// Run a thread's destructors.
///
/// This drains `chain` to the end, most recent first, releasing each entry as its destructor
/// returns. Entries pushed by the destructors themselves are drained too. The chain is empty
/// afterwards.
///
/// This is only called by the host, when it tears down the thread's slot.
pub(crate) fn dispatch(chain: &Chain) {
    let mut ran = 0usize;

    // The borrow must be released before the destructor runs, as it may register more.
    while let Some(entry) = chain.pop() {
        unsafe {
            (entry.dtor)(entry.arg);
        }

        ran += 1;
    }

    chain.reset();

    log!(DEBUG, "Ran {} thread destructors.", ran);
}
