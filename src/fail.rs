//! General error handling.

use std::sync::atomic::{self, AtomicPtr};
use std::{mem, process, ptr};

use crate::write;

/// The OOM handler, or null for the default one.
static OOM_HANDLER: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// The default OOM handler.
///
/// This will log a message and abort the process.
#[cold]
fn default_oom_handler() -> ! {
    write::emergency("\x1b[31;1mThe runtime ran out of memory. Aborting.\x1b[m\n");

    process::abort();
}

/// Call the OOM handler.
///
/// This is used on out-of-memory errors, and will never return. Usually, it simply consists
/// of aborting the process.
///
/// # An important note
///
/// This is for bookkeeping that cannot be allowed to fail, such as recording a thread
/// destructor. Failing to grow the backing region is _not_ an OOM condition here: that is
/// reported to the allocator, which decides.
#[cold]
pub fn oom() -> ! {
    log!(ERROR, "Out of memory.");

    let handler = OOM_HANDLER.load(atomic::Ordering::SeqCst);
    if handler.is_null() {
        default_oom_handler()
    } else {
        unsafe { mem::transmute::<*mut (), fn() -> !>(handler)() }
    }
}

/// Set the OOM handler.
///
/// This is called when the process is out-of-memory.
#[inline]
pub fn set_oom_handler(handler: fn() -> !) {
    OOM_HANDLER.store(handler as *mut (), atomic::Ordering::SeqCst);
}

/// Abort the process with a message.
///
/// This is for broken runtime invariants, where carrying on would be worse than dying.
#[cold]
pub fn abort_with(msg: &str) -> ! {
    log!(ERROR, "{}", msg);

    write::emergency("\x1b[31;1mFatal runtime error: ");
    write::emergency(msg);
    write::emergency(". Aborting.\x1b[m\n");

    process::abort();
}
