//! Process control.

use std::sync::atomic::{self, AtomicPtr};
use std::{mem, process, ptr};

/// The exit hook, or null for the native exit.
static EXIT_HOOK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Terminate the process abnormally, right away.
///
/// Nothing is unwound, and no thread destructors are guaranteed to run.
#[inline]
pub fn abort() -> ! {
    log!(CALL, "Aborting.");

    process::abort()
}

/// Terminate the process normally, with `status` as the exit code.
///
/// This goes through the exit hook, if one is installed.
#[inline]
pub fn exit(status: i32) -> ! {
    log!(CALL, "Exiting with status {}.", status);

    let hook = EXIT_HOOK.load(atomic::Ordering::SeqCst);
    if hook.is_null() {
        process::exit(status)
    } else {
        unsafe { mem::transmute::<*mut (), fn(i32) -> !>(hook)(status) }
    }
}

/// Install the exit hook.
///
/// `exit` hands its status to `hook` from then on. The wasm32 sandbox cannot exit by itself (the
/// native exit traps there), so the embedder installs a hook reporting the status to the host.
#[inline]
pub fn set_exit_hook(hook: fn(i32) -> !) {
    EXIT_HOOK.store(hook as *mut (), atomic::Ordering::SeqCst);
}

#[cfg(test)]
mod test {
    use super::*;

    use std::panic;

    fn unwind(status: i32) -> ! {
        panic::panic_any(status)
    }

    #[test]
    fn test_exit_hook() {
        set_exit_hook(unwind);

        let status = panic::catch_unwind(|| exit(42)).unwrap_err();

        assert_eq!(status.downcast_ref::<i32>(), Some(&42));
    }
}
