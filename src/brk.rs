//! Backing memory growth.
//!
//! An external allocator calls into this module whenever it needs more backing memory. The
//! backing region only ever grows: its top moves forward, never back.
//!
//! How the region grows is fixed per build target. Hosted unix targets extend the program break,
//! the wasm32 sandbox grows its linear memory page by page, and everything else reports failure.
//! `Native` names the strategy of the current target.
//!
//! # Synchronization
//!
//! Nothing in here is synchronized. Concurrent calls to `request_growth` or `more_core` from
//! several threads are undefined behavior: the allocator consuming this module must serialize
//! every call itself, typically under its own global lock.

use std::sync::atomic::{self, AtomicPtr};
use std::{mem, ptr};

use crate::page;

/// The failure address.
///
/// This is what the C entry point hands out when the region cannot grow.
pub const MFAIL: *mut u8 = !0usize as *mut u8;

/// The observer notified after the paged memory grew, or null.
static GROW_OBSERVER: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// A backing region that can grow.
///
/// This is the capability each target implements once.
pub trait Backing {
    /// The granularity of growth, in bytes.
    ///
    /// This must be a power of two.
    fn page_size(&self) -> usize;

    /// The current top of the region.
    ///
    /// This is derived from the platform on every call. Nothing is cached.
    fn top(&self) -> Result<*mut u8, ()>;

    /// Extend the region by exactly `size` bytes, and return the old top.
    ///
    /// On failure the region is left unchanged.
    ///
    /// # Safety
    ///
    /// `size` must be a non-zero multiple of `page_size`, and the caller must hold whatever lock
    /// serializes growth of this region.
    unsafe fn extend(&mut self, size: usize) -> Result<*mut u8, ()>;
}

/// Request the region to grow by `delta` bytes.
///
/// - `delta > 0` grows the region by `delta` rounded up to the page size, and returns the old
///   top. The caller may use `[old, old + delta)`.
/// - `delta == 0` returns the current top, and has no side effects.
/// - `delta < 0` always fails. Shrinking is unsupported.
///
/// # Failure
///
/// If the platform cannot grow any further, `Err(())` is returned and the region is unchanged.
/// Whether that is fatal is up to the caller.
///
/// # Safety
///
/// Calls must be serialized. See the module documentation.
pub unsafe fn request_growth<B: Backing>(backing: &mut B, delta: isize) -> Result<*mut u8, ()> {
    if delta < 0 {
        log!(DEBUG, "Refusing to shrink the backing region (delta {}).", delta);
        return Err(());
    }

    if delta == 0 {
        return backing.top();
    }

    // The rounding is failable to avoid arithmetic overflow-based attacks.
    let size = page::align_up(delta as usize, backing.page_size()).ok_or(())?;

    log!(NOTE, "Growing the backing region by {} bytes ({} requested).", size, delta);

    let res = backing.extend(size);
    if res.is_err() {
        log!(WARNING, "Unable to grow the backing region by {} bytes.", size);
    }

    res
}

/// Grow the backing region of this target.
///
/// This is `request_growth` on the `Native` strategy.
///
/// # Safety
///
/// Calls must be serialized. See the module documentation.
#[inline]
pub unsafe fn more_core(delta: isize) -> Result<*mut u8, ()> {
    request_growth(&mut Native::default(), delta)
}

/// Set the observer of paged memory growth.
///
/// After every successful grow of a `LinearMemory`, the observer is called with the new size of
/// the memory in bytes, so subsystems caching that size can refresh it.
#[inline]
pub fn set_grow_observer(observer: fn(usize)) {
    GROW_OBSERVER.store(observer as *mut (), atomic::Ordering::SeqCst);
}

/// Call the observer of paged memory growth, if any.
fn notify_grow(size: usize) {
    let observer = GROW_OBSERVER.load(atomic::Ordering::SeqCst);

    if !observer.is_null() {
        unsafe { mem::transmute::<*mut (), fn(usize)>(observer)(size) }
    }
}

/// Classic process heap extension through the program break.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgramBreak;

#[cfg(unix)]
impl Backing for ProgramBreak {
    #[inline]
    fn page_size(&self) -> usize {
        page::page_size()
    }

    fn top(&self) -> Result<*mut u8, ()> {
        // Moving the break by zero is a pure query.
        let top = unsafe { shim::syscalls::sbrk(0) };

        if top == MFAIL {
            Err(())
        } else {
            Ok(top)
        }
    }

    unsafe fn extend(&mut self, size: usize) -> Result<*mut u8, ()> {
        // Important! The conversion is failable to avoid arithmetic overflow-based attacks.
        let increment = isize::try_from(size).map_err(|_| ())?;

        // Break it to me, babe!
        let old = shim::syscalls::sbrk(increment);

        if old == MFAIL {
            // BRK failed (e.g. OOM). The break is unchanged.
            Err(())
        } else {
            log!(INTERNAL, "Program break moved from {:p} by {} bytes.", old, size);
            Ok(old)
        }
    }
}

/// A memory sized in pages, which can only grow.
///
/// This is the host side of `LinearMemory`.
pub trait PagedMemory {
    /// The current size, in pages.
    fn pages(&self) -> usize;

    /// Grow by `delta` pages, and return the previous size in pages.
    ///
    /// On failure the memory is left unchanged.
    fn grow(&mut self, delta: usize) -> Result<usize, ()>;
}

/// Paged growth of sandboxed linear memory.
///
/// Pages are `WASM_PAGE_SIZE` bytes, and addresses are byte offsets from the start of the memory,
/// so the top of the region is the memory size in bytes.
#[derive(Debug, Default, Clone)]
pub struct LinearMemory<M> {
    /// The underlying memory.
    memory: M,
}

impl<M> LinearMemory<M> {
    /// Wrap a paged memory.
    pub const fn new(memory: M) -> LinearMemory<M> {
        LinearMemory { memory }
    }

    /// Get the underlying memory.
    pub fn memory(&self) -> &M {
        &self.memory
    }
}

impl<M: PagedMemory> Backing for LinearMemory<M> {
    #[inline]
    fn page_size(&self) -> usize {
        shim::config::WASM_PAGE_SIZE
    }

    fn top(&self) -> Result<*mut u8, ()> {
        in_bytes(self.memory.pages()).map(|top| top as *mut u8)
    }

    unsafe fn extend(&mut self, size: usize) -> Result<*mut u8, ()> {
        debug_assert!(size % shim::config::WASM_PAGE_SIZE == 0, "Growth is not page aligned.");

        let pages = size >> shim::config::WASM_PAGE_SHIFT;
        // The new top must be addressable before anything is grown.
        let new_top = self.memory.pages().checked_add(pages).ok_or(()).and_then(in_bytes)?;

        let old = self.memory.grow(pages)? << shim::config::WASM_PAGE_SHIFT;
        log!(INTERNAL, "Linear memory grew from {} bytes to {} bytes.", old, new_top);

        notify_grow(new_top);

        Ok(old as *mut u8)
    }
}

/// Convert a page count into bytes.
#[inline]
fn in_bytes(pages: usize) -> Result<usize, ()> {
    pages.checked_mul(shim::config::WASM_PAGE_SIZE).ok_or(())
}

/// The linear memory of the wasm32 sandbox.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Wasm32Memory;

#[cfg(target_arch = "wasm32")]
impl PagedMemory for Wasm32Memory {
    #[inline]
    fn pages(&self) -> usize {
        shim::memory::size()
    }

    fn grow(&mut self, delta: usize) -> Result<usize, ()> {
        let old = shim::memory::grow(delta);

        if old == !0 {
            Err(())
        } else {
            Ok(old)
        }
    }
}

/// A target without any growth primitive.
///
/// Every request fails, the zero-sized query included.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl Backing for Unsupported {
    #[inline]
    fn page_size(&self) -> usize {
        page::page_size()
    }

    fn top(&self) -> Result<*mut u8, ()> {
        Err(())
    }

    unsafe fn extend(&mut self, _size: usize) -> Result<*mut u8, ()> {
        Err(())
    }
}

/// The growth strategy of this target.
#[cfg(target_arch = "wasm32")]
pub type Native = LinearMemory<Wasm32Memory>;

/// The growth strategy of this target.
#[cfg(all(unix, not(target_arch = "wasm32")))]
pub type Native = ProgramBreak;

/// The growth strategy of this target.
#[cfg(not(any(unix, target_arch = "wasm32")))]
pub type Native = Unsupported;

#[cfg(test)]
mod test {
    use super::*;

    use std::cell::Cell;

    const PAGE: usize = shim::config::WASM_PAGE_SIZE;

    /// A paged memory living in two integers.
    #[derive(Debug)]
    struct Simulated {
        pages: usize,
        limit: usize,
    }

    impl PagedMemory for Simulated {
        fn pages(&self) -> usize {
            self.pages
        }

        fn grow(&mut self, delta: usize) -> Result<usize, ()> {
            let old = self.pages;

            match old.checked_add(delta) {
                Some(new) if new <= self.limit => {
                    self.pages = new;
                    Ok(old)
                },
                _ => Err(()),
            }
        }
    }

    fn simulated(pages: usize, limit: usize) -> LinearMemory<Simulated> {
        LinearMemory::new(Simulated { pages, limit })
    }

    thread_local! {
        static OBSERVED: Cell<Option<usize>> = const { Cell::new(None) };
    }

    fn observe(size: usize) {
        OBSERVED.with(|observed| observed.set(Some(size)));
    }

    #[test]
    fn test_query_idempotent() {
        let mut mem = simulated(3, 16);

        unsafe {
            let a = request_growth(&mut mem, 0).unwrap();
            let b = request_growth(&mut mem, 0).unwrap();

            assert_eq!(a, b);
            assert_eq!(a as usize, 3 * PAGE);
        }
        assert_eq!(mem.memory().pages, 3);
    }

    #[test]
    fn test_grow_rounds_to_pages() {
        let mut mem = simulated(1, 16);

        unsafe {
            let old = request_growth(&mut mem, 100).unwrap();
            let top = request_growth(&mut mem, 0).unwrap();

            assert_eq!(old as usize, PAGE);
            assert_eq!(top as usize, old as usize + PAGE);

            let old = request_growth(&mut mem, (PAGE + 1) as isize).unwrap();
            let top = request_growth(&mut mem, 0).unwrap();

            assert_eq!(top as usize, old as usize + 2 * PAGE);
        }
        assert_eq!(mem.memory().pages, 4);
    }

    #[test]
    fn test_grow_exact_page() {
        let mut mem = simulated(0, 16);

        unsafe {
            assert_eq!(request_growth(&mut mem, PAGE as isize).unwrap() as usize, 0);
            assert_eq!(request_growth(&mut mem, 0).unwrap() as usize, PAGE);
        }
    }

    #[test]
    fn test_shrink_fails() {
        let mut mem = simulated(5, 16);

        unsafe {
            assert!(request_growth(&mut mem, -1).is_err());
            assert!(request_growth(&mut mem, -(PAGE as isize)).is_err());
            assert!(request_growth(&mut mem, isize::MIN).is_err());

            assert_eq!(request_growth(&mut mem, 0).unwrap() as usize, 5 * PAGE);
        }
    }

    #[test]
    fn test_exhaustion_leaves_region() {
        let mut mem = simulated(14, 16);

        unsafe {
            assert!(request_growth(&mut mem, (3 * PAGE) as isize).is_err());
            assert_eq!(request_growth(&mut mem, 0).unwrap() as usize, 14 * PAGE);

            assert!(request_growth(&mut mem, (2 * PAGE) as isize).is_ok());
            assert!(request_growth(&mut mem, 1).is_err());
            assert_eq!(request_growth(&mut mem, 0).unwrap() as usize, 16 * PAGE);
        }
    }

    #[test]
    fn test_huge_request() {
        let mut mem = simulated(0, 1 << 16);

        unsafe {
            assert!(request_growth(&mut mem, isize::MAX).is_err());
            assert_eq!(request_growth(&mut mem, 0).unwrap() as usize, 0);
        }
    }

    #[test]
    fn test_observer() {
        set_grow_observer(observe);
        OBSERVED.with(|observed| observed.set(None));

        let mut mem = simulated(2, 4);

        unsafe {
            request_growth(&mut mem, 1).unwrap();
        }
        assert_eq!(OBSERVED.with(Cell::get), Some(3 * PAGE));

        OBSERVED.with(|observed| observed.set(None));
        unsafe {
            assert!(request_growth(&mut mem, (2 * PAGE) as isize).is_err());
            request_growth(&mut mem, 0).unwrap();
        }
        assert_eq!(OBSERVED.with(Cell::get), None);
    }

    #[test]
    fn test_unsupported() {
        unsafe {
            assert!(request_growth(&mut Unsupported, 0).is_err());
            assert!(request_growth(&mut Unsupported, 1).is_err());
            assert!(request_growth(&mut Unsupported, -1).is_err());
        }
    }
}
