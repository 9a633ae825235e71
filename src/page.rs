//! Page granularity.
//!
//! The page size is what the external allocator sizes its requests by, and what the growth shim
//! rounds every growth up to.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::OnceLock;

/// Get the page size of this platform, in bytes.
///
/// The wasm32 sandbox has fixed 64 KiB pages.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn page_size() -> usize {
    shim::config::WASM_PAGE_SIZE
}

/// Get the page size of this platform, in bytes.
///
/// The host is asked once, and the answer is kept for the lifetime of the process. This is
/// always a power of two.
#[cfg(not(target_arch = "wasm32"))]
pub fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

    *PAGE_SIZE.get_or_init(|| {
        let size = shim::syscalls::page_size();

        if size.is_power_of_two() {
            size
        } else {
            log!(WARNING, "The host reported a page size of {}, which is not a power of two.", size);
            shim::config::DEFAULT_PAGE_SIZE
        }
    })
}

/// Round `size` up to a multiple of `page`.
///
/// `page` must be a power of two. `None` is returned if the result does not fit in a `usize`.
#[inline]
pub fn align_up(size: usize, page: usize) -> Option<usize> {
    debug_assert!(page.is_power_of_two(), "Page size is not a power of two.");

    size.checked_add(page - 1).map(|end| end & !(page - 1))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_size_stable() {
        let first = page_size();

        assert!(first.is_power_of_two());
        for _ in 0..16 {
            assert_eq!(page_size(), first);
        }
    }

    #[test]
    fn test_page_size_across_threads() {
        let here = page_size();
        let there = std::thread::spawn(page_size).join().unwrap();

        assert_eq!(here, there);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4096), Some(0));
        assert_eq!(align_up(1, 4096), Some(4096));
        assert_eq!(align_up(4096, 4096), Some(4096));
        assert_eq!(align_up(4097, 4096), Some(8192));
        assert_eq!(align_up(100, 65536), Some(65536));
    }

    #[test]
    fn test_align_up_overflow() {
        assert_eq!(align_up(usize::MAX, 4096), None);
        assert_eq!(align_up(usize::MAX - 4094, 4096), None);
    }
}
