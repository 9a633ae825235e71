//! System calls.

/// Move the program break by `n` bytes. See `man sbrk`.
///
/// On success, the old program break is returned. On failure, `!0` is returned and the break is
/// left untouched. `sbrk(0)` queries the current break.
///
/// # Note
///
/// This is the library `sbrk`, so the C library's own view of the break stays coherent.
///
/// # Safety
///
/// The caller must not shrink the break below memory that is still in use, and must not race
/// with other break movers.
#[cfg(unix)]
pub unsafe fn sbrk(n: isize) -> *mut u8 {
    libc::sbrk(n as libc::intptr_t) as *mut u8
}

/// Query the page size of the host. See `man sysconf`.
///
/// Falls back to `DEFAULT_PAGE_SIZE` if the host does not answer.
#[cfg(unix)]
pub fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

    if size <= 0 {
        crate::config::DEFAULT_PAGE_SIZE
    } else {
        size as usize
    }
}

/// Query the page size of the host.
#[cfg(not(unix))]
pub fn page_size() -> usize {
    crate::config::DEFAULT_PAGE_SIZE
}

/// Write a buffer to a file descriptor. See `man 2 write`.
///
/// Returns the number of bytes written, or `!0` on failure.
#[cfg(unix)]
pub fn write(fd: i32, buf: &[u8]) -> usize {
    unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) as usize }
}
