//! The program break, for real.
//!
//! Everything is in a single test, as the break is shared by the whole process and growth calls
//! must be serialized.

#![cfg(target_os = "linux")]

extern crate rtport;

use std::ptr;

use rtport::{more_core, page_size};

#[test]
fn program_break() {
    let page = page_size();
    assert!(page.is_power_of_two());

    unsafe {
        // Queries are idempotent.
        let a = more_core(0).unwrap();
        let b = more_core(0).unwrap();
        assert_eq!(a, b);

        // Growth is rounded up to whole pages, and hands out the old top.
        let old = more_core(100).unwrap();
        let top = more_core(0).unwrap();
        assert_eq!(top as usize, old as usize + page);

        let old = more_core((page + 1) as isize).unwrap();
        let top = more_core(0).unwrap();
        assert_eq!(top as usize, old as usize + 2 * page);

        // The fresh memory is usable.
        ptr::write_bytes(old, 0xAB, 2 * page);
        assert_eq!(*old, 0xAB);
        assert_eq!(*old.add(2 * page - 1), 0xAB);

        // Shrinking always fails, and leaves the top alone.
        assert!(more_core(-1).is_err());
        assert!(more_core(-(page as isize)).is_err());
        assert_eq!(more_core(0).unwrap(), top);

        // So does growing beyond the address space.
        assert!(more_core(isize::MAX).is_err());
        assert_eq!(more_core(0).unwrap(), top);
    }
}
