//! Bounded formatting.
//!
//! Formatted console output is rendered into a fixed scratch buffer first, so it never
//! allocates. Whatever does not fit is dropped silently.

use std::fmt::{self, Write};
use std::ops;

use shim::buf::BufWriter;
use shim::config;

use crate::console;

/// Text rendered into the scratch buffer.
pub struct Scratch {
    /// The buffer.
    buffer: [u8; config::SCRATCH_SIZE],
    /// The bytes of the buffer that are filled.
    len: usize,
    /// Did the text overflow the buffer?
    truncated: bool,
}

impl Scratch {
    /// The rendered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Was the text cut to fit?
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl ops::Deref for Scratch {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Render formatted text into a scratch buffer.
pub fn render(args: fmt::Arguments) -> Scratch {
    let mut scratch = Scratch {
        buffer: [0; config::SCRATCH_SIZE],
        len: 0,
        truncated: false,
    };

    let mut writer = BufWriter::new(&mut scratch.buffer);
    let _ = writer.write_fmt(args);
    let (len, truncated) = (writer.filled(), writer.is_truncated());

    scratch.len = len;
    scratch.truncated = truncated;
    scratch
}

/// Render formatted text into `buf`, and return the number of bytes written.
///
/// This is the bounded `snprintf`: text past the end of `buf` is dropped, and no terminator is
/// added.
pub fn format_into(buf: &mut [u8], args: fmt::Arguments) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = writer.write_fmt(args);

    writer.filled()
}

/// Render formatted text, and hand it to `sink` in one piece.
pub fn print_to<F>(sink: F, args: fmt::Arguments) -> Result<(), ()>
where
    F: FnOnce(&[u8]) -> Result<(), ()>,
{
    sink(&render(args))
}

/// Render formatted text, and write it to the standard output.
pub fn print(args: fmt::Arguments) {
    let _ = print_to(console::write_out, args);
}

/// Render formatted text, and write it to the standard error.
pub fn eprint(args: fmt::Arguments) {
    let _ = print_to(console::write_err, args);
}

/// Print formatted text to the standard output, through the scratch buffer.
///
/// At most `SCRATCH_SIZE` bytes are printed.
#[macro_export]
macro_rules! printf {
    ($( $arg:tt )*) => {
        $crate::format::print(format_args!($( $arg )*))
    };
}

/// Print formatted text to the standard error, through the scratch buffer.
///
/// At most `SCRATCH_SIZE` bytes are printed.
#[macro_export]
macro_rules! eprintf {
    ($( $arg:tt )*) => {
        $crate::format::eprint(format_args!($( $arg )*))
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() {
        let text = render(format_args!("{}-{}", 42, "ok"));

        assert_eq!(text.as_bytes(), b"42-ok");
        assert!(!text.is_truncated());
    }

    #[test]
    fn test_render_truncates() {
        let long = "x".repeat(config::SCRATCH_SIZE + 100);
        let text = render(format_args!("{}!", long));

        assert_eq!(text.len(), config::SCRATCH_SIZE);
        assert!(text.iter().all(|&b| b == b'x'));
        assert!(text.is_truncated());
    }

    #[test]
    fn test_render_exact_fit() {
        let exact = "y".repeat(config::SCRATCH_SIZE);
        let text = render(format_args!("{}", exact));

        assert_eq!(text.len(), config::SCRATCH_SIZE);
        assert!(!text.is_truncated());
    }

    #[test]
    fn test_format_into() {
        let mut buf = [0; 8];

        assert_eq!(format_into(&mut buf, format_args!("{:>4}|", 7)), 5);
        assert_eq!(&buf[..5], b"   7|");

        assert_eq!(format_into(&mut buf, format_args!("{}", "overflowing")), 8);
        assert_eq!(&buf, b"overflow");

        assert_eq!(format_into(&mut [], format_args!("{}", 1)), 0);
    }

    #[test]
    fn test_print_to() {
        let mut out = Vec::new();

        print_to(
            |bytes| {
                out.extend_from_slice(bytes);
                Ok(())
            },
            format_args!("{}-{}", 42, "ok"),
        )
        .unwrap();

        assert_eq!(out, b"42-ok");
    }

    #[test]
    fn test_print_to_truncates() {
        let long = "z".repeat(config::SCRATCH_SIZE * 2);
        let mut len = 0;

        let res = print_to(
            |bytes| {
                len = bytes.len();
                Err(())
            },
            format_args!("{}", long),
        );

        assert!(res.is_err());
        assert_eq!(len, config::SCRATCH_SIZE);
    }

    #[test]
    fn test_print() {
        printf!("");
        eprintf!("");
    }
}
