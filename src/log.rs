//! Runtime logging.
//!
//! Records are only emitted with the `log` feature. Otherwise they compile to nothing but the
//! construction of their arguments.

/// Log levels, from least to most severe.
pub mod level {
    /// Details only useful when debugging this crate itself.
    pub const INTERNAL: u8 = 1;
    /// Debugging information.
    pub const DEBUG: u8 = 2;
    /// An entry point was called.
    pub const CALL: u8 = 3;
    /// A notable state change, such as the backing region moving.
    pub const NOTE: u8 = 4;
    /// Something went wrong, but the caller can recover.
    pub const WARNING: u8 = 5;
    /// Something went wrong for good.
    pub const ERROR: u8 = 6;
}

/// Log to the appropriate source.
///
/// The first argument is the level (one of the constants in `log::level`), the rest are just
/// normal formatters. The macro is internal to the crate.
macro_rules! log {
    ($lv:ident, $( $arg:tt )*) => {
        $crate::write::record(
            $crate::log::level::$lv,
            stringify!($lv),
            format_args!($( $arg )*),
            file!(),
            line!(),
        )
    };
}
