//! Log macros
//!
//! `log_error!` down to `log_trace!` take `format!`-style arguments and
//! route them by build:
//! - `defmt` feature: the matching defmt macro (firmware)
//! - `std` feature or unit tests: a `[LEVEL]` line on stderr, keeping stdout
//!   free for the simulator's report
//! - otherwise: discarded, arguments still type-checked
//!
//! The macros expand inside this crate, so the features checked are the
//! features `line_follower_core` was built with.

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($defmt:ident, $tag:literal, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$defmt!($($arg)*);

        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        eprintln!(concat!("[", $tag, "] {}"), format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(any(test, feature = "std"))))]
        let _ = format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::__log!(error, "ERROR", $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::__log!(warn, "WARN", $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::__log!(info, "INFO", $($arg)*) };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::__log!(debug, "DEBUG", $($arg)*) };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::__log!(trace, "TRACE", $($arg)*) };
}
