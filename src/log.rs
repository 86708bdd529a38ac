#![allow(unused_macros)]

// Without the `log` feature the arguments are still type-checked,
// which keeps the captured bindings used.

macro_rules! debug {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
        #[cfg(not(feature = "log"))]
        let _ = format_args!($($tt)*);
    }};
}

macro_rules! trace {
    ($($tt:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::trace!($($tt)*);
        #[cfg(not(feature = "log"))]
        let _ = format_args!($($tt)*);
    }};
}
