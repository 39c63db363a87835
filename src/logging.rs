#![allow(unused_macros)]

//! Feature-gated logging. Every macro expands to nothing unless the `logging`
//! feature pulls in the `log` facade, so the hot paths carry no cost by default.

macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::debug!(target: $target, $($arg)+);
    );
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::debug!(target: "memvec", $($arg)+);
    )
}

macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::trace!(target: $target, $($arg)+);
    );
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::trace!(target: "memvec", $($arg)+);
    )
}

/// Logs a buffer swap caused by growth, with the element count carried over.
macro_rules! trace_realloc {
    ($what:expr, $old_cap:expr, $new_cap:expr, $moved:expr) => (
        trace!(
            target: "memvec::array",
            "{}: capacity {} -> {}, relocating {} items",
            $what, $old_cap, $new_cap, $moved
        );
    )
}
