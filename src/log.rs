//  LOG.rs
//    by Lut99
//
//  Created:
//    14 Sep 2026, 10:02:17
//  Last edited:
//    02 Oct 2026, 16:40:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Provides [`log`]-macro counterparts that only emit anything if the
//!   `log`-feature is enabled.
//!
//!   The validator runs in tight loops (one trace line per outcome per
//!   state), so without the feature these compile away entirely.
//


/***** LIBRARY *****/
/// Mirrors the `warn!()`-macro from the [`log`](https://github.com/rust-lang/log)-crate.
///
/// Used for recoverable data-quality problems, like conflicting conditional effects.
#[cfg(feature = "log")]
macro_rules! warning {
    ($($t:tt)*) => {
        ::log::warn!($($t)*)
    };
}
#[cfg(not(feature = "log"))]
macro_rules! warning {
    ($($t:tt)*) => {{
        // Still "use" the arguments so toggling the feature doesn't trigger unused warnings.
        let _ = ::std::format_args!($($t)*);
    }};
}
#[allow(unused)]
pub(crate) use warning as warn;

/// Mirrors the `debug!()`-macro from the [`log`](https://github.com/rust-lang/log)-crate.
///
/// Used for phase milestones (domain built, simulation done, ...).
#[cfg(feature = "log")]
macro_rules! debug {
    ($($t:tt)*) => {
        ::log::debug!($($t)*)
    };
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($t:tt)*) => {{
        let _ = ::std::format_args!($($t)*);
    }};
}
#[allow(unused)]
pub(crate) use debug;

/// Mirrors the `trace!()`-macro from the [`log`](https://github.com/rust-lang/log)-crate.
///
/// Used for the per-state and per-outcome steps of the simulation.
#[cfg(feature = "log")]
macro_rules! trace {
    ($($t:tt)*) => {
        ::log::trace!($($t)*)
    };
}
#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($t:tt)*) => {{
        let _ = ::std::format_args!($($t)*);
    }};
}
#[allow(unused)]
pub(crate) use trace;
