//! Logging shim for layout and decode diagnostics.
//!
//! With the `tracing` feature the macros are `tracing`'s own, so layouts can
//! attach structured fields (`points = n`, `max_y = ..`). Without it they
//! compile away.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
