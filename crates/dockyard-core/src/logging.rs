#![forbid(unsafe_code)]

//! Logging macros for the dock engine.
//!
//! With the `tracing` feature the `debug!`, `trace!` and `warn!` macros are
//! the `tracing` ones. Without it they expand to nothing, so call sites in
//! `dockyard-layout` stay the same either way:
//!
//! ```ignore
//! dockyard_core::debug!(nodes = 12, "dock contents replaced");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards its arguments; enable `tracing` to emit debug events.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// Discards its arguments; enable `tracing` to emit trace events.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// Discards its arguments; enable `tracing` to emit warnings.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {
            ()
        };
    }
}

/// Install a JSON formatting subscriber filtered by `directives`
/// (`RUST_LOG` syntax, e.g. `"dockyard_layout=debug"`).
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(directives: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(directives))
        .try_init()
        .is_ok()
}
