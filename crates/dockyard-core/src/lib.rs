#![forbid(unsafe_code)]

//! Core: geometry, the abstract drawing surface, and logging macros shared by
//! the dockyard crates.

pub mod geometry;
pub mod logging;
pub mod surface;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
