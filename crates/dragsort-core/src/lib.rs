#![forbid(unsafe_code)]

//! Core: geometry primitives and the logging facade shared by the reorder engine.

pub mod geometry;
pub mod logging;

pub use geometry::{Axis, LockAxis, Orientation, Point, Rect};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
