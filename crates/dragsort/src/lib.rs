#![forbid(unsafe_code)]

//! Renderer-agnostic drag-and-reorder engine.
//!
//! The engine turns raw pointer samples into three kinds of effect while
//! keeping the dragged item's visual offset, the logical item order and the
//! cached sibling geometry consistent:
//!
//! - [`sort`] - live reordering inside a container, with hysteresis
//! - [`transfer`] - moving an item between connected containers
//! - [`auto_scroll`] - fixed-cadence scrolling near container and viewport edges
//!
//! The host owns rendering. It reports geometry through
//! [`GeometryProvider`], feeds pointer samples to [`DragEngine`], and applies
//! the resulting [`DragEvent`]s, item transforms and [`ScrollRequest`]s.
//!
//! # Lifecycle
//!
//! ```text
//! pointer_down -> Armed -> (threshold) -> Dragging -> pointer_up -> Settling
//!                                                                     |
//!                                          settle_complete -> Idle <--+
//! ```

pub mod auto_scroll;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod event;
pub mod item;
pub mod measure;
pub mod order;
pub mod position_cache;
pub mod session;
pub mod sort;
pub mod transfer;

pub use auto_scroll::{AutoScrollState, AutoScroller, ScrollRequest, ScrollTarget, edge_step};
pub use config::{AutoScrollConfig, DragConfig};
pub use container::{ContainerConfig, ContainerKey, DropContainer, EnterPredicate};
pub use dragsort_core::geometry::{Axis, LockAxis, Orientation, Point, Rect};
pub use engine::DragEngine;
pub use error::{ConfigError, RegistrationError};
pub use event::{DragEvent, DropSummary};
pub use item::{DragItem, ItemKey};
pub use measure::{Diagnostic, DiagnosticsHook, Element, GeometryProvider, MeasureError, ScrollAxes};
pub use position_cache::{ContainerSnapshot, ItemSnapshot, PositionCache};
pub use session::{DragPhase, DragSession, IgnoreReason, PointerOutcome};
pub use sort::{PreviousSwap, SortOutcome, SwapDirection};
