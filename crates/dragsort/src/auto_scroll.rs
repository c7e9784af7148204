#![forbid(unsafe_code)]

//! Edge-triggered auto-scroll.
//!
//! While dragging, a pointer within `edge_threshold` of a scrollable edge puts
//! the controller into [`AutoScrollState::Scrolling`]. Deltas are produced by
//! [`AutoScroller::tick`] at a fixed cadence, independent of how often the
//! pointer moves. The host applies each delta and reports it back so cached
//! geometry can follow.
//!
//! # Step curve
//!
//! ```text
//! step(d) = clamp(max_step * (1 - d / edge_threshold), min_step, max_step)
//! ```
//!
//! where `d` is the pointer's distance from the edge; the sign points toward
//! that edge.

use std::time::Instant;

use dragsort_core::geometry::{Axis, Point, Rect};
use dragsort_core::trace;

use crate::config::AutoScrollConfig;
use crate::container::ContainerKey;
use crate::measure::ScrollAxes;

/// What a scroll delta applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollTarget {
    Container(ContainerKey),
    Viewport,
}

/// A scroll the host should apply now.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub delta: Point,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoScrollState {
    #[default]
    Idle,
    Scrolling { target: ScrollTarget, step: Point },
}

/// A scrollable region the pointer may be near.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScrollRegion {
    pub target: ScrollTarget,
    pub rect: Rect,
    pub axes: ScrollAxes,
}

/// Per-tick step for a pointer at `pointer` inside `rect`.
///
/// Zero on every axis the pointer is not near, on axes `axes` excludes, and
/// everywhere when the pointer is outside `rect`.
#[must_use]
pub fn edge_step(rect: Rect, pointer: Point, axes: ScrollAxes, config: &AutoScrollConfig) -> Point {
    if !rect.contains(pointer) || config.edge_threshold <= 0.0 {
        return Point::ZERO;
    }
    // Unvalidated configs may swap the bounds.
    let lo = config.min_step.min(config.max_step);
    let hi = config.min_step.max(config.max_step);
    if hi.is_nan() {
        return Point::ZERO;
    }
    let along = |axis: Axis| {
        let p = pointer.along(axis);
        let to_start = p - rect.start(axis);
        let to_end = rect.end(axis) - p;
        let speed = |d: f32| (hi * (1.0 - d / config.edge_threshold)).clamp(lo, hi);
        if to_start < config.edge_threshold && to_start <= to_end {
            -speed(to_start)
        } else if to_end < config.edge_threshold {
            speed(to_end)
        } else {
            0.0
        }
    };
    let x = if axes.contains(ScrollAxes::HORIZONTAL) {
        along(Axis::X)
    } else {
        0.0
    };
    let y = if axes.contains(ScrollAxes::VERTICAL) {
        along(Axis::Y)
    } else {
        0.0
    };
    Point::new(x, y)
}

/// Fixed-cadence scroll driver.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    config: AutoScrollConfig,
    state: AutoScrollState,
    deadline: Option<Instant>,
}

impl AutoScroller {
    #[must_use]
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            state: AutoScrollState::Idle,
            deadline: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> AutoScrollState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// When the next [`tick`](Self::tick) will produce a delta; `None` while idle.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Re-evaluate edges for a new pointer position.
    ///
    /// The first region with a non-zero step wins. Staying on the same target
    /// keeps the pending deadline; a new target starts a fresh cadence.
    pub(crate) fn update(&mut self, regions: &[ScrollRegion], pointer: Point, now: Instant) {
        let next = regions.iter().find_map(|region| {
            let step = edge_step(region.rect, pointer, region.axes, &self.config);
            (step != Point::ZERO).then_some((region.target, step))
        });
        match (next, self.state) {
            (None, _) => self.stop(),
            (Some((target, step)), AutoScrollState::Scrolling { target: current, .. })
                if current == target =>
            {
                self.state = AutoScrollState::Scrolling { target, step };
            }
            (Some((target, step)), _) => {
                trace!(?target, ?step, "auto-scroll engaged");
                self.state = AutoScrollState::Scrolling { target, step };
                self.deadline = Some(now + self.config.cadence);
            }
        }
    }

    /// Return to idle and drop any pending deadline.
    pub(crate) fn stop(&mut self) {
        if self.state != AutoScrollState::Idle {
            trace!("auto-scroll stopped");
        }
        self.state = AutoScrollState::Idle;
        self.deadline = None;
    }

    /// Produce a delta if the cadence deadline has passed.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<ScrollRequest> {
        let AutoScrollState::Scrolling { target, step } = self.state else {
            return None;
        };
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = Some(now + self.config.cadence);
        trace!(?target, ?step, "auto-scroll tick");
        Some(ScrollRequest {
            target,
            delta: step,
        })
    }
}
