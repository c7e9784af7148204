#![forbid(unsafe_code)]

//! Engine-wide tuning.
//!
//! Per-container options live in [`ContainerConfig`](crate::container::ContainerConfig);
//! this module holds the thresholds shared by every drag the engine runs.

use std::time::Duration;

use crate::error::ConfigError;

/// Thresholds for drag start, sorting and container transfer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragConfig {
    /// Distance the pointer must travel from the press before a drag starts
    /// (default: 5.0).
    pub drag_threshold: f32,
    /// Minimum press duration before movement may start a drag (default: 0).
    ///
    /// Crossing the threshold before the delay elapsed abandons the gesture.
    pub start_delay: Duration,
    /// Hysteresis dead-zone along the sort axis (default: 4.0).
    ///
    /// Swapping with the same sibling again requires the pointer to travel at
    /// least this far from where the previous swap was accepted.
    pub dead_zone: f32,
    /// Fraction of the container size by which its rect is grown when deciding
    /// whether the pointer is close enough to sort (default: 0.05).
    pub sort_proximity: f32,
    /// Inward tolerance applied to container rects when hit testing transfer
    /// targets, so shared borders do not flicker (default: 1.0).
    pub transfer_tolerance: f32,
    /// Edge auto-scroll tuning.
    pub auto_scroll: AutoScrollConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            start_delay: Duration::ZERO,
            dead_zone: 4.0,
            sort_proximity: 0.05,
            transfer_tolerance: 1.0,
            auto_scroll: AutoScrollConfig::default(),
        }
    }
}

impl DragConfig {
    /// Set the drag-start distance threshold.
    #[must_use]
    pub fn with_threshold(mut self, distance: f32) -> Self {
        self.drag_threshold = distance;
        self
    }

    /// Set the press delay before a drag may start.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Set the sort hysteresis dead-zone.
    #[must_use]
    pub fn with_dead_zone(mut self, distance: f32) -> Self {
        self.dead_zone = distance;
        self
    }

    /// Set the sort proximity fraction.
    #[must_use]
    pub fn with_sort_proximity(mut self, fraction: f32) -> Self {
        self.sort_proximity = fraction;
        self
    }

    /// Set the transfer hit-test tolerance.
    #[must_use]
    pub fn with_transfer_tolerance(mut self, distance: f32) -> Self {
        self.transfer_tolerance = distance;
        self
    }

    /// Replace the auto-scroll tuning.
    #[must_use]
    pub fn with_auto_scroll(mut self, auto_scroll: AutoScrollConfig) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }

    /// Check every field for usable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("drag_threshold", self.drag_threshold)?;
        non_negative("dead_zone", self.dead_zone)?;
        non_negative("sort_proximity", self.sort_proximity)?;
        non_negative("transfer_tolerance", self.transfer_tolerance)?;
        self.auto_scroll.validate()
    }
}

/// Edge auto-scroll tuning.
///
/// The step per tick grows linearly from `min_step` at `edge_threshold` away
/// from an edge to `max_step` at the edge itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoScrollConfig {
    /// Distance from an edge at which scrolling begins (default: 20.0).
    pub edge_threshold: f32,
    /// Smallest step per tick (default: 1.0).
    pub min_step: f32,
    /// Largest step per tick (default: 12.0).
    pub max_step: f32,
    /// Interval between scroll ticks (default: 16ms).
    pub cadence: Duration,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 20.0,
            min_step: 1.0,
            max_step: 12.0,
            cadence: Duration::from_millis(16),
        }
    }
}

impl AutoScrollConfig {
    /// Set the edge proximity threshold.
    #[must_use]
    pub fn with_edge_threshold(mut self, distance: f32) -> Self {
        self.edge_threshold = distance;
        self
    }

    /// Set the step range.
    #[must_use]
    pub fn with_steps(mut self, min_step: f32, max_step: f32) -> Self {
        self.min_step = min_step;
        self.max_step = max_step;
        self
    }

    /// Set the tick cadence.
    #[must_use]
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Check every field for usable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("edge_threshold", self.edge_threshold)?;
        non_negative("min_step", self.min_step)?;
        non_negative("max_step", self.max_step)?;
        if self.min_step > self.max_step {
            return Err(ConfigError::InvalidStepRange {
                min_step: self.min_step,
                max_step: self.max_step,
            });
        }
        if self.cadence.is_zero() {
            return Err(ConfigError::ZeroCadence);
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistance { field, value })
    }
}
