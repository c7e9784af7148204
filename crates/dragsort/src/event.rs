#![forbid(unsafe_code)]

//! Notifications emitted while a drag runs.
//!
//! Events are queued in emission order and handed out by
//! [`DragEngine::drain_events`](crate::engine::DragEngine::drain_events). All
//! events caused by one pointer move are contiguous, in the order
//! `Moved`, `Sorted`, `Exited`, `Entered`.

use dragsort_core::geometry::Point;

use crate::container::ContainerKey;
use crate::item::ItemKey;

/// Final placement of a dropped item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropSummary {
    pub item: ItemKey,
    /// Container the drag started in.
    pub previous_container: ContainerKey,
    /// Container the item was dropped in.
    pub container: ContainerKey,
    pub previous_index: usize,
    pub current_index: usize,
    /// Whether the pointer was over the final container, or any enabled
    /// container it connects to, at release.
    pub is_pointer_over_container: bool,
    /// Pointer travel from the pickup point.
    pub distance: Point,
    pub drop_point: Point,
    /// Vector from the item's visual position to its slot; the renderer
    /// animates this to land the item.
    pub settle_delta: Point,
}

impl DropSummary {
    #[must_use]
    pub fn container_changed(&self) -> bool {
        self.previous_container != self.container
    }
}

/// Something observable that happened during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DragEvent {
    Started {
        item: ItemKey,
        container: ContainerKey,
    },
    Moved {
        item: ItemKey,
        pointer: Point,
        /// Lock-filtered offset applied to the item.
        offset: Point,
    },
    Sorted {
        item: ItemKey,
        container: ContainerKey,
        previous_index: usize,
        current_index: usize,
    },
    Exited {
        item: ItemKey,
        container: ContainerKey,
    },
    Entered {
        item: ItemKey,
        container: ContainerKey,
        current_index: usize,
    },
    Dropped(DropSummary),
    Cancelled {
        item: ItemKey,
        container: ContainerKey,
        index: usize,
    },
}

impl DragEvent {
    /// The dragged item the event refers to.
    #[must_use]
    pub fn item(&self) -> ItemKey {
        match *self {
            Self::Started { item, .. }
            | Self::Moved { item, .. }
            | Self::Sorted { item, .. }
            | Self::Exited { item, .. }
            | Self::Entered { item, .. }
            | Self::Cancelled { item, .. } => item,
            Self::Dropped(summary) => summary.item,
        }
    }

    /// Short name, as used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Moved { .. } => "moved",
            Self::Sorted { .. } => "sorted",
            Self::Exited { .. } => "exited",
            Self::Entered { .. } => "entered",
            Self::Dropped(_) => "dropped",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
