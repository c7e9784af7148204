#![forbid(unsafe_code)]

//! Drag lifecycle state.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Settling -> Idle
//!           \---------\------> Idle (click, abandon, cancel)
//! ```
//!
//! Pointer handlers never fail. Input that does not apply to the current
//! phase is answered with [`PointerOutcome::Ignored`] and an explicit
//! [`IgnoreReason`].

use std::time::Instant;

use dragsort_core::geometry::{LockAxis, Point, Rect};

use crate::container::ContainerKey;
use crate::item::ItemKey;
use crate::sort::PreviousSwap;

/// Coarse lifecycle phase of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down on an item but has not crossed the drag threshold.
    Armed,
    Dragging,
    /// Dropped; waiting for the renderer to finish the landing animation.
    Settling,
}

/// Why a pointer call changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    /// A press arrived while another gesture is armed, dragging or settling.
    SessionActive,
    UnknownItem,
    ItemDisabled,
    ContainerDisabled,
    /// Move or release without an armed or dragging gesture.
    NoActiveDrag,
    /// The armed pointer has not travelled far enough yet.
    ThresholdNotReached,
    /// Pointer coordinates were NaN or infinite.
    NonFinitePointer,
}

/// What one pointer call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerOutcome {
    /// Press accepted; the gesture is armed.
    Armed,
    /// Threshold crossed; the drag started.
    Started,
    /// The active drag processed the move.
    Updated,
    /// Threshold crossed before the start delay elapsed; gesture dropped.
    Abandoned,
    /// Released before the threshold; treated as a click.
    Released,
    /// The drag ended with a drop and is now settling.
    Dropped,
    Ignored { reason: IgnoreReason },
}

impl PointerOutcome {
    pub(crate) const fn ignored(reason: IgnoreReason) -> Self {
        Self::Ignored { reason }
    }

    #[must_use]
    pub fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}

/// A press waiting to become a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArmedGesture {
    pub item: ItemKey,
    pub container: ContainerKey,
    pub index: usize,
    pub origin: Point,
    pub pressed_at: Instant,
}

/// State of the single active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub(crate) item: ItemKey,
    pub(crate) initial_container: ContainerKey,
    pub(crate) initial_index: usize,
    pub(crate) container: ContainerKey,
    /// Pointer relative to the item's top-left at pickup.
    pub(crate) pickup_offset: Point,
    /// Item top-left at pickup.
    pub(crate) pickup_origin: Point,
    pub(crate) lock_axis: LockAxis,
    /// Viewport scroll position at pickup.
    pub(crate) scroll_snapshot: Point,
    /// Viewport scroll applied since pickup.
    pub(crate) scroll_delta: Point,
    pub(crate) previous_swap: Option<PreviousSwap>,
    pub(crate) has_moved: bool,
    pub(crate) last_pointer: Point,
    entry_stamps: Vec<(ContainerKey, u64)>,
    next_stamp: u64,
}

impl DragSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        item: ItemKey,
        container: ContainerKey,
        index: usize,
        pickup_pointer: Point,
        pickup_origin: Point,
        lock_axis: LockAxis,
        scroll_snapshot: Point,
    ) -> Self {
        let mut session = Self {
            item,
            initial_container: container,
            initial_index: index,
            container,
            pickup_offset: pickup_pointer - pickup_origin,
            pickup_origin,
            lock_axis,
            scroll_snapshot,
            scroll_delta: Point::ZERO,
            previous_swap: None,
            has_moved: false,
            last_pointer: pickup_pointer,
            entry_stamps: Vec::new(),
            next_stamp: 0,
        };
        session.mark_entered(container);
        session
    }

    #[must_use]
    pub fn item(&self) -> ItemKey {
        self.item
    }

    #[must_use]
    pub fn initial_container(&self) -> ContainerKey {
        self.initial_container
    }

    #[must_use]
    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    /// Container currently holding the dragged item.
    #[must_use]
    pub fn container(&self) -> ContainerKey {
        self.container
    }

    #[must_use]
    pub fn pickup_offset(&self) -> Point {
        self.pickup_offset
    }

    #[must_use]
    pub fn pickup_origin(&self) -> Point {
        self.pickup_origin
    }

    /// Pointer position at pickup.
    #[must_use]
    pub fn pickup_pointer(&self) -> Point {
        self.pickup_origin + self.pickup_offset
    }

    #[must_use]
    pub fn lock_axis(&self) -> LockAxis {
        self.lock_axis
    }

    #[must_use]
    pub fn scroll_snapshot(&self) -> Point {
        self.scroll_snapshot
    }

    /// Viewport scroll applied since pickup.
    #[must_use]
    pub fn scroll_delta(&self) -> Point {
        self.scroll_delta
    }

    #[must_use]
    pub fn previous_swap(&self) -> Option<&PreviousSwap> {
        self.previous_swap.as_ref()
    }

    /// Whether any move was processed after the drag started.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[must_use]
    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Raw (unfiltered) displacement for a pointer at `pointer`.
    pub(crate) fn raw_offset(&self, pointer: Point) -> Point {
        (pointer - self.pickup_offset) - self.pickup_origin + self.scroll_delta
    }

    /// `pointer` with the locked component pinned to the pickup pointer.
    pub(crate) fn constrained(&self, pointer: Point) -> Point {
        self.lock_axis.constrain(pointer, self.pickup_pointer())
    }

    /// Where the item is drawn for `pointer`, sized like its `slot`.
    ///
    /// Unmeasured items collapse to the pointer itself.
    pub(crate) fn visual_rect(&self, pointer: Point, slot: Option<Rect>) -> Rect {
        let origin = pointer - self.pickup_offset;
        let (width, height) = slot.map_or((0.0, 0.0), |slot| (slot.width, slot.height));
        Rect::new(origin.x, origin.y, width, height)
    }

    /// Record that the item entered `container` now.
    pub(crate) fn mark_entered(&mut self, container: ContainerKey) {
        self.next_stamp += 1;
        let stamp = self.next_stamp;
        match self.entry_stamps.iter_mut().find(|(k, _)| *k == container) {
            Some(entry) => entry.1 = stamp,
            None => self.entry_stamps.push((container, stamp)),
        }
    }

    /// Entry stamp of `container`; higher is more recent.
    #[must_use]
    pub fn entry_stamp(&self, container: ContainerKey) -> Option<u64> {
        self.entry_stamps
            .iter()
            .find(|(k, _)| *k == container)
            .map(|&(_, stamp)| stamp)
    }
}

/// Engine-internal gesture state.
#[derive(Debug, Clone, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Armed(ArmedGesture),
    Dragging(Box<DragSession>),
    Settling { item: ItemKey },
}

impl Gesture {
    pub(crate) fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Armed(_) => DragPhase::Armed,
            Self::Dragging(_) => DragPhase::Dragging,
            Self::Settling { .. } => DragPhase::Settling,
        }
    }

    /// Item the gesture is about, if any.
    pub(crate) fn item(&self) -> Option<ItemKey> {
        match self {
            Self::Idle => None,
            Self::Armed(armed) => Some(armed.item),
            Self::Dragging(session) => Some(session.item),
            Self::Settling { item } => Some(*item),
        }
    }
}
