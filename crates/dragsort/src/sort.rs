#![forbid(unsafe_code)]

//! Index computation for in-container reordering.
//!
//! A sort step compares the dragged item's visual rect with the cached slots
//! of the current container along its orientation axis. Moving backward, the
//! leading edge is the rect's start; moving forward, its end. The furthest
//! sibling whose midpoint that edge has crossed is the swap target, so an item
//! dragged back to where it was picked up returns to its original index.
//!
//! Swapping with the same sibling again requires the pointer to travel the
//! dead-zone in the new swap's direction, which keeps the index from
//! flickering when the item rests on a boundary.

use dragsort_core::geometry::{Axis, Point, Rect};
use dragsort_core::trace;

use crate::container::DropContainer;
use crate::item::ItemKey;
use crate::position_cache::{ItemSnapshot, PositionCache};

/// Direction of a swap relative to the logical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapDirection {
    /// Towards index 0.
    Backward,
    /// Towards the end of the list.
    Forward,
}

/// The last accepted swap, used for hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviousSwap {
    /// Sibling the dragged item swapped past.
    pub with_item: ItemKey,
    pub direction: SwapDirection,
    /// Pointer coordinate along the sort axis when the swap was accepted.
    pub pointer: f32,
}

/// Result of one sort step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOutcome {
    Unchanged,
    Moved { from: usize, to: usize },
}

impl SortOutcome {
    #[must_use]
    pub fn is_moved(self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Tuning for a single sort step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SortParams {
    pub dead_zone: f32,
    pub sort_proximity: f32,
}

/// A swap the scan would perform, before hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub from: usize,
    pub to: usize,
    pub with_item: ItemKey,
    pub direction: SwapDirection,
}

/// Container rect grown by `fraction` of its size on each axis.
pub(crate) fn proximity_rect(rect: Rect, fraction: f32) -> Rect {
    let dx = rect.width * fraction;
    let dy = rect.height * fraction;
    Rect::new(
        rect.x - dx,
        rect.y - dy,
        rect.width + 2.0 * dx,
        rect.height + 2.0 * dy,
    )
}

/// Scan `slots` for the swap the dragged item's visual rect asks for.
///
/// The direction comes from where `dragged` sits relative to the item's own
/// slot. When the item has no measured slot both directions are scanned,
/// backward first. Slots without a rect are skipped without ending the scan.
pub(crate) fn find_candidate(
    slots: &[ItemSnapshot],
    item: ItemKey,
    axis: Axis,
    dragged: Rect,
) -> Option<Candidate> {
    let from = slots.iter().position(|slot| slot.item == item)?;
    let centre = dragged.midpoint(axis);
    let home = slots[from].rect.map(|rect| rect.midpoint(axis));

    let mut best = None;
    if home.is_none_or(|home| centre < home) {
        let lead = dragged.start(axis);
        for (index, slot) in slots[..from].iter().enumerate().rev() {
            let Some(rect) = slot.rect else {
                continue;
            };
            if lead < rect.midpoint(axis) {
                best = Some((index, SwapDirection::Backward));
            } else {
                break;
            }
        }
    }
    if best.is_none() && home.is_none_or(|home| centre > home) {
        let lead = dragged.end(axis);
        for (index, slot) in slots.iter().enumerate().skip(from + 1) {
            let Some(rect) = slot.rect else {
                continue;
            };
            if lead > rect.midpoint(axis) {
                best = Some((index, SwapDirection::Forward));
            } else {
                break;
            }
        }
    }

    best.map(|(to, direction)| Candidate {
        from,
        to,
        with_item: slots[to].item,
        direction,
    })
}

/// Whether a candidate swap survives the dead-zone check.
///
/// Against the same sibling, undoing the previous swap needs `dead_zone` of
/// travel back against it, and repeating it needs the same travel onward.
pub(crate) fn passes_hysteresis(
    candidate: &Candidate,
    previous: Option<&PreviousSwap>,
    along: f32,
    dead_zone: f32,
) -> bool {
    match previous {
        Some(prev) if prev.with_item == candidate.with_item => {
            let onward = match prev.direction {
                SwapDirection::Forward => along - prev.pointer,
                SwapDirection::Backward => prev.pointer - along,
            };
            let travelled = if candidate.direction == prev.direction {
                onward
            } else {
                -onward
            };
            travelled >= dead_zone
        }
        _ => true,
    }
}

/// Run one sort step for `item` in `container`.
///
/// On acceptance the container order and the cached slots are updated
/// together and `previous` records the swap. `pointer` and `dragged` must
/// already be lock-constrained.
pub(crate) fn sort_step<T>(
    container: &mut DropContainer<T>,
    cache: &mut PositionCache,
    item: ItemKey,
    pointer: Point,
    dragged: Rect,
    previous: &mut Option<PreviousSwap>,
    params: SortParams,
) -> SortOutcome {
    if container.is_sorting_disabled() {
        return SortOutcome::Unchanged;
    }
    let key = container.key();
    let Some(rect) = cache.container_rect(key) else {
        return SortOutcome::Unchanged;
    };
    if !proximity_rect(rect, params.sort_proximity).contains(pointer) {
        return SortOutcome::Unchanged;
    }
    let axis = container.orientation().axis();
    let along = pointer.along(axis);
    let Some(candidate) = cache
        .items(key)
        .and_then(|slots| find_candidate(slots, item, axis, dragged))
    else {
        return SortOutcome::Unchanged;
    };
    if !passes_hysteresis(&candidate, previous.as_ref(), along, params.dead_zone) {
        trace!(
            container = key.0,
            with_item = candidate.with_item.0,
            "sort held by dead-zone"
        );
        return SortOutcome::Unchanged;
    }
    // The cache mirrors the container order; a mismatch means the host
    // changed the order behind the engine's back.
    if container.index_of(item) != Some(candidate.from) {
        return SortOutcome::Unchanged;
    }

    container.sort(candidate.from, candidate.to);
    cache.move_slot(key, candidate.from, candidate.to);
    *previous = Some(PreviousSwap {
        with_item: candidate.with_item,
        direction: candidate.direction,
        pointer: along,
    });
    SortOutcome::Moved {
        from: candidate.from,
        to: candidate.to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ContainerConfig, ContainerKey};

    fn slots(tops: &[(u64, f32, f32)]) -> Vec<ItemSnapshot> {
        tops.iter()
            .enumerate()
            .map(|(index, &(key, y, h))| ItemSnapshot {
                item: ItemKey(key),
                rect: Some(Rect::new(0.0, y, 100.0, h)),
                index,
            })
            .collect()
    }

    fn three() -> Vec<ItemSnapshot> {
        slots(&[(0, 0.0, 40.0), (1, 40.0, 40.0), (2, 80.0, 40.0)])
    }

    /// A 40-tall dragged rect whose top edge sits at `y`.
    fn at(y: f32) -> Rect {
        Rect::new(0.0, y, 100.0, 40.0)
    }

    #[test]
    fn backward_crossing_picks_furthest_sibling() {
        let s = three();
        let c = find_candidate(&s, ItemKey(2), Axis::Y, at(-15.0)).unwrap();
        assert_eq!((c.from, c.to), (2, 0));
        assert_eq!(c.direction, SwapDirection::Backward);
        assert_eq!(c.with_item, ItemKey(0));
    }

    #[test]
    fn forward_crossing_uses_trailing_edge() {
        let s = three();
        // Bottom edge 75 passes item 1's midpoint (60), not item 2's (100).
        let c = find_candidate(&s, ItemKey(0), Axis::Y, at(35.0)).unwrap();
        assert_eq!((c.from, c.to), (0, 1));
        assert_eq!(c.direction, SwapDirection::Forward);
        assert_eq!(find_candidate(&s, ItemKey(0), Axis::Y, at(19.0)), None);
    }

    #[test]
    fn home_slot_yields_no_candidate() {
        let s = three();
        assert_eq!(find_candidate(&s, ItemKey(1), Axis::Y, at(40.0)), None);
        assert_eq!(find_candidate(&s, ItemKey(1), Axis::Y, at(55.0)), None);
        let single = slots(&[(7, 0.0, 40.0)]);
        assert_eq!(find_candidate(&single, ItemKey(7), Axis::Y, at(-100.0)), None);
    }

    #[test]
    fn swapped_item_returns_at_its_pickup_position() {
        // Item 1 was moved to the front; its slot is now 0..40 and item 0
        // sits at 40..80. Dragging it back to 40..80 undoes the swap.
        let s = slots(&[(1, 0.0, 40.0), (0, 40.0, 40.0), (2, 80.0, 40.0)]);
        let c = find_candidate(&s, ItemKey(1), Axis::Y, at(40.0)).unwrap();
        assert_eq!((c.from, c.to), (0, 1));
        assert_eq!(c.with_item, ItemKey(0));
        assert_eq!(c.direction, SwapDirection::Forward);
    }

    #[test]
    fn unmeasured_slots_are_skipped() {
        let mut s = three();
        s[1].rect = None;
        let c = find_candidate(&s, ItemKey(2), Axis::Y, at(-15.0)).unwrap();
        assert_eq!(c.to, 0);
    }

    #[test]
    fn unmeasured_dragged_item_scans_both_ways() {
        let mut s = three();
        s[1].rect = None;
        let point = |y| Rect::new(50.0, y, 0.0, 0.0);
        assert_eq!(find_candidate(&s, ItemKey(1), Axis::Y, point(5.0)).unwrap().to, 0);
        assert_eq!(find_candidate(&s, ItemKey(1), Axis::Y, point(110.0)).unwrap().to, 2);
        assert_eq!(find_candidate(&s, ItemKey(1), Axis::Y, point(50.0)), None);
    }

    #[test]
    fn undoing_a_swap_needs_dead_zone_of_travel_back() {
        let undo = Candidate {
            from: 1,
            to: 0,
            with_item: ItemKey(0),
            direction: SwapDirection::Backward,
        };
        let prev = PreviousSwap {
            with_item: ItemKey(0),
            direction: SwapDirection::Forward,
            pointer: 20.0,
        };
        assert!(!passes_hysteresis(&undo, Some(&prev), 18.0, 4.0));
        // Travel further forward does not count toward undoing.
        assert!(!passes_hysteresis(&undo, Some(&prev), 30.0, 4.0));
        assert!(passes_hysteresis(&undo, Some(&prev), 16.0, 4.0));
    }

    #[test]
    fn repeating_a_swap_needs_dead_zone_onward() {
        let repeat = Candidate {
            from: 0,
            to: 1,
            with_item: ItemKey(0),
            direction: SwapDirection::Forward,
        };
        let prev = PreviousSwap {
            with_item: ItemKey(0),
            direction: SwapDirection::Forward,
            pointer: 20.0,
        };
        assert!(!passes_hysteresis(&repeat, Some(&prev), 22.0, 4.0));
        assert!(passes_hysteresis(&repeat, Some(&prev), 24.0, 4.0));
    }

    #[test]
    fn other_sibling_or_no_history_passes() {
        let cand = Candidate {
            from: 1,
            to: 0,
            with_item: ItemKey(0),
            direction: SwapDirection::Backward,
        };
        let other = PreviousSwap {
            with_item: ItemKey(9),
            direction: SwapDirection::Forward,
            pointer: 20.0,
        };
        assert!(passes_hysteresis(&cand, Some(&other), 20.5, 4.0));
        assert!(passes_hysteresis(&cand, None, 20.5, 4.0));
    }

    #[test]
    fn proximity_rect_grows_per_axis() {
        let r = proximity_rect(Rect::new(0.0, 0.0, 100.0, 200.0), 0.1);
        assert_eq!(r, Rect::new(-10.0, -20.0, 120.0, 240.0));
    }

    #[test]
    fn sort_step_respects_sorting_disabled() {
        let key = ContainerKey(0);
        let mut container = DropContainer::<()>::new(
            key,
            "list".into(),
            ContainerConfig::vertical().with_sorting_disabled(true),
            Vec::new(),
        );
        container.push(ItemKey(0));
        container.push(ItemKey(1));
        let mut cache = PositionCache::default();
        let mut previous = None;
        let outcome = sort_step(
            &mut container,
            &mut cache,
            ItemKey(1),
            Point::new(10.0, 5.0),
            Rect::new(0.0, -15.0, 100.0, 40.0),
            &mut previous,
            SortParams {
                dead_zone: 4.0,
                sort_proximity: 0.05,
            },
        );
        assert_eq!(outcome, SortOutcome::Unchanged);
        assert!(previous.is_none());
    }
}
