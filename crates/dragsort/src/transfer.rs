#![forbid(unsafe_code)]

//! Moving the dragged item between connected containers.

use std::collections::BTreeMap;

use dragsort_core::debug;
use dragsort_core::geometry::{Axis, Point};

use crate::container::{ContainerKey, DropContainer};
use crate::item::{DragItem, ItemKey};
use crate::measure::{DiagnosticsSink, GeometryProvider};
use crate::position_cache::{ItemSnapshot, PositionCache};

/// A completed cross-container move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transfer {
    pub from: ContainerKey,
    pub from_index: usize,
    pub to: ContainerKey,
    pub to_index: usize,
}

/// Pick the container the pointer asks the item to move into.
///
/// Candidates are `current` and the containers it connects to. A candidate
/// matches when `pointer` lies in its cached rect shrunk by `tolerance`.
/// `current` outranks every other match; otherwise the highest entry stamp
/// wins, never-entered containers rank lowest and ties go to the earlier
/// connection. Returns `None` when the item should stay, including when the
/// winner's enter predicate vetoes the item.
pub(crate) fn select_target<T>(
    containers: &BTreeMap<ContainerKey, DropContainer<T>>,
    cache: &PositionCache,
    item: &DragItem<T>,
    current: ContainerKey,
    pointer: Point,
    tolerance: f32,
    stamp: impl Fn(ContainerKey) -> Option<u64>,
) -> Option<ContainerKey> {
    let hit = |key: ContainerKey| {
        cache
            .container_rect(key)
            .is_some_and(|rect| rect.inset(tolerance).contains(pointer))
    };
    if hit(current) {
        return None;
    }

    let source = containers.get(&current)?;
    let mut best: Option<(ContainerKey, Option<u64>)> = None;
    for &key in source.connected() {
        let Some(target) = containers.get(&key) else {
            continue;
        };
        if target.is_disabled() || !hit(key) {
            continue;
        }
        let rank = stamp(key);
        if best.is_none_or(|(_, top)| rank > top) {
            best = Some((key, rank));
        }
    }

    let (key, _) = best?;
    let target = containers.get(&key)?;
    if !target.can_enter(item) {
        debug!(item = item.key().0, target = key.0, "transfer vetoed");
        return None;
    }
    Some(key)
}

/// Index at which an item arriving at `along` lands: before the first
/// measured slot whose midpoint is at or past the pointer.
///
/// Hosts can use this to place a drop indicator for a container the item has
/// not entered yet.
pub fn insertion_index(slots: &[ItemSnapshot], axis: Axis, along: f32) -> usize {
    slots
        .iter()
        .find(|slot| slot.rect.is_some_and(|rect| rect.midpoint(axis) >= along))
        .map_or(slots.len(), |slot| slot.index)
}

/// Move `item` from `from` to `to`, keeping the cache in step.
///
/// The destination's slots are captured on first entry. `restore_index`
/// overrides the midpoint-derived insertion index.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_transfer<T, G: GeometryProvider + ?Sized>(
    containers: &mut BTreeMap<ContainerKey, DropContainer<T>>,
    cache: &mut PositionCache,
    geometry: &G,
    sink: &mut DiagnosticsSink,
    item: ItemKey,
    from: ContainerKey,
    to: ContainerKey,
    pointer: Point,
    restore_index: Option<usize>,
) -> Option<Transfer> {
    let target = containers.get(&to)?;
    cache.ensure_items(target, geometry, sink);
    let axis = target.orientation().axis();

    let from_index = containers.get_mut(&from)?.exit(item)?;
    let template = cache.remove_slot(from, item).and_then(|slot| slot.rect);

    let index = restore_index.unwrap_or_else(|| {
        cache
            .items(to)
            .map_or(0, |slots| insertion_index(slots, axis, pointer.along(axis)))
    });
    let Some(target) = containers.get_mut(&to) else {
        // Put the item back where it was; `to` vanished between lookups.
        if let Some(source) = containers.get_mut(&from) {
            source.enter(item, from_index);
        }
        return None;
    };
    let to_index = target.enter(item, index);
    cache.insert_slot(to, item, to_index, template);

    debug!(item = item.0, from = from.0, to = to.0, to_index, "item transferred");
    Some(Transfer {
        from,
        from_index,
        to,
        to_index,
    })
}
