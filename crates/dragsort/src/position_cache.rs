#![forbid(unsafe_code)]

//! Per-drag geometry snapshot.
//!
//! Reading geometry from the host is expensive, so a drag measures each
//! container once and then keeps the snapshot consistent arithmetically:
//!
//! - reorders shift sibling slots by the dragged slot's extent
//!   ([`PositionCache::move_slot`]),
//! - transfers remove and insert slots the same way,
//! - scrolls translate rects by the known delta
//!   ([`PositionCache::adjust_after_scroll`]).
//!
//! Item entries of sibling containers are captured lazily the first time the
//! pointer enters them. Entries whose rect could not be measured are kept
//! with `rect: None` so logical indices stay aligned with the container order.

use dragsort_core::geometry::{Axis, Point, Rect};
use dragsort_core::trace;

use crate::auto_scroll::ScrollTarget;
use crate::container::{ContainerKey, DropContainer};
use crate::item::ItemKey;
use crate::measure::{DiagnosticsSink, Element, GeometryProvider};

/// Snapshot of one item slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSnapshot {
    pub item: ItemKey,
    /// `None` when the host could not measure the item.
    pub rect: Option<Rect>,
    /// Logical index within the container.
    pub index: usize,
}

/// Snapshot of one container and (once captured) its items.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSnapshot {
    pub container: ContainerKey,
    /// `None` when the host could not measure the container.
    pub rect: Option<Rect>,
    axis: Axis,
    items: Option<Vec<ItemSnapshot>>,
}

impl ContainerSnapshot {
    /// Item slots in logical order, if captured.
    #[must_use]
    pub fn items(&self) -> Option<&[ItemSnapshot]> {
        self.items.as_deref()
    }

    /// Sort axis recorded at capture.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

/// Geometry cache owned by the active drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionCache {
    containers: Vec<ContainerSnapshot>,
}

impl PositionCache {
    /// Snapshot the container rects of `containers` and the items of `active`.
    ///
    /// Never fails: unmeasurable entities are reported to `sink` and cached
    /// with `rect: None`.
    pub(crate) fn capture<'a, T: 'a, G: GeometryProvider + ?Sized>(
        containers: impl IntoIterator<Item = &'a DropContainer<T>>,
        active: ContainerKey,
        geometry: &G,
        sink: &mut DiagnosticsSink,
    ) -> Self {
        let mut cache = Self::default();
        for container in containers {
            cache.ensure_container(container, geometry, sink);
            if container.key() == active {
                cache.ensure_items(container, geometry, sink);
            }
        }
        cache
    }

    /// Capture `container`'s rect if it is not cached yet.
    pub(crate) fn ensure_container<T, G: GeometryProvider + ?Sized>(
        &mut self,
        container: &DropContainer<T>,
        geometry: &G,
        sink: &mut DiagnosticsSink,
    ) {
        if self.snapshot(container.key()).is_some() {
            return;
        }
        let rect = sink.measure(geometry, Element::Container(container.key()));
        self.containers.push(ContainerSnapshot {
            container: container.key(),
            rect,
            axis: container.orientation().axis(),
            items: None,
        });
    }

    /// Capture `container`'s item slots if they are not cached yet.
    ///
    /// Returns `true` when a capture happened.
    pub(crate) fn ensure_items<T, G: GeometryProvider + ?Sized>(
        &mut self,
        container: &DropContainer<T>,
        geometry: &G,
        sink: &mut DiagnosticsSink,
    ) -> bool {
        self.ensure_container(container, geometry, sink);
        let Some(snapshot) = self.snapshot_mut(container.key()) else {
            return false;
        };
        if snapshot.items.is_some() {
            return false;
        }
        let items = container
            .items()
            .iter()
            .enumerate()
            .map(|(index, &item)| ItemSnapshot {
                item,
                rect: sink.measure(geometry, Element::Item(item)),
                index,
            })
            .collect::<Vec<_>>();
        trace!(
            container = container.key().0,
            count = items.len(),
            "captured item positions"
        );
        snapshot.axis = container.orientation().axis();
        snapshot.items = Some(items);
        true
    }

    #[must_use]
    pub fn snapshot(&self, container: ContainerKey) -> Option<&ContainerSnapshot> {
        self.containers.iter().find(|s| s.container == container)
    }

    fn snapshot_mut(&mut self, container: ContainerKey) -> Option<&mut ContainerSnapshot> {
        self.containers.iter_mut().find(|s| s.container == container)
    }

    /// All cached containers, in capture order.
    pub fn snapshots(&self) -> impl Iterator<Item = &ContainerSnapshot> {
        self.containers.iter()
    }

    #[must_use]
    pub fn container_rect(&self, container: ContainerKey) -> Option<Rect> {
        self.snapshot(container).and_then(|s| s.rect)
    }

    /// Item slots of `container`, if captured.
    #[must_use]
    pub fn items(&self, container: ContainerKey) -> Option<&[ItemSnapshot]> {
        self.snapshot(container).and_then(ContainerSnapshot::items)
    }

    #[must_use]
    pub fn has_items(&self, container: ContainerKey) -> bool {
        self.items(container).is_some()
    }

    /// Cached slot rect of `item`, wherever it lives.
    #[must_use]
    pub fn item_rect(&self, item: ItemKey) -> Option<Rect> {
        self.containers
            .iter()
            .filter_map(|s| s.items.as_deref())
            .flatten()
            .find(|entry| entry.item == item)
            .and_then(|entry| entry.rect)
    }

    /// Forget `container`'s item slots; they are re-measured on next use.
    pub fn invalidate(&mut self, container: ContainerKey) {
        if let Some(snapshot) = self.snapshot_mut(container) {
            snapshot.items = None;
        }
    }

    /// Forget a container entirely.
    pub(crate) fn forget(&mut self, container: ContainerKey) {
        self.containers.retain(|s| s.container != container);
    }

    /// Account for a scroll of `delta` without re-measuring.
    ///
    /// Scrolling content by `delta` moves what it contains by `-delta` in
    /// client space. A viewport scroll moves every cached rect; a container
    /// scroll moves only that container's items.
    pub fn adjust_after_scroll(&mut self, target: ScrollTarget, delta: Point) {
        let shift = -delta;
        for snapshot in &mut self.containers {
            let whole = match target {
                ScrollTarget::Viewport => true,
                ScrollTarget::Container(key) if key == snapshot.container => false,
                ScrollTarget::Container(_) => continue,
            };
            if whole && let Some(rect) = snapshot.rect.as_mut() {
                *rect = rect.translate(shift);
            }
            for entry in snapshot.items.iter_mut().flatten() {
                if let Some(rect) = entry.rect.as_mut() {
                    *rect = rect.translate(shift);
                }
            }
        }
    }

    /// Move the slot at `from` to `to`, shifting the slots in between by the
    /// moved slot's extent (plus the gap to its neighbour).
    pub(crate) fn move_slot(&mut self, container: ContainerKey, from: usize, to: usize) {
        let Some(snapshot) = self.snapshot_mut(container) else {
            return;
        };
        let axis = snapshot.axis;
        let Some(items) = snapshot.items.as_mut() else {
            return;
        };
        if from == to || from >= items.len() || to >= items.len() {
            return;
        }
        let forward = to > from;
        let current = items[from].rect;
        let target = items[to].rect;

        let item_offset = match (current, target) {
            (Some(c), Some(t)) if forward => t.end(axis) - c.end(axis),
            (Some(c), Some(t)) => t.start(axis) - c.start(axis),
            _ => 0.0,
        };
        let sibling_offset = current.map_or(0.0, |c| {
            let neighbour = if forward {
                items.get(from + 1)
            } else {
                from.checked_sub(1).and_then(|i| items.get(i))
            }
            .and_then(|entry| entry.rect);
            let gap = neighbour.map_or(0.0, |n| {
                if forward {
                    n.start(axis) - c.end(axis)
                } else {
                    c.start(axis) - n.end(axis)
                }
            });
            let span = c.extent(axis) + gap;
            if forward { -span } else { span }
        });

        let between = if forward {
            from + 1..=to
        } else {
            to..=from - 1
        };
        shift_slots(&mut items[between], axis, sibling_offset);
        if let Some(rect) = items[from].rect.as_mut() {
            *rect = rect.translate(Point::on_axis(axis, item_offset));
        }
        crate::order::move_item(items, from, to);
        reindex(items);
    }

    /// Remove `item`'s slot, closing the gap it leaves behind.
    ///
    /// Returns the removed slot (with its last known rect).
    pub(crate) fn remove_slot(
        &mut self,
        container: ContainerKey,
        item: ItemKey,
    ) -> Option<ItemSnapshot> {
        let snapshot = self.snapshot_mut(container)?;
        let axis = snapshot.axis;
        let items = snapshot.items.as_mut()?;
        let index = items.iter().position(|entry| entry.item == item)?;
        let removed = items.remove(index);
        if let Some(rect) = removed.rect {
            let gap = items
                .get(index)
                .and_then(|next| next.rect)
                .map_or(0.0, |next| next.start(axis) - rect.end(axis));
            shift_slots(&mut items[index..], axis, -(rect.extent(axis) + gap));
        }
        reindex(items);
        Some(removed)
    }

    /// Open a slot for `item` at `index` (clamped), sized like `template`.
    ///
    /// Slots from `index` onward shift by the new slot's extent plus the
    /// container's typical gap. Returns the index used.
    pub(crate) fn insert_slot(
        &mut self,
        container: ContainerKey,
        item: ItemKey,
        index: usize,
        template: Option<Rect>,
    ) -> Option<usize> {
        let snapshot = self.snapshot_mut(container)?;
        let axis = snapshot.axis;
        let container_rect = snapshot.rect;
        let items = snapshot.items.as_mut()?;
        let index = index.min(items.len());
        let gap = typical_gap(items, axis);

        let origin = if let Some(rect) = items.get(index).and_then(|entry| entry.rect) {
            Some(rect.origin())
        } else if let Some(rect) = index
            .checked_sub(1)
            .and_then(|i| items.get(i))
            .and_then(|entry| entry.rect)
        {
            Some(rect.origin() + Point::on_axis(axis, rect.extent(axis) + gap))
        } else {
            container_rect.map(|r| r.origin())
        };

        let rect = template
            .zip(origin)
            .map(|(t, o)| Rect::new(o.x, o.y, t.width, t.height));
        if let Some(r) = rect {
            shift_slots(&mut items[index..], axis, r.extent(axis) + gap);
        }
        items.insert(index, ItemSnapshot { item, rect, index });
        reindex(items);
        Some(index)
    }
}

fn shift_slots(slots: &mut [ItemSnapshot], axis: Axis, amount: f32) {
    if amount == 0.0 {
        return;
    }
    for entry in slots {
        if let Some(rect) = entry.rect.as_mut() {
            *rect = rect.translate(Point::on_axis(axis, amount));
        }
    }
}

fn reindex(items: &mut [ItemSnapshot]) {
    for (index, entry) in items.iter_mut().enumerate() {
        entry.index = index;
    }
}

/// Gap between the first two measured neighbours, never negative.
fn typical_gap(items: &[ItemSnapshot], axis: Axis) -> f32 {
    items
        .windows(2)
        .find_map(|pair| match (pair[0].rect, pair[1].rect) {
            (Some(a), Some(b)) => Some((b.start(axis) - a.end(axis)).max(0.0)),
            _ => None,
        })
        .unwrap_or(0.0)
}
