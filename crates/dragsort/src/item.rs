#![forbid(unsafe_code)]

//! Draggable items.

use dragsort_core::geometry::{LockAxis, Point};

use crate::container::ContainerKey;

/// Opaque handle identifying a registered [`DragItem`].
///
/// Handles are never reused within one engine, so equality of handles is
/// identity of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemKey(pub(crate) u64);

impl ItemKey {
    /// Raw handle value, stable for the lifetime of the item.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A draggable entity and its visual offsets.
///
/// The rendered displacement of an item is [`transform`](Self::transform):
/// the resting `passive_offset` plus the in-progress `active_offset`.
#[derive(Debug)]
pub struct DragItem<T> {
    key: ItemKey,
    container: ContainerKey,
    data: T,
    lock_axis: LockAxis,
    disabled: bool,
    passive_offset: Point,
    active_offset: Point,
}

impl<T> DragItem<T> {
    pub(crate) fn new(key: ItemKey, container: ContainerKey, data: T, lock_axis: LockAxis) -> Self {
        Self {
            key,
            container,
            data,
            lock_axis,
            disabled: false,
            passive_offset: Point::ZERO,
            active_offset: Point::ZERO,
        }
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// Container whose order sequence currently holds this item.
    #[must_use]
    pub fn container(&self) -> ContainerKey {
        self.container
    }

    /// Caller-owned payload.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    #[must_use]
    pub fn lock_axis(&self) -> LockAxis {
        self.lock_axis
    }

    pub fn set_lock_axis(&mut self, lock_axis: LockAxis) {
        self.lock_axis = lock_axis;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabled items ignore pointer-down.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Resting offset kept across drags.
    #[must_use]
    pub fn passive_offset(&self) -> Point {
        self.passive_offset
    }

    /// Set the resting offset, e.g. when restoring a saved layout.
    pub fn set_passive_offset(&mut self, offset: Point) {
        self.passive_offset = offset;
    }

    /// Offset applied only while the pointer is down.
    #[must_use]
    pub fn active_offset(&self) -> Point {
        self.active_offset
    }

    /// Total displacement the renderer should apply.
    #[must_use]
    pub fn transform(&self) -> Point {
        self.passive_offset + self.active_offset
    }

    pub(crate) fn set_container(&mut self, container: ContainerKey) {
        self.container = container;
    }

    /// Store a raw drag displacement, dropping the components `lock` forbids.
    pub(crate) fn set_active_offset(&mut self, raw: Point, lock: LockAxis) {
        self.active_offset = lock.filter(raw);
    }

    pub(crate) fn clear_active_offset(&mut self) {
        self.active_offset = Point::ZERO;
    }

    /// Settle after a drop: the active offset is cleared, and the passive
    /// offset is zeroed when the item landed in a different container.
    pub(crate) fn settle(&mut self, container_changed: bool) {
        self.active_offset = Point::ZERO;
        if container_changed {
            self.passive_offset = Point::ZERO;
        }
    }

    pub(crate) fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> DragItem<&'static str> {
        DragItem::new(ItemKey(1), ContainerKey(0), "card", LockAxis::None)
    }

    #[test]
    fn new_item_has_no_offsets() {
        let it = item();
        assert_eq!(it.transform(), Point::ZERO);
        assert_eq!(*it.data(), "card");
        assert!(!it.is_disabled());
    }

    #[test]
    fn active_offset_honors_lock() {
        let mut it = item();
        it.set_active_offset(Point::new(12.0, -7.0), LockAxis::Y);
        assert_eq!(it.active_offset(), Point::new(0.0, -7.0));
    }

    #[test]
    fn transform_composes_passive_and_active() {
        let mut it = item();
        it.set_passive_offset(Point::new(3.0, 4.0));
        it.set_active_offset(Point::new(1.0, 1.0), LockAxis::None);
        assert_eq!(it.transform(), Point::new(4.0, 5.0));
    }

    #[test]
    fn settle_keeps_passive_in_same_container() {
        let mut it = item();
        it.set_passive_offset(Point::new(3.0, 4.0));
        it.set_active_offset(Point::new(9.0, 9.0), LockAxis::None);
        it.settle(false);
        assert_eq!(it.active_offset(), Point::ZERO);
        assert_eq!(it.passive_offset(), Point::new(3.0, 4.0));
    }

    #[test]
    fn settle_resets_passive_on_container_change() {
        let mut it = item();
        it.set_passive_offset(Point::new(3.0, 4.0));
        it.settle(true);
        assert_eq!(it.transform(), Point::ZERO);
    }
}
