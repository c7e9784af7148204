#![forbid(unsafe_code)]

//! Drop containers: ordered item sequences and their sort/transfer policy.
//!
//! # Invariants
//!
//! 1. The order sequence never holds the same item twice.
//! 2. An item is held by exactly one container; the engine moves items between
//!    containers with a single remove-then-insert call.
//! 3. Only the engine mutates order sequences; hosts observe them through
//!    [`DropContainer::items`].

use std::fmt;

use dragsort_core::geometry::{LockAxis, Orientation};
use dragsort_core::trace;

use crate::item::{DragItem, ItemKey};
use crate::order;

/// Opaque handle identifying a registered [`DropContainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerKey(pub(crate) u32);

impl ContainerKey {
    /// Raw handle value, stable for the lifetime of the container.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Gate deciding whether an item may enter a container.
pub type EnterPredicate<T> = Box<dyn Fn(&DragItem<T>, &DropContainer<T>) -> bool>;

/// Per-container options supplied at registration.
pub struct ContainerConfig<T> {
    /// Layout direction of the items (default: vertical).
    pub orientation: Orientation,
    /// Lock applied to items that do not set their own (default: none).
    pub lock_axis: LockAxis,
    /// When set, dragging never reorders this container.
    pub sorting_disabled: bool,
    /// When set, hovering this container never triggers auto-scroll.
    pub auto_scroll_disabled: bool,
    /// Disabled containers neither start drags nor accept items.
    pub disabled: bool,
    /// Ids of already-registered containers this one may pass items to.
    pub connected_to: Vec<String>,
    enter_predicate: Option<EnterPredicate<T>>,
}

impl<T> Default for ContainerConfig<T> {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            lock_axis: LockAxis::None,
            sorting_disabled: false,
            auto_scroll_disabled: false,
            disabled: false,
            connected_to: Vec::new(),
            enter_predicate: None,
        }
    }
}

impl<T> fmt::Debug for ContainerConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("orientation", &self.orientation)
            .field("lock_axis", &self.lock_axis)
            .field("sorting_disabled", &self.sorting_disabled)
            .field("auto_scroll_disabled", &self.auto_scroll_disabled)
            .field("disabled", &self.disabled)
            .field("connected_to", &self.connected_to)
            .field("enter_predicate", &self.enter_predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<T> ContainerConfig<T> {
    /// A vertical list.
    #[must_use]
    pub fn vertical() -> Self {
        Self::default()
    }

    /// A horizontal list.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_lock_axis(mut self, lock_axis: LockAxis) -> Self {
        self.lock_axis = lock_axis;
        self
    }

    #[must_use]
    pub fn with_sorting_disabled(mut self, disabled: bool) -> Self {
        self.sorting_disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_auto_scroll_disabled(mut self, disabled: bool) -> Self {
        self.auto_scroll_disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Allow items to move from this container into the listed ones.
    #[must_use]
    pub fn connected_to<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connected_to.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Gate entry into this container.
    #[must_use]
    pub fn with_enter_predicate(
        mut self,
        predicate: impl Fn(&DragItem<T>, &DropContainer<T>) -> bool + 'static,
    ) -> Self {
        self.enter_predicate = Some(Box::new(predicate));
        self
    }
}

/// An ordered collection of items with its own sort and transfer policy.
pub struct DropContainer<T> {
    key: ContainerKey,
    id: String,
    orientation: Orientation,
    lock_axis: LockAxis,
    sorting_disabled: bool,
    auto_scroll_disabled: bool,
    disabled: bool,
    enter_predicate: Option<EnterPredicate<T>>,
    connected: Vec<ContainerKey>,
    items: Vec<ItemKey>,
}

impl<T> fmt::Debug for DropContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropContainer")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("orientation", &self.orientation)
            .field("sorting_disabled", &self.sorting_disabled)
            .field("disabled", &self.disabled)
            .field("connected", &self.connected)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<T> DropContainer<T> {
    /// Build a container from its config; `connected` must already be
    /// resolved from `config.connected_to`.
    pub(crate) fn new(
        key: ContainerKey,
        id: String,
        config: ContainerConfig<T>,
        connected: Vec<ContainerKey>,
    ) -> Self {
        Self {
            key,
            id,
            orientation: config.orientation,
            lock_axis: config.lock_axis,
            sorting_disabled: config.sorting_disabled,
            auto_scroll_disabled: config.auto_scroll_disabled,
            disabled: config.disabled,
            enter_predicate: config.enter_predicate,
            connected,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> ContainerKey {
        self.key
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Authoritative logical order.
    #[must_use]
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, item: ItemKey) -> Option<usize> {
        self.items.iter().position(|&k| k == item)
    }

    #[must_use]
    pub fn contains(&self, item: ItemKey) -> bool {
        self.items.contains(&item)
    }

    /// Containers this one may pass items to, in connection order.
    #[must_use]
    pub fn connected(&self) -> &[ContainerKey] {
        &self.connected
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    #[must_use]
    pub fn lock_axis(&self) -> LockAxis {
        self.lock_axis
    }

    pub fn set_lock_axis(&mut self, lock_axis: LockAxis) {
        self.lock_axis = lock_axis;
    }

    #[must_use]
    pub fn is_sorting_disabled(&self) -> bool {
        self.sorting_disabled
    }

    pub fn set_sorting_disabled(&mut self, disabled: bool) {
        self.sorting_disabled = disabled;
    }

    #[must_use]
    pub fn is_auto_scroll_disabled(&self) -> bool {
        self.auto_scroll_disabled
    }

    pub fn set_auto_scroll_disabled(&mut self, disabled: bool) {
        self.auto_scroll_disabled = disabled;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Replace (or clear) the enter predicate.
    pub fn set_enter_predicate(&mut self, predicate: Option<EnterPredicate<T>>) {
        self.enter_predicate = predicate;
    }

    /// Whether `item` may enter: the container is enabled and its predicate,
    /// if any, accepts the item.
    #[must_use]
    pub fn can_enter(&self, item: &DragItem<T>) -> bool {
        !self.disabled
            && self
                .enter_predicate
                .as_ref()
                .is_none_or(|predicate| predicate(item, self))
    }

    pub(crate) fn connect(&mut self, other: ContainerKey) {
        if other != self.key && !self.connected.contains(&other) {
            self.connected.push(other);
        }
    }

    pub(crate) fn disconnect(&mut self, other: ContainerKey) {
        self.connected.retain(|&k| k != other);
    }

    /// Append a newly registered item.
    pub(crate) fn push(&mut self, item: ItemKey) {
        debug_assert!(!self.contains(item));
        self.items.push(item);
    }

    /// Reorder: move the item at `from` to `to`.
    pub(crate) fn sort(&mut self, from: usize, to: usize) {
        trace!(container = self.key.0, from, to, "container sort");
        order::move_item(&mut self.items, from, to);
    }

    /// Insert an arriving item at `index` (clamped); returns the final index.
    pub(crate) fn enter(&mut self, item: ItemKey, index: usize) -> usize {
        debug_assert!(!self.contains(item));
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        index
    }

    /// Remove a departing item; returns the index it held.
    pub(crate) fn exit(&mut self, item: ItemKey) -> Option<usize> {
        let index = self.index_of(item)?;
        self.items.remove(index);
        Some(index)
    }

    /// Commit the final position of `item` after a drop.
    pub(crate) fn drop_item(&self, item: ItemKey) -> Option<usize> {
        let index = self.index_of(item);
        trace!(container = self.key.0, ?index, "container drop");
        index
    }

    pub(crate) fn take_items(&mut self) -> Vec<ItemKey> {
        std::mem::take(&mut self.items)
    }
}
