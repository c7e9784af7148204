#![forbid(unsafe_code)]

//! The drag engine: registry, pointer intake and notifications.
//!
//! [`DragEngine`] owns every container and item, the single active drag, the
//! per-drag [`PositionCache`] and the [`AutoScroller`]. The host feeds it raw
//! pointer samples and timer ticks; the engine answers with
//! [`PointerOutcome`]s, queued [`DragEvent`]s and [`ScrollRequest`]s.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use dragsort::{
//!     ContainerConfig, DragEngine, Element, GeometryProvider, LockAxis, MeasureError, Point, Rect,
//! };
//!
//! struct Rows;
//! impl GeometryProvider for Rows {
//!     fn measure(&self, element: Element) -> Result<Rect, MeasureError> {
//!         Ok(match element {
//!             Element::Container(_) => Rect::new(0.0, 0.0, 100.0, 120.0),
//!             Element::Item(item) => Rect::new(0.0, item.get() as f32 * 40.0, 100.0, 40.0),
//!         })
//!     }
//! }
//!
//! let mut engine = DragEngine::new(Rows);
//! let list = engine.register_container("list", ContainerConfig::vertical()).unwrap();
//! let a = engine.register_item(list, "a", LockAxis::None).unwrap();
//! let b = engine.register_item(list, "b", LockAxis::None).unwrap();
//!
//! let now = Instant::now();
//! engine.pointer_down(b, Point::new(50.0, 50.0), now);
//! engine.pointer_move(Point::new(50.0, 5.0), now);
//! engine.pointer_up(now);
//! assert_eq!(engine.container(list).unwrap().items(), [b, a]);
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::Instant;

use dragsort_core::geometry::{LockAxis, Point};
use dragsort_core::{debug, debug_span};

use crate::auto_scroll::{AutoScroller, ScrollRegion, ScrollRequest, ScrollTarget};
use crate::config::DragConfig;
use crate::container::{ContainerConfig, ContainerKey, DropContainer};
use crate::error::{ConfigError, RegistrationError};
use crate::event::{DragEvent, DropSummary};
use crate::item::{DragItem, ItemKey};
use crate::measure::{Diagnostic, DiagnosticsSink, GeometryProvider, ScrollAxes};
use crate::position_cache::PositionCache;
use crate::session::{ArmedGesture, DragPhase, DragSession, Gesture, IgnoreReason, PointerOutcome};
use crate::sort::{SortOutcome, SortParams, sort_step};
use crate::transfer::{apply_transfer, select_target};

/// Registry and state machine for pointer-driven reordering.
///
/// `T` is the caller's per-item payload; `G` supplies geometry.
pub struct DragEngine<T, G> {
    config: DragConfig,
    geometry: G,
    containers: BTreeMap<ContainerKey, DropContainer<T>>,
    items: BTreeMap<ItemKey, DragItem<T>>,
    next_container: u32,
    next_item: u64,
    gesture: Gesture,
    cache: Option<PositionCache>,
    scroller: AutoScroller,
    diagnostics: DiagnosticsSink,
    events: Vec<DragEvent>,
}

impl<T, G> fmt::Debug for DragEngine<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEngine")
            .field("config", &self.config)
            .field("containers", &self.containers.len())
            .field("items", &self.items.len())
            .field("phase", &self.gesture.phase())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<T, G: GeometryProvider> DragEngine<T, G> {
    /// Engine with default tuning.
    pub fn new(geometry: G) -> Self {
        let config = DragConfig::default();
        Self {
            scroller: AutoScroller::new(config.auto_scroll.clone()),
            config,
            geometry,
            containers: BTreeMap::new(),
            items: BTreeMap::new(),
            next_container: 0,
            next_item: 0,
            gesture: Gesture::Idle,
            cache: None,
            diagnostics: DiagnosticsSink::default(),
            events: Vec::new(),
        }
    }

    /// Engine with custom tuning, validated up front.
    pub fn with_config(geometry: G, config: DragConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self::new(geometry);
        engine.scroller = AutoScroller::new(config.auto_scroll.clone());
        engine.config = config;
        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable access to the geometry source, e.g. after a host relayout.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// Receive every skipped measurement.
    pub fn set_diagnostics_hook(&mut self, hook: impl FnMut(&Diagnostic) + 'static) {
        self.diagnostics.set_hook(Some(Box::new(hook)));
    }

    pub fn clear_diagnostics_hook(&mut self) {
        self.diagnostics.set_hook(None);
    }

    /// Number of measurements skipped so far.
    #[must_use]
    pub fn diagnostics_reported(&self) -> u64 {
        self.diagnostics.reported()
    }

    // --- registry -------------------------------------------------------

    /// Register a container under a unique `id`.
    ///
    /// Every id in `config.connected_to` must already be registered.
    pub fn register_container(
        &mut self,
        id: impl Into<String>,
        config: ContainerConfig<T>,
    ) -> Result<ContainerKey, RegistrationError> {
        let id = id.into();
        if self.container_by_id(&id).is_some() {
            return Err(RegistrationError::DuplicateContainerId { id });
        }
        let key = ContainerKey(self.next_container);
        let mut connected = Vec::with_capacity(config.connected_to.len());
        for other in &config.connected_to {
            if *other == id {
                return Err(RegistrationError::SelfConnection { container: key });
            }
            let other_key = self
                .container_by_id(other)
                .ok_or_else(|| RegistrationError::UnknownContainerId { id: other.clone() })?;
            if !connected.contains(&other_key) {
                connected.push(other_key);
            }
        }
        debug!(container = key.0, id = %id, connections = connected.len(), "container registered");
        self.next_container += 1;
        self.containers
            .insert(key, DropContainer::new(key, id, config, connected));
        Ok(key)
    }

    /// Remove a container and every item it holds, returning their payloads
    /// in order.
    pub fn unregister_container(
        &mut self,
        container: ContainerKey,
    ) -> Result<Vec<(ItemKey, T)>, RegistrationError> {
        if !self.containers.contains_key(&container) {
            return Err(RegistrationError::UnknownContainer { container });
        }
        let busy = match &self.gesture {
            Gesture::Armed(armed) => armed.container == container,
            Gesture::Dragging(session) => {
                session.container == container || session.initial_container == container
            }
            Gesture::Idle | Gesture::Settling { .. } => false,
        };
        if busy {
            return Err(RegistrationError::ContainerBusy { container });
        }
        let Some(mut removed) = self.containers.remove(&container) else {
            return Err(RegistrationError::UnknownContainer { container });
        };
        for other in self.containers.values_mut() {
            other.disconnect(container);
        }
        if let Some(cache) = self.cache.as_mut() {
            cache.forget(container);
        }
        if matches!(self.gesture, Gesture::Settling { item } if removed.contains(item)) {
            self.gesture = Gesture::Idle;
        }
        debug!(container = container.0, "container unregistered");
        Ok(removed
            .take_items()
            .into_iter()
            .filter_map(|key| self.items.remove(&key).map(|item| (key, item.into_data())))
            .collect())
    }

    /// Append a new item to `container`.
    ///
    /// `lock_axis` overrides the container's lock for this item when set.
    pub fn register_item(
        &mut self,
        container: ContainerKey,
        data: T,
        lock_axis: LockAxis,
    ) -> Result<ItemKey, RegistrationError> {
        let Some(target) = self.containers.get_mut(&container) else {
            return Err(RegistrationError::UnknownContainer { container });
        };
        let key = ItemKey(self.next_item);
        self.next_item += 1;
        target.push(key);
        self.items
            .insert(key, DragItem::new(key, container, data, lock_axis));
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate(container);
        }
        Ok(key)
    }

    /// Remove an item, returning its payload.
    ///
    /// The item under an armed or active drag cannot be removed.
    pub fn unregister_item(&mut self, item: ItemKey) -> Result<T, RegistrationError> {
        let Some(container) = self.items.get(&item).map(DragItem::container) else {
            return Err(RegistrationError::UnknownItem { item });
        };
        match self.gesture {
            Gesture::Armed(_) | Gesture::Dragging(_) if self.gesture.item() == Some(item) => {
                return Err(RegistrationError::ItemBusy { item });
            }
            Gesture::Settling { item: settling } if settling == item => {
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
        if let Some(owner) = self.containers.get_mut(&container) {
            owner.exit(item);
        }
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate(container);
        }
        self.items
            .remove(&item)
            .map(DragItem::into_data)
            .ok_or(RegistrationError::UnknownItem { item })
    }

    /// Let items move from `from` into `to`.
    pub fn connect(&mut self, from: ContainerKey, to: ContainerKey) -> Result<(), RegistrationError> {
        if from == to {
            return Err(RegistrationError::SelfConnection { container: from });
        }
        if !self.containers.contains_key(&to) {
            return Err(RegistrationError::UnknownContainer { container: to });
        }
        let source = self
            .containers
            .get_mut(&from)
            .ok_or(RegistrationError::UnknownContainer { container: from })?;
        source.connect(to);
        Ok(())
    }

    /// Connect `a` and `b` in both directions.
    pub fn connect_both(&mut self, a: ContainerKey, b: ContainerKey) -> Result<(), RegistrationError> {
        self.connect(a, b)?;
        self.connect(b, a)
    }

    /// Remove the connection from `from` to `to`, if any.
    pub fn disconnect(&mut self, from: ContainerKey, to: ContainerKey) -> Result<(), RegistrationError> {
        let source = self
            .containers
            .get_mut(&from)
            .ok_or(RegistrationError::UnknownContainer { container: from })?;
        source.disconnect(to);
        Ok(())
    }

    #[must_use]
    pub fn container(&self, container: ContainerKey) -> Option<&DropContainer<T>> {
        self.containers.get(&container)
    }

    /// Mutable container access for configuration changes.
    pub fn container_mut(&mut self, container: ContainerKey) -> Option<&mut DropContainer<T>> {
        self.containers.get_mut(&container)
    }

    #[must_use]
    pub fn container_by_id(&self, id: &str) -> Option<ContainerKey> {
        self.containers
            .values()
            .find(|container| container.id() == id)
            .map(DropContainer::key)
    }

    /// All containers in registration order.
    pub fn containers(&self) -> impl Iterator<Item = &DropContainer<T>> {
        self.containers.values()
    }

    #[must_use]
    pub fn item(&self, item: ItemKey) -> Option<&DragItem<T>> {
        self.items.get(&item)
    }

    pub fn item_mut(&mut self, item: ItemKey) -> Option<&mut DragItem<T>> {
        self.items.get_mut(&item)
    }

    /// All items in registration order.
    pub fn items(&self) -> impl Iterator<Item = &DragItem<T>> {
        self.items.values()
    }

    // --- state ----------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.gesture.phase()
    }

    /// The active drag, while dragging.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.gesture {
            Gesture::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// The active drag's geometry snapshot, while dragging.
    #[must_use]
    pub fn position_cache(&self) -> Option<&PositionCache> {
        self.cache.as_ref()
    }

    #[must_use]
    pub fn auto_scroller(&self) -> &AutoScroller {
        &self.scroller
    }

    /// Deadline of the next auto-scroll tick, if scrolling.
    #[must_use]
    pub fn next_scroll_deadline(&self) -> Option<Instant> {
        self.scroller.next_deadline()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<DragEvent> {
        std::mem::take(&mut self.events)
    }

    // --- pointer intake -------------------------------------------------

    /// Press on `item` at `pointer`.
    pub fn pointer_down(&mut self, item: ItemKey, pointer: Point, now: Instant) -> PointerOutcome {
        if !matches!(self.gesture, Gesture::Idle) {
            return PointerOutcome::ignored(IgnoreReason::SessionActive);
        }
        if !pointer.is_finite() {
            return PointerOutcome::ignored(IgnoreReason::NonFinitePointer);
        }
        let Some(dragged) = self.items.get(&item) else {
            return PointerOutcome::ignored(IgnoreReason::UnknownItem);
        };
        if dragged.is_disabled() {
            return PointerOutcome::ignored(IgnoreReason::ItemDisabled);
        }
        let container = dragged.container();
        let Some(owner) = self.containers.get(&container) else {
            return PointerOutcome::ignored(IgnoreReason::UnknownItem);
        };
        if owner.is_disabled() {
            return PointerOutcome::ignored(IgnoreReason::ContainerDisabled);
        }
        let Some(index) = owner.index_of(item) else {
            return PointerOutcome::ignored(IgnoreReason::UnknownItem);
        };
        self.gesture = Gesture::Armed(ArmedGesture {
            item,
            container,
            index,
            origin: pointer,
            pressed_at: now,
        });
        PointerOutcome::Armed
    }

    /// Pointer moved to `pointer`.
    pub fn pointer_move(&mut self, pointer: Point, now: Instant) -> PointerOutcome {
        let _span = debug_span!("drag_pointer_move", x = pointer.x, y = pointer.y).entered();
        if !pointer.is_finite() {
            return PointerOutcome::ignored(IgnoreReason::NonFinitePointer);
        }
        match &self.gesture {
            Gesture::Idle | Gesture::Settling { .. } => {
                PointerOutcome::ignored(IgnoreReason::NoActiveDrag)
            }
            Gesture::Armed(armed) => {
                let armed = *armed;
                if armed.origin.distance(pointer) < self.config.drag_threshold {
                    return PointerOutcome::ignored(IgnoreReason::ThresholdNotReached);
                }
                if now.saturating_duration_since(armed.pressed_at) < self.config.start_delay {
                    debug!(item = armed.item.0, "drag abandoned before start delay");
                    self.gesture = Gesture::Idle;
                    return PointerOutcome::Abandoned;
                }
                self.start_drag(armed);
                self.with_drag(|engine, session, cache| {
                    engine.drag_move(session, cache, pointer, Some(now));
                });
                PointerOutcome::Started
            }
            Gesture::Dragging(_) => {
                self.with_drag(|engine, session, cache| {
                    engine.drag_move(session, cache, pointer, Some(now));
                });
                PointerOutcome::Updated
            }
        }
    }

    /// Pointer released.
    ///
    /// Releasing an armed gesture is a click and emits nothing.
    pub fn pointer_up(&mut self, _now: Instant) -> PointerOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Armed(_) => PointerOutcome::Released,
            Gesture::Dragging(session) => {
                let cache = self.cache.take().unwrap_or_default();
                self.finish_drop(*session, &cache);
                PointerOutcome::Dropped
            }
            other => {
                self.gesture = other;
                PointerOutcome::ignored(IgnoreReason::NoActiveDrag)
            }
        }
    }

    /// Abort the gesture, restoring the item to where it started.
    ///
    /// Returns `false` when there was nothing to cancel. Cancelling while
    /// settling simply completes the settle.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Settling { .. } => true,
            Gesture::Armed(armed) => {
                debug!(item = armed.item.0, "armed gesture cancelled");
                self.events.push(DragEvent::Cancelled {
                    item: armed.item,
                    container: armed.container,
                    index: armed.index,
                });
                true
            }
            Gesture::Dragging(session) => {
                self.restore(&session);
                self.scroller.stop();
                self.cache = None;
                debug!(item = session.item.0, "drag cancelled");
                self.events.push(DragEvent::Cancelled {
                    item: session.item,
                    container: session.initial_container,
                    index: session.initial_index,
                });
                true
            }
        }
    }

    /// The renderer finished the landing animation.
    pub fn settle_complete(&mut self) -> bool {
        if matches!(self.gesture, Gesture::Settling { .. }) {
            self.gesture = Gesture::Idle;
            true
        } else {
            false
        }
    }

    /// Advance the auto-scroll cadence.
    pub fn tick(&mut self, now: Instant) -> Option<ScrollRequest> {
        if !matches!(self.gesture, Gesture::Dragging(_)) {
            return None;
        }
        self.scroller.tick(now)
    }

    /// The host applied a scroll of `delta` to `target`.
    ///
    /// Cached geometry follows without re-measuring, then sorting and
    /// transfer are re-evaluated at the last pointer position.
    pub fn scrolled(&mut self, target: ScrollTarget, delta: Point) -> bool {
        if !matches!(self.gesture, Gesture::Dragging(_)) || !delta.is_finite() {
            return false;
        }
        self.with_drag(|engine, session, cache| {
            cache.adjust_after_scroll(target, delta);
            if target == ScrollTarget::Viewport {
                session.scroll_delta += delta;
            }
            let pointer = session.last_pointer;
            engine.drag_move(session, cache, pointer, None);
        });
        true
    }

    // --- internals ------------------------------------------------------

    /// Run `f` with the active session and cache taken out of `self`.
    fn with_drag(&mut self, f: impl FnOnce(&mut Self, &mut DragSession, &mut PositionCache)) {
        let Gesture::Dragging(mut session) = std::mem::take(&mut self.gesture) else {
            return;
        };
        let mut cache = self.cache.take().unwrap_or_default();
        f(self, &mut session, &mut cache);
        self.cache = Some(cache);
        self.gesture = Gesture::Dragging(session);
    }

    /// Containers reachable from `start` along connections, `start` first.
    fn reachable(&self, start: ContainerKey) -> Vec<ContainerKey> {
        let mut seen = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(key) = queue.pop_front() {
            let Some(container) = self.containers.get(&key) else {
                continue;
            };
            for &next in container.connected() {
                if !seen.contains(&next) {
                    seen.push(next);
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    fn start_drag(&mut self, armed: ArmedGesture) {
        let Some(owner) = self.containers.get(&armed.container) else {
            self.gesture = Gesture::Idle;
            return;
        };
        let container_lock = owner.lock_axis();
        let index = owner.index_of(armed.item).unwrap_or(armed.index);
        let Some(item_lock) = self.items.get(&armed.item).map(DragItem::lock_axis) else {
            self.gesture = Gesture::Idle;
            return;
        };

        let reachable = self.reachable(armed.container);
        let cache = PositionCache::capture(
            reachable.iter().filter_map(|key| self.containers.get(key)),
            armed.container,
            &self.geometry,
            &mut self.diagnostics,
        );
        let pickup_origin = cache
            .item_rect(armed.item)
            .map_or(armed.origin, |rect| rect.origin());

        let session = DragSession::new(
            armed.item,
            armed.container,
            index,
            armed.origin,
            pickup_origin,
            item_lock.or(container_lock),
            self.geometry.viewport_scroll(),
        );
        debug!(
            item = armed.item.0,
            container = armed.container.0,
            index,
            cached_containers = reachable.len(),
            "drag started"
        );
        self.cache = Some(cache);
        self.gesture = Gesture::Dragging(Box::new(session));
        self.events.push(DragEvent::Started {
            item: armed.item,
            container: armed.container,
        });
    }

    /// One drag step at `pointer`. `now` is `None` when re-evaluating after a
    /// host scroll, which leaves the auto-scroll state alone.
    fn drag_move(
        &mut self,
        session: &mut DragSession,
        cache: &mut PositionCache,
        pointer: Point,
        now: Option<Instant>,
    ) {
        let item = session.item;
        session.last_pointer = pointer;
        session.has_moved = true;

        let Some(dragged) = self.items.get_mut(&item) else {
            return;
        };
        dragged.set_active_offset(session.raw_offset(pointer), session.lock_axis);
        self.events.push(DragEvent::Moved {
            item,
            pointer,
            offset: dragged.active_offset(),
        });

        if let Some(current) = self.containers.get(&session.container) {
            cache.ensure_items(current, &self.geometry, &mut self.diagnostics);
            for key in current.connected() {
                if let Some(other) = self.containers.get(key) {
                    cache.ensure_container(other, &self.geometry, &mut self.diagnostics);
                }
            }
        }

        if let Some(now) = now {
            let regions = self.scroll_regions(session, cache, pointer);
            self.scroller.update(&regions, pointer, now);
        }

        let constrained = session.constrained(pointer);
        let visual = session.visual_rect(constrained, cache.item_rect(item));
        if let Some(current) = self.containers.get_mut(&session.container) {
            let params = SortParams {
                dead_zone: self.config.dead_zone,
                sort_proximity: self.config.sort_proximity,
            };
            if let SortOutcome::Moved { from, to } = sort_step(
                current,
                cache,
                item,
                constrained,
                visual,
                &mut session.previous_swap,
                params,
            ) {
                self.events.push(DragEvent::Sorted {
                    item,
                    container: session.container,
                    previous_index: from,
                    current_index: to,
                });
            }
        }

        let Some(dragged) = self.items.get(&item) else {
            return;
        };
        let Some(target) = select_target(
            &self.containers,
            cache,
            dragged,
            session.container,
            constrained,
            self.config.transfer_tolerance,
            |key| session.entry_stamp(key),
        ) else {
            return;
        };
        let restore_index = (target == session.initial_container
            && self
                .containers
                .get(&target)
                .is_some_and(DropContainer::is_sorting_disabled))
        .then_some(session.initial_index);
        let Some(moved) = apply_transfer(
            &mut self.containers,
            cache,
            &self.geometry,
            &mut self.diagnostics,
            item,
            session.container,
            target,
            constrained,
            restore_index,
        ) else {
            return;
        };
        if let Some(dragged) = self.items.get_mut(&item) {
            dragged.set_container(moved.to);
        }
        session.container = moved.to;
        session.previous_swap = None;
        session.mark_entered(moved.to);
        self.events.push(DragEvent::Exited {
            item,
            container: moved.from,
        });
        self.events.push(DragEvent::Entered {
            item,
            container: moved.to,
            current_index: moved.to_index,
        });
    }

    /// Scrollable regions under `pointer`, innermost first.
    ///
    /// Empty when the hovered container opts out of auto-scroll.
    fn scroll_regions(
        &self,
        session: &DragSession,
        cache: &PositionCache,
        pointer: Point,
    ) -> Vec<ScrollRegion> {
        let connected = self
            .containers
            .get(&session.container)
            .map(DropContainer::connected)
            .unwrap_or_default();
        let hovered = std::iter::once(&session.container)
            .chain(connected)
            .filter_map(|key| Some((*key, cache.container_rect(*key)?)))
            .find(|(_, rect)| rect.contains(pointer));

        let mut regions = Vec::with_capacity(2);
        if let Some((key, rect)) = hovered {
            if self
                .containers
                .get(&key)
                .is_some_and(DropContainer::is_auto_scroll_disabled)
            {
                return regions;
            }
            let axes = self.geometry.scroll_axes(key);
            if !axes.is_empty() {
                regions.push(ScrollRegion {
                    target: ScrollTarget::Container(key),
                    rect,
                    axes,
                });
            }
        }
        if let Some(rect) = self.geometry.viewport() {
            regions.push(ScrollRegion {
                target: ScrollTarget::Viewport,
                rect,
                axes: ScrollAxes::BOTH,
            });
        }
        regions
    }

    fn finish_drop(&mut self, session: DragSession, cache: &PositionCache) {
        self.scroller.stop();
        let item = session.item;
        let pointer = session.last_pointer;
        let container = session.container;
        let current_index = self
            .containers
            .get(&container)
            .and_then(|owner| owner.drop_item(item))
            .unwrap_or(session.initial_index);

        let over = |key: &ContainerKey| {
            cache
                .container_rect(*key)
                .is_some_and(|rect| rect.contains(pointer))
        };
        let is_pointer_over_container = over(&container)
            || self.containers.get(&container).is_some_and(|owner| {
                owner.connected().iter().any(|key| {
                    self.containers
                        .get(key)
                        .is_some_and(|other| !other.is_disabled())
                        && over(key)
                })
            });

        let container_changed = container != session.initial_container;
        let mut settle_delta = Point::ZERO;
        if let Some(dragged) = self.items.get_mut(&item) {
            let active = dragged.active_offset();
            let visual = session.pickup_origin - session.scroll_delta + active;
            settle_delta = cache
                .item_rect(item)
                .map_or(-active, |slot| slot.origin() - visual);
            dragged.settle(container_changed);
        }

        let summary = DropSummary {
            item,
            previous_container: session.initial_container,
            container,
            previous_index: session.initial_index,
            current_index,
            is_pointer_over_container,
            distance: pointer - session.pickup_pointer(),
            drop_point: pointer,
            settle_delta,
        };
        debug!(
            item = item.0,
            from = session.initial_container.0,
            to = container.0,
            previous_index = session.initial_index,
            current_index,
            "item dropped"
        );
        self.events.push(DragEvent::Dropped(summary));
        self.gesture = Gesture::Settling { item };
    }

    /// Put the dragged item back at its initial container and index.
    fn restore(&mut self, session: &DragSession) {
        let item = session.item;
        if session.container != session.initial_container {
            if let Some(current) = self.containers.get_mut(&session.container) {
                current.exit(item);
            }
            if let Some(initial) = self.containers.get_mut(&session.initial_container) {
                initial.enter(item, session.initial_index);
            }
        } else if let Some(initial) = self.containers.get_mut(&session.initial_container)
            && let Some(index) = initial.index_of(item)
            && index != session.initial_index
        {
            initial.sort(index, session.initial_index);
        }
        if let Some(dragged) = self.items.get_mut(&item) {
            dragged.set_container(session.initial_container);
            dragged.clear_active_offset();
        }
    }
}
