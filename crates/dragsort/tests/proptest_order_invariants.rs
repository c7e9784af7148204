//! Property-based invariant tests for item ownership and ordering.
//!
//! Random pointer trajectories are replayed over three connected lists:
//!
//! 1. Every item is held by exactly one container, exactly once, and its
//!    `container()` agrees with the holder, after every step.
//! 2. Cancel restores every container's order and is idempotent.
//! 3. A drop reports the item's final container and index.
//! 4. Oscillating within the dead-zone yields at most one `Sorted`.
//! 5. The active offset obeys the lock axis.
//! 6. Ending a trajectory at the pickup point leaves every order unchanged.

use std::collections::HashMap;
use std::time::Instant;

use dragsort::{
    ContainerConfig, ContainerKey, DragConfig, DragEngine, DragEvent, Element, GeometryProvider,
    ItemKey, LockAxis, MeasureError, Point, Rect,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Layout(HashMap<Element, Rect>);

impl GeometryProvider for Layout {
    fn measure(&self, element: Element) -> Result<Rect, MeasureError> {
        self.0
            .get(&element)
            .copied()
            .ok_or_else(|| MeasureError::unavailable("not laid out"))
    }
}

type Engine = DragEngine<u32, Layout>;

/// Three 100x400 columns at x = 0, 150, 300, all connected both ways.
fn columns(counts: [usize; 3], config: DragConfig) -> (Engine, Vec<ContainerKey>, Vec<ItemKey>) {
    let mut engine = DragEngine::with_config(Layout::default(), config).unwrap();
    let mut keys = Vec::new();
    let mut items = Vec::new();
    for (col, &count) in counts.iter().enumerate() {
        let x = col as f32 * 150.0;
        let key = engine
            .register_container(format!("col{col}"), ContainerConfig::vertical())
            .unwrap();
        engine
            .geometry_mut()
            .0
            .insert(Element::Container(key), Rect::new(x, 0.0, 100.0, 400.0));
        for row in 0..count {
            let item = engine
                .register_item(key, (col * 100 + row) as u32, LockAxis::None)
                .unwrap();
            engine.geometry_mut().0.insert(
                Element::Item(item),
                Rect::new(x, row as f32 * 40.0, 100.0, 40.0),
            );
            items.push(item);
        }
        keys.push(key);
    }
    for i in 0..keys.len() {
        for j in i + 1..keys.len() {
            engine.connect_both(keys[i], keys[j]).unwrap();
        }
    }
    (engine, keys, items)
}

fn orders(engine: &Engine, keys: &[ContainerKey]) -> Vec<Vec<ItemKey>> {
    keys.iter()
        .map(|&k| engine.container(k).unwrap().items().to_vec())
        .collect()
}

fn assert_ownership(engine: &Engine, keys: &[ContainerKey], items: &[ItemKey]) -> Result<(), TestCaseError> {
    let mut seen: HashMap<ItemKey, usize> = HashMap::new();
    for &key in keys {
        for &item in engine.container(key).unwrap().items() {
            *seen.entry(item).or_default() += 1;
            prop_assert_eq!(engine.item(item).unwrap().container(), key);
        }
    }
    prop_assert_eq!(seen.len(), items.len());
    prop_assert!(seen.values().all(|&n| n == 1), "duplicate item: {:?}", seen);
    Ok(())
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-50i32..=500, -50i32..=450).prop_map(|(x, y)| Point::new(x as f32, y as f32))
}

fn counts_strategy() -> impl Strategy<Value = [usize; 3]> {
    (1usize..=5, 0usize..=5, 0usize..=5).prop_map(|(a, b, c)| [a, b, c])
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Ownership is exclusive at every step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ownership_exclusive_along_trajectory(
        counts in counts_strategy(),
        pick in 0usize..5,
        path in prop::collection::vec(point_strategy(), 1..40),
    ) {
        let (mut engine, keys, items) = columns(counts, DragConfig::default());
        let item = items[pick % items.len()];
        let start = engine.geometry().0[&Element::Item(item)].center();
        let now = Instant::now();
        engine.pointer_down(item, start, now);
        for p in path {
            engine.pointer_move(p, now);
            assert_ownership(&engine, &keys, &items)?;
        }
        engine.pointer_up(now);
        assert_ownership(&engine, &keys, &items)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Cancel restores and is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cancel_restores_orders(
        counts in counts_strategy(),
        pick in 0usize..5,
        path in prop::collection::vec(point_strategy(), 1..40),
    ) {
        let (mut engine, keys, items) = columns(counts, DragConfig::default());
        let before = orders(&engine, &keys);
        let item = items[pick % items.len()];
        let start = engine.geometry().0[&Element::Item(item)].center();
        let now = Instant::now();
        engine.pointer_down(item, start, now);
        for p in path {
            engine.pointer_move(p, now);
        }
        prop_assert!(engine.cancel());
        prop_assert_eq!(orders(&engine, &keys), before.clone());
        prop_assert_eq!(engine.item(item).unwrap().active_offset(), Point::ZERO);
        engine.drain_events();

        prop_assert!(!engine.cancel());
        prop_assert!(engine.drain_events().is_empty());
        prop_assert_eq!(orders(&engine, &keys), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Drop summary matches final placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drop_summary_matches_placement(
        counts in counts_strategy(),
        pick in 0usize..5,
        path in prop::collection::vec(point_strategy(), 1..40),
    ) {
        let (mut engine, _keys, items) = columns(counts, DragConfig::default());
        let item = items[pick % items.len()];
        let start = engine.geometry().0[&Element::Item(item)].center();
        let now = Instant::now();
        engine.pointer_down(item, start, now);
        for p in path {
            engine.pointer_move(p, now);
        }
        engine.pointer_up(now);
        let dropped = engine.drain_events().into_iter().find_map(|e| match e {
            DragEvent::Dropped(summary) => Some(summary),
            _ => None,
        });
        if let Some(summary) = dropped {
            let holder = engine.container(summary.container).unwrap();
            prop_assert_eq!(holder.index_of(item), Some(summary.current_index));
            prop_assert_eq!(engine.item(item).unwrap().container(), summary.container);
            prop_assert_eq!(engine.item(item).unwrap().active_offset(), Point::ZERO);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Oscillation within the dead-zone sorts at most once
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn oscillation_within_dead_zone_sorts_at_most_once(
        count in 2usize..=6,
        pick in 0usize..6,
        forward in any::<bool>(),
        swings in 1usize..20,
    ) {
        let dead_zone = 8.0;
        let config = DragConfig::default().with_dead_zone(dead_zone);
        let (mut engine, _keys, items) = columns([count, 0, 0], config);
        let item = items[pick % count];
        let start = engine.geometry().0[&Element::Item(item)].center();
        let now = Instant::now();
        engine.pointer_down(item, start, now);
        // Leave the threshold behind without crossing any midpoint.
        engine.pointer_move(start + Point::new(10.0, 0.0), now);
        engine.drain_events();

        // Swing around the pointer position where the dragged rect's leading
        // edge meets a direct neighbour's midpoint.
        let index = pick % count;
        let neighbour = if (forward && index + 1 < count) || index == 0 {
            index + 1
        } else {
            index - 1
        };
        let boundary = if neighbour > index { neighbour } else { index };
        let y = boundary as f32 * 40.0;
        let half = dead_zone / 2.0 - 0.5;
        for _ in 0..swings {
            engine.pointer_move(Point::new(50.0, y - half), now);
            engine.pointer_move(Point::new(50.0, y + half), now);
        }
        let sorted = engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, DragEvent::Sorted { .. }))
            .count();
        prop_assert!(sorted <= 1, "sorted {} times", sorted);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Active offset obeys the lock axis
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn active_offset_respects_lock(
        lock in prop_oneof![Just(LockAxis::X), Just(LockAxis::Y)],
        path in prop::collection::vec(point_strategy(), 1..20),
    ) {
        let (mut engine, _keys, items) = columns([3, 0, 0], DragConfig::default());
        engine.item_mut(items[0]).unwrap().set_lock_axis(lock);
        let now = Instant::now();
        engine.pointer_down(items[0], Point::new(50.0, 20.0), now);
        for p in path {
            engine.pointer_move(p, now);
            let offset = engine.item(items[0]).unwrap().active_offset();
            match lock {
                LockAxis::X => prop_assert_eq!(offset.y, 0.0),
                LockAxis::Y => prop_assert_eq!(offset.x, 0.0),
                LockAxis::None => {}
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Returning to the pickup point restores the order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn return_to_pickup_point_restores_orders(
        counts in counts_strategy(),
        pick in 0usize..5,
        path in prop::collection::vec(point_strategy(), 0..40),
    ) {
        let (mut engine, keys, items) = columns(counts, DragConfig::default());
        let before = orders(&engine, &keys);
        let item = items[pick % items.len()];
        let start = engine.geometry().0[&Element::Item(item)].center();
        let now = Instant::now();
        engine.pointer_down(item, start, now);
        for p in path {
            engine.pointer_move(p, now);
        }
        engine.pointer_move(start, now);
        prop_assert_eq!(orders(&engine, &keys), before);

        engine.pointer_up(now);
        let dropped = engine.drain_events().into_iter().find_map(|e| match e {
            DragEvent::Dropped(summary) => Some(summary),
            _ => None,
        });
        if let Some(summary) = dropped {
            prop_assert_eq!(summary.previous_index, summary.current_index);
            prop_assert_eq!(summary.container, summary.previous_container);
        }
    }
}
