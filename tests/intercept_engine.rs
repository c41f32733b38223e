//! The intercepting wrapper next to the diff engine on the same model.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::*;
use toppings::engine::{ActionSurface, InstrumentedSurface, ModelHandle, Outcome, Tracked};
use toppings::render::RenderGeneration;

fn selection() -> BTreeMap<String, bool> {
    BTreeMap::from([("cheese".to_string(), true), ("olives".to_string(), false)])
}

#[test]
fn same_value_assignment_diverges() {
    let (tracked_generation, signal) = generation();
    let tracked = Tracked::new(selection(), signal);
    assert!(tracked.set(|m| m, selection()));
    assert_eq!(tracked_generation.current(), 1);

    let model = ModelHandle::new(selection());
    let diff_generation = RenderGeneration::new();
    let reassign = model.clone();
    let surface = InstrumentedSurface::new(
        model,
        ActionSurface::new().mutator("reassign", move |_| {
            reassign.write(|m| *m = selection());
            Ok(Outcome::done())
        }),
        Arc::new(diff_generation.clone()),
    );
    surface.call("reassign", &[]).unwrap();
    assert_eq!(diff_generation.current(), 0);
}

#[test]
fn writes_are_visible_to_the_next_read() {
    let (generation, signal) = generation();
    let tracked = Tracked::new(selection(), signal);

    let mut next = tracked.get(|m| m);
    next.insert("olives".to_string(), true);
    tracked.set(|m| m, next);

    assert_eq!(tracked.read(|m| m.values().filter(|v| **v).count()), 2);
    assert_eq!(generation.current(), 1);
}

#[test]
fn clones_share_one_model() {
    let (generation, signal) = generation();
    let tracked = Tracked::new(selection(), signal);
    let other = tracked.clone();

    other.assign(|m| m.clear());
    assert!(tracked.snapshot().is_empty());
    assert_eq!(generation.current(), 1);
}

#[test]
fn closures_work_as_render_signals() {
    let hits = Arc::new(parking_lot::Mutex::new(0));
    let counter = Arc::clone(&hits);
    let tracked = Tracked::new(0u32, Arc::new(move || *counter.lock() += 1));

    tracked.set(|n| n, 1);
    tracked.set(|n| n, 1);
    assert_eq!(*hits.lock(), 2);
}
