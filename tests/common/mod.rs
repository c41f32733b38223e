//! Shared test utilities: fixtures, recording sinks and controllable sources.

#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;

use toppings::render::RenderGeneration;
use toppings::toppings::{
    ConfirmSink, ControllerContext, FixtureSource, SourceError, Topping, ToppingSource,
    ToppingsModel,
};

/// The three-item list used across the controller tests.
pub fn toppings() -> Vec<Topping> {
    vec![
        Topping::new("cheese", 1.42),
        Topping::new("olives", 2.32),
        Topping::new("onions", 3.11),
    ]
}

/// Model already holding [`toppings`], with `selected` names checked.
pub fn loaded_model(selected: &[&str]) -> ToppingsModel {
    let names: Vec<String> = selected.iter().map(|name| name.to_string()).collect();
    ToppingsModel::loaded(toppings(), &names)
}

/// Records every list handed to the confirm sink.
#[derive(Clone, Default)]
pub struct ConfirmRecorder {
    calls: Arc<Mutex<Vec<Vec<Topping>>>>,
}

impl ConfirmRecorder {
    pub fn sink(&self) -> ConfirmSink {
        let calls = Arc::clone(&self.calls);
        Arc::new(move |chosen: Vec<Topping>| calls.lock().push(chosen))
    }

    pub fn calls(&self) -> Vec<Vec<Topping>> {
        self.calls.lock().clone()
    }
}

/// Source that blocks every fetch until [`GatedSource::release`] is called.
#[derive(Clone)]
pub struct GatedSource {
    gate: Arc<Notify>,
    toppings: Vec<Topping>,
}

impl GatedSource {
    pub fn new(toppings: Vec<Topping>) -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            toppings,
        }
    }

    /// Let one pending (or the next) fetch complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ToppingSource for GatedSource {
    async fn fetch(&self) -> Result<Vec<Topping>, SourceError> {
        self.gate.notified().await;
        Ok(self.toppings.clone())
    }
}

/// Source that always fails.
pub struct FailingSource;

#[async_trait]
impl ToppingSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<Topping>, SourceError> {
        Err(SourceError::Unavailable("backend down".to_string()))
    }
}

/// Context over [`toppings`] with a fresh recorder.
pub fn context() -> (ControllerContext, ConfirmRecorder) {
    let recorder = ConfirmRecorder::default();
    let ctx = ControllerContext::new(Arc::new(FixtureSource::new(toppings())), recorder.sink());
    (ctx, recorder)
}

/// Generation plus the signal handle the engines take.
pub fn generation() -> (RenderGeneration, Arc<RenderGeneration>) {
    let generation = RenderGeneration::new();
    let signal = Arc::new(generation.clone());
    (generation, signal)
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}
