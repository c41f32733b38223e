//! Intercepting-wrapper strategy.
//!
//! [`Tracked`] owns the model and exposes explicit setters instead of plain
//! field assignment. Each setter writes through to the model and then
//! requests a render, unconditionally: no diff, no same-value suppression,
//! no batching. An action doing three `set`s requests three renders.
//!
//! Reads never signal, so read-only helpers need no marking here.

use std::sync::Arc;

use crate::render::RenderSignal;

use super::model::ModelHandle;

pub struct Tracked<M> {
    model: ModelHandle<M>,
    signal: Arc<dyn RenderSignal>,
}

impl<M> Clone for Tracked<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            signal: Arc::clone(&self.signal),
        }
    }
}

impl<M> Tracked<M> {
    pub fn new(initial: M, signal: Arc<dyn RenderSignal>) -> Self {
        Self {
            model: ModelHandle::new(initial),
            signal,
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        self.model.read(f)
    }

    /// Clone one field out of the model.
    pub fn get<T: Clone>(&self, field: impl FnOnce(&M) -> &T) -> T {
        self.model.read(|model| field(model).clone())
    }

    /// Assign `value` to the field selected by `field`.
    ///
    /// The write is visible to every later read, including reads made by the
    /// same action before it returns. Always reports the write as accepted.
    pub fn set<T>(&self, field: impl FnOnce(&mut M) -> &mut T, value: T) -> bool {
        self.model.write(|model| *field(model) = value);
        self.signal.request_render();
        true
    }

    /// One arbitrary write through the wrapper; signals once.
    pub fn assign<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        let result = self.model.write(f);
        self.signal.request_render();
        result
    }
}

impl<M: Clone> Tracked<M> {
    pub fn snapshot(&self) -> M {
        self.model.snapshot()
    }
}
