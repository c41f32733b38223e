use std::sync::Arc;

use parking_lot::Mutex;

use crate::diff::{Diff, Snapshot};

/// A model the engines can snapshot and compare.
pub trait Model: Diff + Clone + Send + 'static {}

impl<T> Model for T where T: Diff + Clone + Send + 'static {}

/// Shared handle to the one model owned by a widget instance.
///
/// Action closures capture clones of the handle; the instrumentation engine
/// holds another to take snapshots. The lock is only held for the duration
/// of a single `read`/`write` closure, never across an await point.
pub struct ModelHandle<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for ModelHandle<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> ModelHandle<M> {
    pub fn new(model: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Replace the whole model, returning the previous value.
    pub fn replace(&self, model: M) -> M {
        std::mem::replace(&mut *self.inner.lock(), model)
    }
}

impl<M: Clone> ModelHandle<M> {
    pub fn snapshot(&self) -> M {
        Snapshot::snapshot(&*self.inner.lock())
    }
}

impl<M: Default> Default for ModelHandle<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for ModelHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModelHandle").field(&*self.inner.lock()).finish()
    }
}
