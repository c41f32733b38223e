//! Diff-based controller instrumentation.
//!
//! Every mutator call is bracketed by a snapshot of the model and a
//! structural diff against the live model afterwards. A non-empty diff
//! produces exactly one render request for the whole call, however many
//! fields the mutator touched. Derivations bypass the bracket entirely.
//!
//! Pending mutators are spawned on the current tokio runtime straight away,
//! so they make progress whether or not the caller awaits the returned
//! [`PendingAction`]. The diff runs when the mutator's future resolves `Ok`
//! and before the result is handed to the caller. A future resolving `Err`
//! skips the diff, even if it already mutated the model.
//!
//! Concurrent pending mutators are not serialized: each one diffs against
//! its own pre-call snapshot, whatever else happened in between.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::diff::diff;
use crate::render::RenderSignal;

use super::action::{Action, ActionSurface, Outcome};
use super::error::ActionError;
use super::model::{Model, ModelHandle};

/// Result of calling an instrumented action.
#[derive(Debug)]
pub enum Invocation {
    Ready(Value),
    Pending(PendingAction),
}

impl Invocation {
    pub fn is_pending(&self) -> bool {
        matches!(self, Invocation::Pending(_))
    }

    /// Wait for the action to finish (immediate for ready invocations).
    pub async fn settled(self) -> Result<Value, ActionError> {
        match self {
            Invocation::Ready(value) => Ok(value),
            Invocation::Pending(pending) => pending.await,
        }
    }
}

/// Handle to an action still running on the runtime.
///
/// Dropping it does not cancel the action; a failure nobody awaits is
/// reported through `tracing` instead.
#[derive(Debug)]
pub struct PendingAction {
    action: String,
    result: oneshot::Receiver<Result<Value, ActionError>>,
}

impl PendingAction {
    /// Run `future` on the current runtime and hand back its result.
    ///
    /// A failure that nobody is waiting for anymore is logged at `warn`.
    pub fn spawn<F>(action: &str, future: F) -> Result<Self, ActionError>
    where
        F: Future<Output = Result<Value, ActionError>> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ActionError::NoRuntime {
            action: action.to_string(),
        })?;
        let (tx, rx) = oneshot::channel();
        let name = action.to_string();
        runtime.spawn(async move {
            if let Err(Err(err)) = tx.send(future.await) {
                tracing::warn!(action = %name, error = %err, "unhandled action failure");
            }
        });
        Ok(Self {
            action: action.to_string(),
            result: rx,
        })
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Future for PendingAction {
    type Output = Result<Value, ActionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.result).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ActionError::Aborted {
                action: self.action.clone(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// An [`ActionSurface`] whose mutators request renders when they change the model.
pub struct InstrumentedSurface<M> {
    model: ModelHandle<M>,
    surface: Arc<ActionSurface>,
    signal: Arc<dyn RenderSignal>,
}

impl<M> Clone for InstrumentedSurface<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            surface: Arc::clone(&self.surface),
            signal: Arc::clone(&self.signal),
        }
    }
}

impl<M: Model> InstrumentedSurface<M> {
    pub fn new(
        model: ModelHandle<M>,
        surface: ActionSurface,
        signal: Arc<dyn RenderSignal>,
    ) -> Self {
        tracing::debug!(actions = ?surface, "instrumenting action surface");
        Self {
            model,
            surface: Arc::new(surface),
            signal,
        }
    }

    /// Exactly the names of the wrapped surface.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.surface.names()
    }

    pub fn model(&self) -> &ModelHandle<M> {
        &self.model
    }

    /// Call `name` with `args`.
    ///
    /// A mutator that fails synchronously returns its error before any diff
    /// runs; whatever it wrote before failing stays written.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Invocation, ActionError> {
        let mutate = match self.surface.get(name) {
            None => {
                return Err(ActionError::UnknownAction {
                    name: name.to_string(),
                })
            }
            Some(Action::Derivation(derive)) => return derive(args).map(Invocation::Ready),
            Some(Action::Mutator(mutate)) => mutate,
        };

        let before = self.model.snapshot();
        match mutate(args)? {
            Outcome::Ready(value) => {
                settle(name, &before, &self.model, self.signal.as_ref());
                Ok(Invocation::Ready(value))
            }
            Outcome::Pending(future) => {
                let model = self.model.clone();
                let signal = Arc::clone(&self.signal);
                let action = name.to_string();
                let pending = PendingAction::spawn(name, async move {
                    let result = future.await;
                    match &result {
                        Ok(_) => {
                            settle(&action, &before, &model, signal.as_ref());
                        }
                        Err(err) => {
                            tracing::debug!(
                                action = %action,
                                error = %err,
                                "pending action failed, diff skipped"
                            );
                        }
                    }
                    result
                })?;
                Ok(Invocation::Pending(pending))
            }
        }
    }
}

/// Diff `before` against the live model and request one render if anything changed.
fn settle<M: Model>(
    action: &str,
    before: &M,
    model: &ModelHandle<M>,
    signal: &dyn RenderSignal,
) -> bool {
    let changes = model.read(|current| diff(before, current));
    let Some(first) = changes.first() else {
        tracing::trace!(action, "no observable change");
        return false;
    };
    tracing::debug!(
        action,
        changes = changes.len(),
        first = %first,
        "model changed, requesting render"
    );
    signal.request_render();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderGeneration;
    use serde_json::json;

    fn counter_surface(model: &ModelHandle<Value>) -> ActionSurface {
        let bump = model.clone();
        let same = model.clone();
        let read = model.clone();
        ActionSurface::new()
            .mutator("bump", move |_| {
                bump.write(|m| {
                    let next = m["n"].as_i64().unwrap_or(0) + 1;
                    m["n"] = json!(next);
                });
                Ok(Outcome::done())
            })
            .mutator("same", move |_| {
                same.write(|m| {
                    let current = m["n"].clone();
                    m["n"] = current;
                });
                Ok(Outcome::Ready(json!("kept")))
            })
            .derivation("n", move |_| Ok(read.read(|m| m["n"].clone())))
    }

    fn instrument() -> (InstrumentedSurface<Value>, RenderGeneration) {
        let model = ModelHandle::new(json!({ "n": 0 }));
        let generation = RenderGeneration::new();
        let surface = InstrumentedSurface::new(
            model.clone(),
            counter_surface(&model),
            Arc::new(generation.clone()),
        );
        (surface, generation)
    }

    #[test]
    fn changed_mutator_signals_once() {
        let (surface, generation) = instrument();
        surface.call("bump", &[]).unwrap();
        assert_eq!(generation.current(), 1);
    }

    #[test]
    fn unchanged_mutator_passes_return_value_through() {
        let (surface, generation) = instrument();
        let result = surface.call("same", &[]).unwrap();
        assert!(matches!(result, Invocation::Ready(ref v) if v == "kept"));
        assert_eq!(generation.current(), 0);
    }

    #[test]
    fn derivation_is_not_diffed() {
        let (surface, generation) = instrument();
        surface.call("bump", &[]).unwrap();
        for _ in 0..5 {
            let Invocation::Ready(value) = surface.call("n", &[]).unwrap() else {
                panic!("derivations never pend");
            };
            assert_eq!(value, json!(1));
        }
        assert_eq!(generation.current(), 1);
    }

    #[test]
    fn unknown_action_is_an_error() {
        let (surface, _) = instrument();
        assert!(matches!(
            surface.call("nope", &[]),
            Err(ActionError::UnknownAction { name }) if name == "nope"
        ));
    }

    #[test]
    fn pending_outside_runtime_is_an_error() {
        let model = ModelHandle::new(json!({}));
        let surface = InstrumentedSurface::new(
            model,
            ActionSurface::new()
                .mutator("later", |_| Ok(Outcome::pending(async { Ok(Value::Null) }))),
            Arc::new(RenderGeneration::new()),
        );
        assert!(matches!(
            surface.call("later", &[]),
            Err(ActionError::NoRuntime { .. })
        ));
    }

    #[test]
    fn names_match_the_wrapped_surface() {
        let (surface, _) = instrument();
        let names: Vec<_> = surface.names().collect();
        assert_eq!(names, vec!["bump", "n", "same"]);
    }
}
