use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures_core::future::BoxFuture;
use serde_json::Value;

use super::error::ActionError;

pub type MutatorFn = Arc<dyn Fn(&[Value]) -> Result<Outcome, ActionError> + Send + Sync>;
pub type DerivationFn = Arc<dyn Fn(&[Value]) -> Result<Value, ActionError> + Send + Sync>;

/// What a mutator hands back to the engine.
pub enum Outcome {
    /// Finished synchronously with this return value.
    Ready(Value),
    /// Finishes when the future resolves.
    Pending(BoxFuture<'static, Result<Value, ActionError>>),
}

impl Outcome {
    /// Finished synchronously with no return value.
    pub fn done() -> Self {
        Outcome::Ready(Value::Null)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, ActionError>> + Send + 'static,
    {
        Outcome::Pending(Box::pin(future))
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// One entry of an [`ActionSurface`].
///
/// The variant decides how the instrumentation engine treats a call:
/// mutators are diffed, derivations are passed straight through.
#[derive(Clone)]
pub enum Action {
    Mutator(MutatorFn),
    Derivation(DerivationFn),
}

impl Action {
    pub fn mutator<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Outcome, ActionError> + Send + Sync + 'static,
    {
        Action::Mutator(Arc::new(f))
    }

    pub fn derivation<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Action::Derivation(Arc::new(f))
    }

    pub fn is_derivation(&self) -> bool {
        matches!(self, Action::Derivation(_))
    }
}

/// Named actions a controller exposes.
#[derive(Clone, Default)]
pub struct ActionSurface {
    actions: BTreeMap<&'static str, Action>,
}

impl ActionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an action under `name`.
    pub fn with(mut self, name: &'static str, action: Action) -> Self {
        self.actions.insert(name, action);
        self
    }

    pub fn mutator<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Outcome, ActionError> + Send + Sync + 'static,
    {
        self.with(name, Action::mutator(f))
    }

    pub fn derivation<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        self.with(name, Action::derivation(f))
    }

    /// Merge `other` into this surface. Entries of `other` win on name clashes.
    pub fn extend(mut self, other: ActionSurface) -> Self {
        self.actions.extend(other.actions);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Build a surface whose every entry is a derivation.
///
/// This is how a controller marks its read-only selectors: the engine never
/// snapshots, diffs or signals around them, so views can call them freely
/// while rendering.
pub fn derived<I>(derivations: I) -> ActionSurface
where
    I: IntoIterator<Item = (&'static str, DerivationFn)>,
{
    ActionSurface {
        actions: derivations
            .into_iter()
            .map(|(name, f)| (name, Action::Derivation(f)))
            .collect(),
    }
}

impl std::fmt::Debug for ActionSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.actions.iter().map(|(name, action)| {
                let kind = if action.is_derivation() {
                    "derivation"
                } else {
                    "mutator"
                };
                (name, kind)
            }))
            .finish()
    }
}

/// Positional argument decoding for action bodies.
pub mod args {
    use serde_json::Value;

    use crate::engine::ActionError;

    fn arg<'a>(
        action: &'static str,
        args: &'a [Value],
        index: usize,
    ) -> Result<&'a Value, ActionError> {
        args.get(index).ok_or_else(|| ActionError::InvalidArgument {
            action,
            index,
            reason: "missing".to_string(),
        })
    }

    pub fn string<'a>(
        action: &'static str,
        args: &'a [Value],
        index: usize,
    ) -> Result<&'a str, ActionError> {
        arg(action, args, index)?
            .as_str()
            .ok_or_else(|| ActionError::InvalidArgument {
                action,
                index,
                reason: "expected a string".to_string(),
            })
    }

    pub fn boolean(
        action: &'static str,
        args: &[Value],
        index: usize,
    ) -> Result<bool, ActionError> {
        arg(action, args, index)?
            .as_bool()
            .ok_or_else(|| ActionError::InvalidArgument {
                action,
                index,
                reason: "expected a boolean".to_string(),
            })
    }
}
