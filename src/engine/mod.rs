//! Change-detection engines.
//!
//! Two strategies connect a mutable model to a render signal:
//!
//! - [`InstrumentedSurface`] wraps a controller's [`ActionSurface`]. Each
//!   mutator call is diffed against a snapshot taken just before it ran and
//!   requests at most one render. Derivations are never diffed.
//! - [`Tracked`] wraps the model itself. Every assignment through it
//!   requests a render, changed or not.
//!
//! ```text
//! event ──→ action ──→ model ──→ diff / setter ──→ RenderSignal ──→ view
//!                                                                    │
//!            derivations ←───────────────────────────────────────────┘
//! ```

mod action;
mod controller;
mod error;
mod intercept;
mod lifecycle;
mod model;

pub use action::{args, derived, Action, ActionSurface, DerivationFn, MutatorFn, Outcome};
pub use controller::{InstrumentedSurface, Invocation, PendingAction};
pub use error::ActionError;
pub use intercept::Tracked;
pub use lifecycle::{HookResult, Lifecycle, MountStatus};
pub use model::{Model, ModelHandle};
