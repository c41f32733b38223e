//! The toppings dialog: model, data source and both controller variants.

mod controller;
mod model;
mod proxy;
mod source;

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::engine::{ActionError, Invocation};
use crate::render::RenderSignal;

pub use controller::{actions, controller, ToppingsController};
pub use model::{format_price, Topping, ToppingsModel};
pub use proxy::ProxyToppingsController;
pub use source::{parse_catalog, CatalogFileSource, FixtureSource, SourceError, ToppingSource};

/// Receives the confirmed toppings, in list order.
pub type ConfirmSink = Arc<dyn Fn(Vec<Topping>) + Send + Sync>;

/// Everything a controller needs from its host besides the render signal.
#[derive(Clone)]
pub struct ControllerContext {
    pub source: Arc<dyn ToppingSource>,
    /// Names checked when the list first loads.
    pub initial_selection: Vec<String>,
    pub on_confirm: ConfirmSink,
}

impl ControllerContext {
    pub fn new(source: Arc<dyn ToppingSource>, on_confirm: ConfirmSink) -> Self {
        Self {
            source,
            initial_selection: Vec::new(),
            on_confirm,
        }
    }

    pub fn with_initial_selection(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.initial_selection = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The operations a host drives the dialog with.
///
/// Selector methods never request a render, whichever engine backs them.
pub trait ToppingsActions: Send + Sync {
    fn on_mount(&self) -> Result<Invocation, ActionError>;
    fn on_unmount(&self) -> Result<Invocation, ActionError>;
    fn toggle_topping(&self, key: &str, checked: bool) -> Result<(), ActionError>;
    fn toggle_all(&self, checked: bool) -> Result<(), ActionError>;
    fn confirm(&self) -> Result<(), ActionError>;

    fn topping(&self, name: &str) -> Result<Option<Topping>, ActionError>;
    fn is_topping_selected(&self, name: &str) -> Result<bool, ActionError>;
    fn is_all_selected(&self) -> Result<bool, ActionError>;
    fn topping_keys(&self) -> Result<Vec<String>, ActionError>;
    fn is_any_topping_selected(&self) -> Result<bool, ActionError>;
    fn total_upcharge(&self) -> Result<String, ActionError>;

    /// Copy of the current model, for reports.
    fn snapshot(&self) -> ToppingsModel;
}

/// Which change-detection engine backs the dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Snapshot and diff around every mutator.
    #[default]
    Diff,
    /// Signal on every assignment through the wrapper.
    Intercept,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Diff => f.write_str("diff"),
            Strategy::Intercept => f.write_str("intercept"),
        }
    }
}

/// Build the controller variant selected by `strategy`.
pub fn build(
    strategy: Strategy,
    ctx: &ControllerContext,
    signal: Arc<dyn RenderSignal>,
) -> Arc<dyn ToppingsActions> {
    tracing::debug!(%strategy, "building toppings controller");
    match strategy {
        Strategy::Diff => Arc::new(ToppingsController::new(ctx, signal)),
        Strategy::Intercept => Arc::new(ProxyToppingsController::new(ctx, signal)),
    }
}
