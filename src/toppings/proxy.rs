//! Toppings controller for the intercepting-wrapper engine.
//!
//! The model lives inside a [`Tracked`] wrapper and every write goes through
//! one of its setters, so each write requests a render on its own. Toggles
//! build a fresh selection map and assign it in one go. Loading assigns the
//! list and the selection separately and therefore signals twice.

use std::sync::Arc;

use serde_json::Value;

use crate::engine::{ActionError, Invocation, PendingAction, Tracked};
use crate::render::RenderSignal;

use super::model::{format_price, Topping, ToppingsModel};
use super::{ConfirmSink, ControllerContext, ToppingSource, ToppingsActions};

#[derive(Clone)]
pub struct ProxyToppingsController {
    model: Tracked<ToppingsModel>,
    source: Arc<dyn ToppingSource>,
    initial_selection: Vec<String>,
    on_confirm: ConfirmSink,
}

impl ProxyToppingsController {
    pub fn new(ctx: &ControllerContext, signal: Arc<dyn RenderSignal>) -> Self {
        Self::with_model(ToppingsModel::default(), ctx, signal)
    }

    pub fn with_model(
        model: ToppingsModel,
        ctx: &ControllerContext,
        signal: Arc<dyn RenderSignal>,
    ) -> Self {
        Self {
            model: Tracked::new(model, signal),
            source: Arc::clone(&ctx.source),
            initial_selection: ctx.initial_selection.clone(),
            on_confirm: Arc::clone(&ctx.on_confirm),
        }
    }

    pub fn model(&self) -> &Tracked<ToppingsModel> {
        &self.model
    }
}

impl ToppingsActions for ProxyToppingsController {
    fn on_mount(&self) -> Result<Invocation, ActionError> {
        let model = self.model.clone();
        let source = Arc::clone(&self.source);
        let initial = self.initial_selection.clone();
        let pending = PendingAction::spawn("on_mount", async move {
            let toppings = source.fetch().await?;
            tracing::info!(count = toppings.len(), "toppings loaded");
            let loaded = ToppingsModel::loaded(toppings, &initial);
            model.set(|m| &mut m.toppings, loaded.toppings);
            model.set(|m| &mut m.selected, loaded.selected);
            Ok(Value::Null)
        })?;
        Ok(Invocation::Pending(pending))
    }

    fn on_unmount(&self) -> Result<Invocation, ActionError> {
        self.model.set(|m| &mut m.toppings, Vec::new());
        self.model.set(|m| &mut m.selected, Default::default());
        Ok(Invocation::Ready(Value::Null))
    }

    fn toggle_topping(&self, key: &str, checked: bool) -> Result<(), ActionError> {
        let mut selected = self.model.get(|m| &m.selected);
        selected.insert(key.to_string(), checked);
        self.model.set(|m| &mut m.selected, selected);
        Ok(())
    }

    /// Sets every listed topping; unlisted keys in the selection are kept.
    fn toggle_all(&self, checked: bool) -> Result<(), ActionError> {
        let selected = self.model.read(|m| {
            let mut selected = m.selected.clone();
            selected.extend(m.selection_all(checked));
            selected
        });
        self.model.set(|m| &mut m.selected, selected);
        Ok(())
    }

    fn confirm(&self) -> Result<(), ActionError> {
        let chosen = self.model.read(ToppingsModel::selected_toppings);
        tracing::info!(count = chosen.len(), "toppings confirmed");
        (self.on_confirm)(chosen);
        Ok(())
    }

    fn topping(&self, name: &str) -> Result<Option<Topping>, ActionError> {
        Ok(self.model.read(|m| m.topping(name).cloned()))
    }

    fn is_topping_selected(&self, name: &str) -> Result<bool, ActionError> {
        Ok(self.model.read(|m| m.is_selected(name)))
    }

    fn is_all_selected(&self) -> Result<bool, ActionError> {
        Ok(self.model.read(ToppingsModel::is_all_selected))
    }

    fn topping_keys(&self) -> Result<Vec<String>, ActionError> {
        Ok(self.model.read(ToppingsModel::keys))
    }

    fn is_any_topping_selected(&self) -> Result<bool, ActionError> {
        Ok(self.model.read(ToppingsModel::is_any_selected))
    }

    fn total_upcharge(&self) -> Result<String, ActionError> {
        Ok(format_price(self.model.read(ToppingsModel::upcharge)))
    }

    fn snapshot(&self) -> ToppingsModel {
        self.model.snapshot()
    }
}
