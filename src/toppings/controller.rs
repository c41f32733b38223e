//! Toppings controller for the diff-instrumented engine.
//!
//! [`controller`] builds the raw action surface. Mutators write the shared
//! model directly and leave change detection to [`InstrumentedSurface`];
//! selectors are registered through [`derived`] so rendering can call them
//! without ever producing a signal. [`ToppingsController`] puts typed
//! methods over the string-keyed surface.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::engine::{
    args, derived, ActionError, ActionSurface, DerivationFn, InstrumentedSurface, Invocation,
    ModelHandle, Outcome,
};
use crate::render::RenderSignal;

use super::model::{format_price, Topping, ToppingsModel};
use super::{ControllerContext, ToppingsActions};

/// Action names exposed by the toppings surface.
pub mod actions {
    pub const ON_MOUNT: &str = "on_mount";
    pub const ON_UNMOUNT: &str = "on_unmount";
    pub const TOGGLE_TOPPING: &str = "toggle_topping";
    pub const TOGGLE_ALL: &str = "toggle_all";
    pub const CONFIRM: &str = "handle_confirm_click";

    pub const GET_TOPPING: &str = "get_topping";
    pub const IS_TOPPING_SELECTED: &str = "is_topping_selected";
    pub const IS_ALL_SELECTED: &str = "is_all_selected";
    pub const TOPPING_KEYS: &str = "topping_keys";
    pub const IS_ANY_TOPPING_SELECTED: &str = "is_any_topping_selected";
    pub const TOTAL_UPCHARGE: &str = "total_upcharge";
}

use actions::*;

/// Build the toppings action surface over `model`.
pub fn controller(model: &ModelHandle<ToppingsModel>, ctx: &ControllerContext) -> ActionSurface {
    let mount = {
        let model = model.clone();
        let source = Arc::clone(&ctx.source);
        let initial = ctx.initial_selection.clone();
        move |_: &[Value]| -> Result<Outcome, ActionError> {
            let model = model.clone();
            let source = Arc::clone(&source);
            let initial = initial.clone();
            Ok(Outcome::pending(async move {
                let toppings = source.fetch().await?;
                tracing::info!(count = toppings.len(), "toppings loaded");
                model.replace(ToppingsModel::loaded(toppings, &initial));
                Ok(Value::Null)
            }))
        }
    };

    let unmount = {
        let model = model.clone();
        move |_: &[Value]| -> Result<Outcome, ActionError> {
            model.write(ToppingsModel::clear);
            Ok(Outcome::done())
        }
    };

    let toggle = {
        let model = model.clone();
        move |values: &[Value]| -> Result<Outcome, ActionError> {
            let key = args::string(TOGGLE_TOPPING, values, 0)?;
            let checked = args::boolean(TOGGLE_TOPPING, values, 1)?;
            model.write(|m| m.selected.insert(key.to_string(), checked));
            Ok(Outcome::done())
        }
    };

    let toggle_all = {
        let model = model.clone();
        move |values: &[Value]| -> Result<Outcome, ActionError> {
            let checked = args::boolean(TOGGLE_ALL, values, 0)?;
            model.write(|m| {
                let all = m.selection_all(checked);
                m.selected.extend(all);
            });
            Ok(Outcome::done())
        }
    };

    let confirm = {
        let model = model.clone();
        let on_confirm = Arc::clone(&ctx.on_confirm);
        move |_: &[Value]| -> Result<Outcome, ActionError> {
            let chosen = model.read(ToppingsModel::selected_toppings);
            tracing::info!(count = chosen.len(), "toppings confirmed");
            on_confirm(chosen);
            Ok(Outcome::done())
        }
    };

    ActionSurface::new()
        .mutator(ON_MOUNT, mount)
        .mutator(ON_UNMOUNT, unmount)
        .mutator(TOGGLE_TOPPING, toggle)
        .mutator(TOGGLE_ALL, toggle_all)
        .mutator(CONFIRM, confirm)
        .extend(selectors(model))
}

fn selectors(model: &ModelHandle<ToppingsModel>) -> ActionSurface {
    let get_topping: DerivationFn = {
        let model = model.clone();
        Arc::new(move |values: &[Value]| -> Result<Value, ActionError> {
            let name = args::string(GET_TOPPING, values, 0)?;
            match model.read(|m| m.topping(name).cloned()) {
                Some(topping) => serde_json::to_value(topping)
                    .map_err(|e| ActionError::failed(GET_TOPPING, e.to_string())),
                None => Ok(Value::Null),
            }
        })
    };
    let is_selected: DerivationFn = {
        let model = model.clone();
        Arc::new(move |values: &[Value]| -> Result<Value, ActionError> {
            let name = args::string(IS_TOPPING_SELECTED, values, 0)?;
            Ok(Value::Bool(model.read(|m| m.is_selected(name))))
        })
    };
    let is_all: DerivationFn = {
        let model = model.clone();
        Arc::new(move |_: &[Value]| -> Result<Value, ActionError> {
            Ok(Value::Bool(model.read(ToppingsModel::is_all_selected)))
        })
    };
    let keys: DerivationFn = {
        let model = model.clone();
        Arc::new(move |_: &[Value]| -> Result<Value, ActionError> {
            Ok(json!(model.read(ToppingsModel::keys)))
        })
    };
    let is_any: DerivationFn = {
        let model = model.clone();
        Arc::new(move |_: &[Value]| -> Result<Value, ActionError> {
            Ok(Value::Bool(model.read(ToppingsModel::is_any_selected)))
        })
    };
    let upcharge: DerivationFn = {
        let model = model.clone();
        Arc::new(move |_: &[Value]| -> Result<Value, ActionError> {
            Ok(Value::String(format_price(model.read(ToppingsModel::upcharge))))
        })
    };

    derived([
        (GET_TOPPING, get_topping),
        (IS_TOPPING_SELECTED, is_selected),
        (IS_ALL_SELECTED, is_all),
        (TOPPING_KEYS, keys),
        (IS_ANY_TOPPING_SELECTED, is_any),
        (TOTAL_UPCHARGE, upcharge),
    ])
}

/// Typed front for the instrumented toppings surface.
#[derive(Clone)]
pub struct ToppingsController {
    surface: InstrumentedSurface<ToppingsModel>,
}

impl ToppingsController {
    /// Controller starting from the empty model; mounting loads the list.
    pub fn new(ctx: &ControllerContext, signal: Arc<dyn RenderSignal>) -> Self {
        Self::with_model(ToppingsModel::default(), ctx, signal)
    }

    pub fn with_model(
        model: ToppingsModel,
        ctx: &ControllerContext,
        signal: Arc<dyn RenderSignal>,
    ) -> Self {
        let model = ModelHandle::new(model);
        let surface = controller(&model, ctx);
        Self {
            surface: InstrumentedSurface::new(model, surface, signal),
        }
    }

    pub fn surface(&self) -> &InstrumentedSurface<ToppingsModel> {
        &self.surface
    }

    fn run(&self, name: &'static str, values: &[Value]) -> Result<(), ActionError> {
        match self.surface.call(name, values)? {
            Invocation::Ready(_) => Ok(()),
            Invocation::Pending(pending) => Err(ActionError::failed(
                name,
                format!("unexpected pending result from '{}'", pending.action()),
            )),
        }
    }

    fn select(&self, name: &'static str, values: &[Value]) -> Result<Value, ActionError> {
        match self.surface.call(name, values)? {
            Invocation::Ready(value) => Ok(value),
            Invocation::Pending(_) => {
                Err(ActionError::failed(name, "selector did not return a value"))
            }
        }
    }

    fn flag(&self, name: &'static str, values: &[Value]) -> Result<bool, ActionError> {
        self.select(name, values)?
            .as_bool()
            .ok_or_else(|| ActionError::failed(name, "expected a boolean"))
    }
}

impl ToppingsActions for ToppingsController {
    fn on_mount(&self) -> Result<Invocation, ActionError> {
        self.surface.call(ON_MOUNT, &[])
    }

    fn on_unmount(&self) -> Result<Invocation, ActionError> {
        self.surface.call(ON_UNMOUNT, &[])
    }

    fn toggle_topping(&self, key: &str, checked: bool) -> Result<(), ActionError> {
        self.run(TOGGLE_TOPPING, &[json!(key), json!(checked)])
    }

    fn toggle_all(&self, checked: bool) -> Result<(), ActionError> {
        self.run(TOGGLE_ALL, &[json!(checked)])
    }

    fn confirm(&self) -> Result<(), ActionError> {
        self.run(CONFIRM, &[])
    }

    fn topping(&self, name: &str) -> Result<Option<Topping>, ActionError> {
        match self.select(GET_TOPPING, &[json!(name)])? {
            Value::Null => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ActionError::failed(GET_TOPPING, e.to_string())),
        }
    }

    fn is_topping_selected(&self, name: &str) -> Result<bool, ActionError> {
        self.flag(IS_TOPPING_SELECTED, &[json!(name)])
    }

    fn is_all_selected(&self) -> Result<bool, ActionError> {
        self.flag(IS_ALL_SELECTED, &[])
    }

    fn topping_keys(&self) -> Result<Vec<String>, ActionError> {
        serde_json::from_value(self.select(TOPPING_KEYS, &[])?)
            .map_err(|e| ActionError::failed(TOPPING_KEYS, e.to_string()))
    }

    fn is_any_topping_selected(&self) -> Result<bool, ActionError> {
        self.flag(IS_ANY_TOPPING_SELECTED, &[])
    }

    fn total_upcharge(&self) -> Result<String, ActionError> {
        match self.select(TOTAL_UPCHARGE, &[])? {
            Value::String(total) => Ok(total),
            _ => Err(ActionError::failed(TOTAL_UPCHARGE, "expected a string")),
        }
    }

    fn snapshot(&self) -> ToppingsModel {
        self.surface.model().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderGeneration;
    use crate::toppings::FixtureSource;

    fn ctx() -> ControllerContext {
        ControllerContext::new(Arc::new(FixtureSource::default()), Arc::new(|_: Vec<Topping>| {}))
    }

    #[test]
    fn surface_lists_every_action() {
        let model = ModelHandle::new(ToppingsModel::default());
        let surface = controller(&model, &ctx());
        let names: Vec<_> = surface.names().collect();
        assert_eq!(names.len(), 11);
        for selector in [GET_TOPPING, IS_ALL_SELECTED, TOTAL_UPCHARGE] {
            assert!(surface.get(selector).is_some_and(|a| a.is_derivation()));
        }
        assert!(surface.get(TOGGLE_ALL).is_some_and(|a| !a.is_derivation()));
    }

    #[test]
    fn toggle_requires_both_arguments() {
        let controller = ToppingsController::new(&ctx(), Arc::new(RenderGeneration::new()));
        let err = controller
            .surface()
            .call(TOGGLE_TOPPING, &[json!("cheese")])
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidArgument { index: 1, .. }));
    }

    #[test]
    fn toggle_unknown_key_is_recorded() {
        let generation = RenderGeneration::new();
        let controller = ToppingsController::new(&ctx(), Arc::new(generation.clone()));
        controller.toggle_topping("anchovies", true).unwrap();
        assert!(controller.is_topping_selected("anchovies").unwrap());
        assert_eq!(generation.current(), 1);
    }
}
