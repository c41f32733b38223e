//! Headless dialog sessions driven by a list of scripted steps.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use crate::engine::ActionError;
use crate::render::RenderGeneration;
use crate::toppings::{self, ControllerContext, Strategy, Topping, ToppingSource, ToppingsActions};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Invalid step '{step}': expected toggle:NAME, untoggle:NAME, all:on, all:off or confirm")]
    InvalidStep { step: String },

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Toggle { name: String, checked: bool },
    ToggleAll { checked: bool },
    Confirm,
}

impl FromStr for ReplayStep {
    type Err = ReplayError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let invalid = || ReplayError::InvalidStep {
            step: step.to_string(),
        };
        match step.split_once(':') {
            None if step == "confirm" => Ok(ReplayStep::Confirm),
            Some(("toggle", name)) if !name.is_empty() => Ok(ReplayStep::Toggle {
                name: name.to_string(),
                checked: true,
            }),
            Some(("untoggle", name)) if !name.is_empty() => Ok(ReplayStep::Toggle {
                name: name.to_string(),
                checked: false,
            }),
            Some(("all", "on")) => Ok(ReplayStep::ToggleAll { checked: true }),
            Some(("all", "off")) => Ok(ReplayStep::ToggleAll { checked: false }),
            _ => Err(invalid()),
        }
    }
}

/// State of the dialog after the last step, before unmount.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub strategy: Strategy,
    /// Render requests made over the whole session, mount included.
    pub generation: u64,
    pub upcharge: String,
    pub selection: BTreeMap<String, bool>,
    /// What the last confirm handed out, if any step confirmed.
    pub confirmed: Option<Vec<Topping>>,
}

/// Mount a dialog, apply `steps` in order, report, then unmount.
pub async fn replay(
    strategy: Strategy,
    source: Arc<dyn ToppingSource>,
    initial_selection: Vec<String>,
    steps: &[ReplayStep],
) -> Result<ReplayReport, ReplayError> {
    let generation = RenderGeneration::new();
    let confirmed: Arc<Mutex<Option<Vec<Topping>>>> = Arc::default();
    let sink = {
        let confirmed = Arc::clone(&confirmed);
        Arc::new(move |chosen: Vec<Topping>| *confirmed.lock() = Some(chosen))
    };
    let ctx = ControllerContext::new(source, sink).with_initial_selection(initial_selection);
    let actions = toppings::build(strategy, &ctx, Arc::new(generation.clone()));

    actions.on_mount()?.settled().await?;
    for step in steps {
        tracing::debug!(?step, "replaying");
        apply(actions.as_ref(), step)?;
    }

    let report = ReplayReport {
        strategy,
        generation: generation.current(),
        upcharge: actions.total_upcharge()?,
        selection: actions.snapshot().selected,
        confirmed: confirmed.lock().take(),
    };

    actions.on_unmount()?.settled().await?;
    Ok(report)
}

fn apply(actions: &dyn ToppingsActions, step: &ReplayStep) -> Result<(), ActionError> {
    match step {
        ReplayStep::Toggle { name, checked } => actions.toggle_topping(name, *checked),
        ReplayStep::ToggleAll { checked } => actions.toggle_all(*checked),
        ReplayStep::Confirm => actions.confirm(),
    }
}
