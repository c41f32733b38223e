use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::toppings::{CatalogFileSource, FixtureSource, Strategy, ToppingSource};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Default behavior of the dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Change-detection engine: "diff" or "intercept".
    #[serde(default)]
    pub strategy: Strategy,
    /// Topping names checked when the dialog opens.
    #[serde(default)]
    pub initial_selection: Vec<String>,
}

/// Where toppings are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file (`.toml` or `.json`). Built-in list when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<Strategy>,
    pub select: Vec<String>,
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides. A non-empty `select` replaces the initial selection.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(strategy) = overrides.strategy {
            self.defaults.strategy = strategy;
        }
        if !overrides.select.is_empty() {
            self.defaults.initial_selection = overrides.select;
        }
        if let Some(path) = overrides.catalog {
            self.catalog.path = Some(path);
        }
        self
    }

    pub fn source(&self) -> Arc<dyn ToppingSource> {
        match &self.catalog.path {
            Some(path) => Arc::new(CatalogFileSource::new(path.clone())),
            None => Arc::new(FixtureSource::default()),
        }
    }
}
