//! Where the dialog's toppings come from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::model::Topping;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid catalog: {message}")]
    Invalid { message: String },

    #[error("Toppings unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous provider of the topping list.
#[async_trait]
pub trait ToppingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Topping>, SourceError>;
}

/// Fixed in-memory list.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    toppings: Vec<Topping>,
}

impl FixtureSource {
    pub fn new(toppings: Vec<Topping>) -> Self {
        Self { toppings }
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new(vec![
            Topping::new("cheese", 0.99),
            Topping::new("meat", 1.29),
            Topping::new("bacon", 0.5),
            Topping::new("spinach", 0.99),
        ])
    }
}

#[async_trait]
impl ToppingSource for FixtureSource {
    async fn fetch(&self) -> Result<Vec<Topping>, SourceError> {
        Ok(self.toppings.clone())
    }
}

/// Catalog stored on disk, as TOML (`[[toppings]]` tables) or a JSON array.
///
/// The file is read on every fetch, so edits show up on the next mount.
#[derive(Debug, Clone)]
pub struct CatalogFileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct CatalogFile {
    toppings: Vec<Topping>,
}

impl CatalogFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ToppingSource for CatalogFileSource {
    async fn fetch(&self) -> Result<Vec<Topping>, SourceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let content = std::fs::read_to_string(&path).map_err(|e| SourceError::Read {
                path: path.clone(),
                source: e,
            })?;
            parse_catalog(&path, &content)
        })
        .await
        .map_err(|e| SourceError::Unavailable(e.to_string()))?
    }
}

/// Parse and validate catalog text. The format follows the file extension.
pub fn parse_catalog(path: &Path, content: &str) -> Result<Vec<Topping>, SourceError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let toppings = if is_json {
        serde_json::from_str::<Vec<Topping>>(content).map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        toml::from_str::<CatalogFile>(content)
            .map_err(|e| SourceError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .toppings
    };

    validate(&toppings)?;
    Ok(toppings)
}

fn validate(toppings: &[Topping]) -> Result<(), SourceError> {
    let mut seen = HashSet::new();
    for topping in toppings {
        if !seen.insert(topping.name.as_str()) {
            return Err(SourceError::Invalid {
                message: format!("duplicate topping '{}'", topping.name),
            });
        }
        if !topping.cost.is_finite() || topping.cost < 0.0 {
            return Err(SourceError::Invalid {
                message: format!("topping '{}' has invalid cost {}", topping.name, topping.cost),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_catalog() {
        let content = r#"
[[toppings]]
name = "cheese"
cost = 1.42

[[toppings]]
name = "olives"
cost = 2.32
"#;
        let toppings = parse_catalog(Path::new("catalog.toml"), content).unwrap();
        assert_eq!(
            toppings,
            vec![Topping::new("cheese", 1.42), Topping::new("olives", 2.32)]
        );
    }

    #[test]
    fn json_catalog() {
        let content = r#"[{ "name": "onions", "cost": 3.11 }]"#;
        let toppings = parse_catalog(Path::new("catalog.JSON"), content).unwrap();
        assert_eq!(toppings, vec![Topping::new("onions", 3.11)]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let content = r#"[{ "name": "a", "cost": 1 }, { "name": "a", "cost": 2 }]"#;
        assert!(matches!(
            parse_catalog(Path::new("c.json"), content),
            Err(SourceError::Invalid { .. })
        ));
    }

    #[test]
    fn negative_cost_rejected() {
        let content = r#"[{ "name": "a", "cost": -1 }]"#;
        assert!(matches!(
            parse_catalog(Path::new("c.json"), content),
            Err(SourceError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            parse_catalog(Path::new("c.toml"), "toppings = 3"),
            Err(SourceError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn fixture_source_lists_four_toppings() {
        let toppings = FixtureSource::default().fetch().await.unwrap();
        let names: Vec<_> = toppings.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["cheese", "meat", "bacon", "spinach"]);
    }
}
