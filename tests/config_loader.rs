mod common;

use std::path::PathBuf;

use common::*;
use toppings::config::{Config, ConfigError, Overrides};
use toppings::toppings::Strategy;

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.defaults.strategy, Strategy::Diff);
    assert!(config.defaults.initial_selection.is_empty());
    assert!(config.catalog.path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("toppings/config.toml"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_full_file() {
    let (_dir, path) = temp_file(
        "config.toml",
        r#"
[defaults]
strategy = "intercept"
initial_selection = ["cheese", "bacon"]

[catalog]
path = "/srv/toppings.json"
"#,
    );
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.defaults.strategy, Strategy::Intercept);
    assert_eq!(config.defaults.initial_selection, vec!["cheese", "bacon"]);
    assert_eq!(config.catalog.path, Some(PathBuf::from("/srv/toppings.json")));
}

#[test]
fn test_partial_file_fills_defaults() {
    let (_dir, path) = temp_file("config.toml", "[defaults]\ninitial_selection = [\"meat\"]\n");
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.defaults.strategy, Strategy::Diff);
    assert_eq!(config.defaults.initial_selection, vec!["meat"]);
}

#[test]
fn test_unknown_strategy_is_parse_error() {
    let (_dir, path) = temp_file("config.toml", "[defaults]\nstrategy = \"magic\"\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_catalog_extension_is_validated() {
    let (_dir, path) = temp_file("config.toml", "[catalog]\npath = \"toppings.csv\"\n");
    let err = Config::load_from(&path).unwrap_err();
    match err {
        ConfigError::ValidationError { message } => assert!(message.contains("toppings.csv")),
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_blank_selection_name_is_rejected() {
    let mut config = Config::default();
    config.defaults.initial_selection = vec!["  ".to_string()];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_overrides_win_over_file() {
    let (_dir, path) = temp_file(
        "config.toml",
        "[defaults]\nstrategy = \"diff\"\ninitial_selection = [\"cheese\"]\n",
    );
    let config = Config::load_from(&path).unwrap().with_overrides(Overrides {
        strategy: Some(Strategy::Intercept),
        select: vec!["meat".to_string()],
        catalog: Some(PathBuf::from("menu.toml")),
    });
    assert_eq!(config.defaults.strategy, Strategy::Intercept);
    assert_eq!(config.defaults.initial_selection, vec!["meat"]);
    assert_eq!(config.catalog.path, Some(PathBuf::from("menu.toml")));
}

#[test]
fn test_empty_overrides_keep_file_values() {
    let (_dir, path) = temp_file("config.toml", "[defaults]\ninitial_selection = [\"cheese\"]\n");
    let config = Config::load_from(&path)
        .unwrap()
        .with_overrides(Overrides::default());
    assert_eq!(config.defaults.initial_selection, vec!["cheese"]);
}
