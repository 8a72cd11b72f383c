//! Tests for calculator configuration loading.

use clap::ValueEnum;
use prestimax::config::{CalculatorConfig, SearchStrategy};
use prestimax::optimizer::MAX_TWINS;
use prestimax::solver::DEFAULT_PRECISION;
use prestimax::Error;
use std::fs;

#[test]
fn test_default_config() {
    let config = CalculatorConfig::default();
    assert_eq!(config.precision, DEFAULT_PRECISION);
    assert_eq!(config.strategy, SearchStrategy::Exhaustive);
    assert_eq!(config.max_twins, MAX_TWINS);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = CalculatorConfig::from_toml_str("").unwrap();
    assert_eq!(config, CalculatorConfig::default());
}

#[test]
fn test_partial_toml() {
    let config = CalculatorConfig::from_toml_str("strategy = \"bracketed\"\nmax_twins = 12\n").unwrap();
    assert_eq!(config.strategy, SearchStrategy::Bracketed);
    assert_eq!(config.max_twins, 12);
    assert_eq!(config.precision, DEFAULT_PRECISION);
}

#[test]
fn test_zero_precision_rejected() {
    let err = CalculatorConfig::from_toml_str("precision = 0").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_unknown_strategy_rejected() {
    let err = CalculatorConfig::from_toml_str("strategy = \"random\"").unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("prestimax_config_{}.toml", std::process::id()));
    fs::write(&path, "precision = 40\n").unwrap();
    let config = CalculatorConfig::load(&path);
    fs::remove_file(&path).ok();

    assert_eq!(config.unwrap().precision, 40);
}

#[test]
fn test_load_missing_file() {
    let err = CalculatorConfig::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_strategy_command_line_names() {
    assert_eq!(
        SearchStrategy::from_str("exhaustive", false),
        Ok(SearchStrategy::Exhaustive)
    );
    assert_eq!(
        SearchStrategy::from_str("bracketed", false),
        Ok(SearchStrategy::Bracketed)
    );
    assert!(SearchStrategy::from_str("random", false).is_err());
}
