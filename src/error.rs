//! Error types for the snapshot loader and configuration layer.
//!
//! The estimation core never fails: unreachable goals are reported as
//! [`Eta::Never`](crate::models::Eta::Never). Errors only arise while
//! turning external input into a [`GameSnapshot`](crate::models::GameSnapshot)
//! or a [`CalculatorConfig`](crate::config::CalculatorConfig).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV snapshot: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid decimal {value:?} in {field}")]
    InvalidDecimal { field: String, value: String },

    #[error("unknown unit {0:?}")]
    UnknownUnit(String),

    #[error("unknown action {0:?}")]
    UnknownAction(String),

    #[error("duplicate id {0:?}")]
    DuplicateId(String),

    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
