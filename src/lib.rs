//! # Prestimax
//!
//! A command-line tool and library for estimating how long an idle game's
//! prestige takes to unlock.
//!
//! Prestige is gated behind several resource thresholds. Given a snapshot of
//! the current game state, this crate estimates the earliest time at which
//! every threshold can be met, based on:
//!
//! - Current unit quantities
//! - Production rates over up to three tiers of producers
//! - Buy and twin action prices, including geometric price growth
//! - The twin count that best trades twin cost against buy cost
//!
//! ## Modules
//!
//! - [`models`] - Game snapshot, time values and result records
//! - [`solver`] - Arbitrary-precision cubic root solver
//! - [`estimator`] - Time-to-threshold and time-to-afford estimation
//! - [`optimizer`] - Per-threshold goal optimization and prestige aggregation
//! - [`config`] - Calculator settings
//! - [`data`] - JSON and CSV snapshot loading
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error types for loading and configuration
//!
//! ## Example Usage
//!
//! ```no_run
//! use prestimax::{
//!     config::CalculatorConfig,
//!     data::load_snapshot,
//!     display::display_results,
//!     optimizer::calculate_prestige,
//! };
//! use std::path::Path;
//!
//! // Load a snapshot (a JSON file or a directory of CSV tables)
//! let snapshot = load_snapshot(Path::new("data/sample_snapshot.json")).unwrap();
//!
//! let result = calculate_prestige(&snapshot, &CalculatorConfig::default());
//! display_results(&result);
//! ```
//!
//! ## Search Strategies
//!
//! The twin count of each goal can be searched two ways:
//!
//! 1. **Exhaustive** (default): evaluates every twin count up to the cap and
//!    always finds the fastest plan.
//!
//! 2. **Bracketed**: narrows in on a local minimum, evaluating far fewer
//!    candidates. Exact whenever the wait time has a single valley in the
//!    twin count.

pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod estimator;
pub mod models;
pub mod optimizer;
pub mod solver;
pub mod wasm;

pub use error::{Error, Result};
