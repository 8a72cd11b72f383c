//! WebAssembly bindings for Prestimax.
//!
//! This module provides JavaScript-accessible functions for the prestige
//! time estimator. Inputs and outputs are JSON strings; decimals are passed
//! as strings so no precision is lost crossing into JavaScript.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::CalculatorConfig;
use crate::data::parse_snapshot_json;
use crate::display::{bottleneck_message, format_duration};
use crate::models::{Bottleneck, Eta, Goal, PrestigeResult, RequirementKind};
use crate::optimizer;

/// JavaScript-friendly goal output.
#[derive(Debug, Clone, Serialize)]
pub struct JsGoal {
    pub name: String,
    pub buy_required: String,
    pub buy_total: String,
    pub twin_required: String,
    pub twin_total: String,
    /// `None` when the buy half can never be afforded
    pub buy_time_seconds: Option<String>,
    pub twin_time_seconds: Option<String>,
    pub time_formatted: String,
}

/// JavaScript-friendly bottleneck output.
#[derive(Debug, Clone, Serialize)]
pub struct JsBottleneck {
    pub goal: String,
    pub kind: RequirementKind,
    pub required: String,
    pub time_seconds: Option<String>,
    pub message: String,
}

/// JavaScript-friendly estimation result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsPrestigeResult {
    pub success: bool,
    pub error: Option<String>,
    pub time_to_prestige_seconds: Option<String>,
    pub time_to_prestige_formatted: String,
    pub bottleneck: Option<JsBottleneck>,
    pub goals: Vec<JsGoal>,
}

fn seconds(eta: &Eta) -> Option<String> {
    eta.seconds().map(|s| s.normalized().to_string())
}

impl From<&Goal> for JsGoal {
    fn from(goal: &Goal) -> Self {
        JsGoal {
            name: goal.name.clone(),
            buy_required: goal.buy_required.normalized().to_string(),
            buy_total: goal.buy_total.normalized().to_string(),
            twin_required: goal.twin_required.normalized().to_string(),
            twin_total: goal.twin_total.normalized().to_string(),
            buy_time_seconds: seconds(&goal.buy_time),
            twin_time_seconds: seconds(&goal.twin_time),
            time_formatted: format_duration(&goal.time_to_prestige()),
        }
    }
}

impl From<&Bottleneck> for JsBottleneck {
    fn from(bottleneck: &Bottleneck) -> Self {
        JsBottleneck {
            goal: bottleneck.goal.clone(),
            kind: bottleneck.kind,
            required: bottleneck.required.normalized().to_string(),
            time_seconds: seconds(&bottleneck.time),
            message: bottleneck_message(bottleneck),
        }
    }
}

impl From<&PrestigeResult> for JsPrestigeResult {
    fn from(result: &PrestigeResult) -> Self {
        JsPrestigeResult {
            success: true,
            error: None,
            time_to_prestige_seconds: seconds(&result.time_to_prestige),
            time_to_prestige_formatted: format_duration(&result.time_to_prestige),
            bottleneck: result.bottleneck.as_ref().map(JsBottleneck::from),
            goals: result.goals.iter().map(JsGoal::from).collect(),
        }
    }
}

fn failure(message: String) -> String {
    log::warn!("{}", message);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&message));

    serde_json::to_string(&JsPrestigeResult {
        success: false,
        error: Some(message),
        time_to_prestige_formatted: format_duration(&Eta::Never),
        ..Default::default()
    })
    .unwrap_or_default()
}

/// Get the bundled sample snapshot.
/// This embeds the JSON fixture directly into the WASM binary.
#[wasm_bindgen]
pub fn get_sample_snapshot() -> String {
    include_str!("../data/sample_snapshot.json").to_string()
}

/// Estimate the time to prestige for a snapshot.
///
/// Takes the snapshot and an optional calculator configuration as JSON
/// strings (an empty configuration uses the defaults) and returns a JSON
/// string result.
#[wasm_bindgen]
pub fn calculate_prestige(snapshot_json: &str, config_json: &str) -> String {
    let config = if config_json.trim().is_empty() {
        CalculatorConfig::default()
    } else {
        match serde_json::from_str::<CalculatorConfig>(config_json) {
            Ok(config) => config,
            Err(e) => return failure(format!("Invalid config: {}", e)),
        }
    };
    if let Err(e) = config.validate() {
        return failure(e.to_string());
    }

    let snapshot = match parse_snapshot_json(snapshot_json) {
        Ok(snapshot) => snapshot,
        Err(e) => return failure(format!("Invalid snapshot: {}", e)),
    };

    let result = optimizer::calculate_prestige(&snapshot, &config);
    serde_json::to_string(&JsPrestigeResult::from(&result)).unwrap_or_default()
}

/// Get the version of the estimator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
