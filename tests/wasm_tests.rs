//! Tests for the WebAssembly bindings, called as plain Rust functions.

use prestimax::wasm::{calculate_prestige, get_sample_snapshot, get_version};
use serde_json::Value;

fn run(snapshot: &str, config: &str) -> Value {
    serde_json::from_str(&calculate_prestige(snapshot, config)).expect("result should be JSON")
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_sample_with_default_config() {
    let result = run(&get_sample_snapshot(), "");

    assert_eq!(result["success"], true);
    assert!(result["error"].is_null());
    assert_eq!(result["time_to_prestige_seconds"], "10");
    assert_eq!(result["time_to_prestige_formatted"], "10s");

    let bottleneck = &result["bottleneck"];
    assert_eq!(bottleneck["goal"], "Drone");
    assert_eq!(bottleneck["kind"], "buy");
    assert_eq!(bottleneck["required"], "10");
    assert_eq!(bottleneck["message"], "+10 Drone");

    let goals = result["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0]["name"], "Drone");
    assert_eq!(goals[0]["buy_total"], "20");
    assert_eq!(goals[1]["name"], "Meat");
    assert_eq!(goals[1]["buy_time_seconds"], "10");
    assert_eq!(goals[1]["twin_time_seconds"], "0");
}

#[test]
fn test_sample_with_custom_config() {
    let result = run(
        &get_sample_snapshot(),
        r#"{ "strategy": "bracketed", "max_twins": 5, "precision": 60 }"#,
    );

    assert_eq!(result["success"], true);
    assert_eq!(result["time_to_prestige_seconds"], "10");
}

#[test]
fn test_unreachable_prestige() {
    let result = run(
        r#"{
            "units": [{ "id": "relic", "name": "Relic" }],
            "unlock_thresholds": [{ "unit": "relic", "base_price": "1" }]
        }"#,
        "",
    );

    assert_eq!(result["success"], true);
    assert!(result["time_to_prestige_seconds"].is_null());
    assert_eq!(result["time_to_prestige_formatted"], "never");
    assert_eq!(result["bottleneck"]["message"], "+0 Relic");
    assert!(result["goals"][0]["buy_time_seconds"].is_null());
}

#[test]
fn test_invalid_snapshot() {
    let result = run("not json", "");

    assert_eq!(result["success"], false);
    assert!(result["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid snapshot"));
    assert!(result["goals"].as_array().unwrap().is_empty());
}

#[test]
fn test_unknown_unit_in_snapshot() {
    let result = run(
        r#"{ "unlock_thresholds": [{ "unit": "queen", "base_price": "1" }] }"#,
        "",
    );

    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("queen"));
}

#[test]
fn test_invalid_config() {
    let result = run(&get_sample_snapshot(), r#"{ "strategy": "random" }"#);
    assert_eq!(result["success"], false);
    assert!(result["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid config"));

    let result = run(&get_sample_snapshot(), r#"{ "precision": 0 }"#);
    assert_eq!(result["success"], false);
}
