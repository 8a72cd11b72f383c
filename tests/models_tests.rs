//! Tests for data models and structures.

use bigdecimal::{BigDecimal, Context};
use prestimax::models::{
    Action, Bottleneck, Eta, GameSnapshot, Goal, Price, RequirementKind, Unit, UnitId,
};
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

#[test]
fn test_eta_ordering() {
    let zero = Eta::zero();
    let soon = Eta::Finite(dec("30"));
    let later = Eta::Finite(dec("1e40"));

    assert!(zero < soon);
    assert!(soon < later);
    assert!(later < Eta::Never);
    assert_eq!(
        vec![soon.clone(), Eta::Never, zero.clone()].into_iter().max(),
        Some(Eta::Never)
    );
    assert_eq!(Eta::Finite(dec("10.0")), Eta::Finite(dec("10")));
}

#[test]
fn test_eta_helpers() {
    assert!(Eta::zero().is_zero());
    assert!(!Eta::Never.is_zero());
    assert!(Eta::Never.is_never());
    assert_eq!(Eta::Finite(dec("4")).seconds(), Some(&dec("4")));
    assert_eq!(Eta::Never.seconds(), None);
}

#[test]
fn test_eta_display() {
    assert_eq!(Eta::Finite(dec("10")).to_string(), "10s");
    assert_eq!(Eta::Finite(dec("2.5")).to_string(), "2.5s");
    assert_eq!(Eta::Finite(dec("1.23456")).to_string(), "1.235s");
    assert_eq!(Eta::zero().to_string(), "0s");
    assert_eq!(Eta::Never.to_string(), "never");
}

#[test]
fn test_eta_serializes_never_as_null() {
    assert_eq!(
        serde_json::to_string(&Eta::Finite(dec("2.5"))).unwrap(),
        "\"2.5\""
    );
    assert_eq!(serde_json::to_string(&Eta::Never).unwrap(), "null");
}

#[test]
fn test_flat_price_total() {
    let price = Price::new(UnitId(0), dec("10"), dec("1"));
    let ctx = Context::default();

    assert_eq!(price.total_for(&dec("0"), &dec("3"), &ctx), dec("30"));
    // Flat prices ignore previous purchases
    assert_eq!(price.total_for(&dec("7"), &dec("3"), &ctx), dec("30"));
}

#[test]
fn test_growing_price_total() {
    let price = Price::new(UnitId(0), dec("10"), dec("1.5"));
    let ctx = Context::default();

    // 10 + 15
    assert_eq!(price.total_for(&dec("0"), &dec("2"), &ctx), dec("25"));
    // 22.5 + 33.75
    assert_eq!(price.total_for(&dec("2"), &dec("2"), &ctx), dec("56.25"));
}

#[test]
fn test_action_get_costs() {
    let mut action = Action::new("hatch", dec("1"));
    action.prices.push(Price::new(UnitId(0), dec("10"), dec("2")));
    action.prices.push(Price::new(UnitId(1), dec("3"), dec("1")));
    let ctx = Context::default();

    let costs = action.get_costs(&dec("2"), &ctx);
    assert_eq!(costs.len(), 2);
    // 20 + 40
    assert_eq!(costs[0].unit, UnitId(0));
    assert_eq!(costs[0].base_price, dec("60"));
    assert_eq!(costs[1].unit, UnitId(1));
    assert_eq!(costs[1].base_price, dec("6"));
}

#[test]
fn test_action_get_costs_for_nothing() {
    let mut action = Action::new("hatch", dec("0"));
    action.prices.push(Price::new(UnitId(0), dec("10"), dec("2")));
    let ctx = Context::default();

    assert!(action.get_costs(&dec("0"), &ctx).is_empty());
    assert!(action.get_costs(&dec("-1"), &ctx).is_empty());
}

#[test]
fn test_snapshot_tables() {
    let mut snapshot = GameSnapshot::new();
    let larva = snapshot.add_unit(Unit::new("larva", dec("5")));
    let drone = snapshot.add_unit(Unit::new("drone", dec("0")));
    let hatch = snapshot.add_action(Action::new("hatch", dec("0")));

    assert_eq!(larva, UnitId(0));
    assert_eq!(drone, UnitId(1));
    assert_eq!(snapshot.find_unit("drone"), Some(drone));
    assert_eq!(snapshot.find_unit("queen"), None);
    assert_eq!(snapshot.find_action("hatch"), Some(hatch));
    assert_eq!(snapshot.unit(larva).quantity, dec("5"));

    snapshot.unit_mut(drone).buy_action = Some(hatch);
    assert_eq!(snapshot.unit(drone).buy_action, Some(hatch));
}

#[test]
fn test_new_unit_defaults() {
    let unit = Unit::new("larva", dec("5"));
    assert_eq!(unit.name, "larva");
    assert!(unit.unlocked);
    assert!(unit.produced_by.is_empty());
    assert!(unit.buy_action.is_none());
    assert!(unit.twin_action.is_none());
}

#[test]
fn test_goal_time_to_prestige() {
    let goal = Goal {
        buy_time: Eta::Finite(dec("25")),
        twin_time: Eta::Finite(dec("30")),
        ..Goal::unreachable("drone")
    };
    assert_eq!(goal.time_to_prestige(), Eta::Finite(dec("30")));

    let stuck = Goal {
        buy_time: Eta::Finite(dec("25")),
        ..Goal::unreachable("drone")
    };
    assert_eq!(stuck.time_to_prestige(), Eta::Never);
}

#[test]
fn test_goal_serialization() {
    let goal = Goal {
        buy_required: dec("250"),
        buy_time: Eta::Finite(dec("25")),
        ..Goal::unreachable("drone")
    };
    let json = serde_json::to_value(&goal).unwrap();

    assert_eq!(json["name"], "drone");
    assert_eq!(json["buy_required"], "250");
    assert_eq!(json["buy_time"], "25");
    assert!(json["twin_time"].is_null());
}

#[test]
fn test_bottleneck_serialization() {
    let bottleneck = Bottleneck {
        goal: "drone".to_string(),
        kind: RequirementKind::Twin,
        required: dec("3"),
        time: Eta::Finite(dec("30")),
    };
    let json = serde_json::to_value(&bottleneck).unwrap();

    assert_eq!(json["kind"], "twin");
    assert_eq!(json["required"], "3");
}
