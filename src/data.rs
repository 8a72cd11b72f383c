//! Snapshot loading for Prestimax.
//!
//! A game snapshot can be read from a single JSON document or from a
//! directory of CSV tables. Both formats are first read into the
//! by-id record structures of [`crate::models`] and then resolved into a
//! [`GameSnapshot`], where every cross-reference becomes an index handle.
//!
//! # CSV Layout
//!
//! | File             | Columns                                                   |
//! |------------------|-----------------------------------------------------------|
//! | `units.csv`      | `id, name, quantity, unlocked, buy_action, twin_action`   |
//! | `relations.csv`  | `unit, producer, prod_per_sec, active`                    |
//! | `actions.csv`    | `id, name, quantity`                                      |
//! | `prices.csv`     | `action, unit, base_price, grow_factor`                   |
//! | `thresholds.csv` | `unit, base_price`                                        |
//!
//! Only `units.csv` is mandatory; a missing table is treated as empty.

use csv::ReaderBuilder;
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed};

use crate::error::{Error, Result};
use crate::models::{
    Action, ActionId, ActionRecord, ActionRow, Cost, CostRecord, GameSnapshot, Price, PriceRecord,
    PriceRow, ProductionRelation, RelationRecord, RelationRow, SnapshotRecord, ThresholdRow, Unit,
    UnitId, UnitRecord, UnitRow,
};

/// Parses a decimal CSV field, reporting the offending column on failure.
fn parse_decimal(field: &str, value: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(value.trim()).map_err(|_| Error::InvalidDecimal {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Like [`parse_decimal`], but an empty or missing field yields `default`.
fn parse_decimal_or(field: &str, value: Option<&str>, default: BigDecimal) -> Result<BigDecimal> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => parse_decimal(field, v),
    }
}

fn non_negative(field: &str, value: BigDecimal) -> Result<BigDecimal> {
    if value.is_negative() {
        return Err(Error::Negative {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Reads every row of a CSV table. A missing optional table yields no rows.
fn read_rows<T: DeserializeOwned>(path: &Path, required: bool) -> Result<Vec<T>> {
    if !required && !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Parses a snapshot from a JSON document.
///
/// Decimal fields accept numbers or strings; strings keep every digit,
/// while JSON numbers pass through `f64`.
///
/// # Example
///
/// ```
/// use prestimax::data::parse_snapshot_json;
///
/// let snapshot = parse_snapshot_json(r#"{
///     "units": [
///         { "id": "ant", "quantity": "5" },
///         { "id": "food", "produced_by": [{ "producer": "ant", "prod_per_sec": "2" }] }
///     ],
///     "unlock_thresholds": [{ "unit": "food", "base_price": "100" }]
/// }"#).unwrap();
///
/// assert_eq!(snapshot.units.len(), 2);
/// assert_eq!(snapshot.unlock_thresholds.len(), 1);
/// ```
pub fn parse_snapshot_json(content: &str) -> Result<GameSnapshot> {
    let record: SnapshotRecord = serde_json::from_str(content)?;
    resolve_snapshot(record)
}

/// Loads a snapshot from a JSON file.
pub fn load_snapshot_json(path: &Path) -> Result<GameSnapshot> {
    let content = fs::read_to_string(path)?;
    let snapshot = parse_snapshot_json(&content)?;
    info!(
        "Loaded {} units, {} actions and {} thresholds from {}",
        snapshot.units.len(),
        snapshot.actions.len(),
        snapshot.unlock_thresholds.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Loads a snapshot from a directory of CSV tables.
///
/// # Arguments
///
/// * `dir` - Directory containing `units.csv` and the optional tables
///
/// # Returns
///
/// The resolved [`GameSnapshot`], or an error if a table cannot be read,
/// a decimal cannot be parsed, or an id does not resolve.
pub fn load_snapshot_csv(dir: &Path) -> Result<GameSnapshot> {
    let unit_rows: Vec<UnitRow> = read_rows(&dir.join("units.csv"), true)?;
    let relation_rows: Vec<RelationRow> = read_rows(&dir.join("relations.csv"), false)?;
    let action_rows: Vec<ActionRow> = read_rows(&dir.join("actions.csv"), false)?;
    let price_rows: Vec<PriceRow> = read_rows(&dir.join("prices.csv"), false)?;
    let threshold_rows: Vec<ThresholdRow> = read_rows(&dir.join("thresholds.csv"), false)?;

    let mut units = Vec::with_capacity(unit_rows.len());
    for row in unit_rows {
        units.push(UnitRecord {
            quantity: parse_decimal_or(
                "units.quantity",
                Some(row.quantity.as_str()),
                BigDecimal::from(0),
            )?,
            id: row.id,
            name: row.name,
            unlocked: row.unlocked.unwrap_or(true),
            produced_by: Vec::new(),
            buy_action: row.buy_action,
            twin_action: row.twin_action,
        });
    }

    for row in relation_rows {
        let unit = units
            .iter_mut()
            .find(|u| u.id == row.unit)
            .ok_or_else(|| Error::UnknownUnit(row.unit.clone()))?;
        unit.produced_by.push(RelationRecord {
            prod_per_sec: parse_decimal("relations.prod_per_sec", &row.prod_per_sec)?,
            producer: row.producer,
            active: row.active.unwrap_or(true),
        });
    }

    let mut actions = Vec::with_capacity(action_rows.len());
    for row in action_rows {
        actions.push(ActionRecord {
            quantity: parse_decimal_or(
                "actions.quantity",
                Some(row.quantity.as_str()),
                BigDecimal::from(0),
            )?,
            id: row.id,
            name: row.name,
            prices: Vec::new(),
        });
    }

    for row in price_rows {
        let action = actions
            .iter_mut()
            .find(|a| a.id == row.action)
            .ok_or_else(|| Error::UnknownAction(row.action.clone()))?;
        action.prices.push(PriceRecord {
            base_price: parse_decimal("prices.base_price", &row.base_price)?,
            grow_factor: parse_decimal_or(
                "prices.grow_factor",
                row.grow_factor.as_deref(),
                BigDecimal::from(1),
            )?,
            unit: row.unit,
        });
    }

    let mut unlock_thresholds = Vec::with_capacity(threshold_rows.len());
    for row in threshold_rows {
        unlock_thresholds.push(CostRecord {
            base_price: parse_decimal("thresholds.base_price", &row.base_price)?,
            unit: row.unit,
        });
    }

    let snapshot = resolve_snapshot(SnapshotRecord {
        units,
        actions,
        unlock_thresholds,
    })?;
    info!(
        "Loaded {} units, {} actions and {} thresholds from {}",
        snapshot.units.len(),
        snapshot.actions.len(),
        snapshot.unlock_thresholds.len(),
        dir.display()
    );
    Ok(snapshot)
}

/// Loads a snapshot from a JSON file, or from a CSV directory when `path`
/// is a directory.
pub fn load_snapshot(path: &Path) -> Result<GameSnapshot> {
    if path.is_dir() {
        load_snapshot_csv(path)
    } else {
        load_snapshot_json(path)
    }
}

/// Turns by-id records into a [`GameSnapshot`] with index handles.
///
/// Fails on duplicate ids, references to unknown units or actions, and
/// negative quantities, rates or prices.
pub fn resolve_snapshot(record: SnapshotRecord) -> Result<GameSnapshot> {
    let mut snapshot = GameSnapshot::new();
    let mut unit_ids: HashMap<String, UnitId> = HashMap::new();
    let mut action_ids: HashMap<String, ActionId> = HashMap::new();

    for unit in &record.units {
        if unit_ids.contains_key(&unit.id) {
            return Err(Error::DuplicateId(unit.id.clone()));
        }
        let mut resolved = Unit::new(&unit.id, non_negative("unit quantity", unit.quantity.clone())?);
        if let Some(name) = &unit.name {
            resolved.name = name.clone();
        }
        resolved.unlocked = unit.unlocked;
        unit_ids.insert(unit.id.clone(), snapshot.add_unit(resolved));
    }

    let mut seen_actions = HashSet::new();
    for action in &record.actions {
        if !seen_actions.insert(action.id.as_str()) {
            return Err(Error::DuplicateId(action.id.clone()));
        }
        let mut resolved =
            Action::new(&action.id, non_negative("action quantity", action.quantity.clone())?);
        if let Some(name) = &action.name {
            resolved.name = name.clone();
        }
        action_ids.insert(action.id.clone(), snapshot.add_action(resolved));
    }

    let lookup_unit = |id: &str| {
        unit_ids
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownUnit(id.to_string()))
    };
    let lookup_action = |id: &str| {
        action_ids
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownAction(id.to_string()))
    };

    for unit in &record.units {
        let id = lookup_unit(&unit.id)?;
        let buy_action = unit.buy_action.as_deref().map(lookup_action).transpose()?;
        let twin_action = unit.twin_action.as_deref().map(lookup_action).transpose()?;

        let mut produced_by = Vec::with_capacity(unit.produced_by.len());
        for relation in &unit.produced_by {
            let mut resolved = ProductionRelation::new(
                lookup_unit(&relation.producer)?,
                non_negative("prod_per_sec", relation.prod_per_sec.clone())?,
            );
            resolved.active = relation.active;
            produced_by.push(resolved);
        }

        let target = snapshot.unit_mut(id);
        target.buy_action = buy_action;
        target.twin_action = twin_action;
        target.produced_by = produced_by;
    }

    for action in &record.actions {
        let id = lookup_action(&action.id)?;
        let mut prices = Vec::with_capacity(action.prices.len());
        for price in &action.prices {
            prices.push(Price::new(
                lookup_unit(&price.unit)?,
                non_negative("base_price", price.base_price.clone())?,
                non_negative("grow_factor", price.grow_factor.clone())?,
            ));
        }
        snapshot.action_mut(id).prices = prices;
    }

    for threshold in &record.unlock_thresholds {
        let unit = lookup_unit(&threshold.unit)?;
        if !snapshot.unit(unit).unlocked {
            warn!("Unlock threshold on locked unit {}", threshold.unit);
        }
        snapshot.unlock_thresholds.push(Cost::new(
            unit,
            non_negative("threshold", threshold.base_price.clone())?,
        ));
    }

    Ok(snapshot)
}
