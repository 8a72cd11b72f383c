//! Data models and structures for Prestimax.
//!
//! This module contains the game snapshot the estimator reads (units, production
//! relations, actions and their prices) and the result records it produces
//! (goals, the prestige result and its bottleneck).
//!
//! Units and actions live in flat tables inside [`GameSnapshot`] and refer to
//! each other through the [`UnitId`] and [`ActionId`] index handles.

use std::fmt;

use bigdecimal::{BigDecimal, Context, One, RoundingMode, ToPrimitive, Zero};
use serde::{Deserialize, Serialize, Serializer};

/// Largest exponent used when compounding a price's grow factor.
const MAX_PRICE_EXPONENT: i64 = 1_000_000;

/// Index of a [`Unit`] in [`GameSnapshot::units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

/// Index of an [`Action`] in [`GameSnapshot::actions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

/// Estimated time until something becomes available.
///
/// `Never` orders after every finite time, so the usual `max`/`min` helpers
/// give bottleneck semantics for free.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::models::Eta;
///
/// let soon = Eta::Finite(BigDecimal::from(30));
/// assert!(soon < Eta::Never);
/// assert_eq!(soon.clone().max(Eta::zero()), soon);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Eta {
    /// Reachable after this many seconds
    Finite(BigDecimal),
    /// Unreachable under the current production graph
    Never,
}

impl Eta {
    pub fn zero() -> Self {
        Eta::Finite(BigDecimal::zero())
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Eta::Never)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Eta::Finite(s) if s.is_zero())
    }

    /// Seconds until ready, or `None` when unreachable.
    pub fn seconds(&self) -> Option<&BigDecimal> {
        match self {
            Eta::Finite(s) => Some(s),
            Eta::Never => None,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Finite(s) => write!(f, "{}s", s.with_scale_round(3, RoundingMode::HalfEven).normalized()),
            Eta::Never => write!(f, "never"),
        }
    }
}

// Finite times serialize as decimal strings, `Never` as null.
impl Serialize for Eta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Eta::Finite(s) => serializer.collect_str(s),
            Eta::Never => serializer.serialize_none(),
        }
    }
}

/// A resource or population tracked by the game.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Stable identifier used by snapshots (e.g., "larva")
    pub id: String,
    /// Display name (e.g., "Larva")
    pub name: String,
    /// Quantity currently owned
    pub quantity: BigDecimal,
    /// Locked units never contribute production
    pub unlocked: bool,
    /// Inbound production edges
    pub produced_by: Vec<ProductionRelation>,
    /// Direct purchase action
    pub buy_action: Option<ActionId>,
    /// Multiplier ("twin") action that divides the buy action's requirement
    pub twin_action: Option<ActionId>,
}

impl Unit {
    /// Creates an unlocked unit with no producers and no actions.
    pub fn new(id: &str, quantity: BigDecimal) -> Self {
        Unit {
            id: id.to_string(),
            name: id.to_string(),
            quantity,
            unlocked: true,
            produced_by: Vec::new(),
            buy_action: None,
            twin_action: None,
        }
    }
}

/// Directed production edge from `producer` into the owning unit.
#[derive(Debug, Clone)]
pub struct ProductionRelation {
    pub producer: UnitId,
    /// Units produced per second by one producer
    pub prod_per_sec: BigDecimal,
    /// Game-state toggle; inactive relations produce nothing
    pub active: bool,
}

impl ProductionRelation {
    pub fn new(producer: UnitId, prod_per_sec: BigDecimal) -> Self {
        ProductionRelation {
            producer,
            prod_per_sec,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// One entry of an action's price list.
///
/// The `k`-th purchase (0-based) costs `base_price * grow_factor^k` of `unit`.
#[derive(Debug, Clone)]
pub struct Price {
    pub unit: UnitId,
    pub base_price: BigDecimal,
    pub grow_factor: BigDecimal,
}

impl Price {
    pub fn new(unit: UnitId, base_price: BigDecimal, grow_factor: BigDecimal) -> Self {
        Price {
            unit,
            base_price,
            grow_factor,
        }
    }

    /// Total price of `n` more purchases after `owned` have been made.
    ///
    /// Sums the geometric series `base * g^owned * (g^n - 1) / (g - 1)`, which
    /// collapses to `base * n` for a flat price.
    pub fn total_for(&self, owned: &BigDecimal, n: &BigDecimal, ctx: &Context) -> BigDecimal {
        if self.grow_factor == BigDecimal::one() {
            return ctx.multiply(&self.base_price, n);
        }

        let already = self.grow_factor.powi_with_context(price_exponent(owned), ctx);
        let first = ctx.multiply(&self.base_price, &already);
        let growth = self.grow_factor.powi_with_context(price_exponent(n), ctx) - BigDecimal::one();
        let ratio = self.grow_factor.clone() - BigDecimal::one();

        ctx.multiply(&first, &ctx.multiply(&growth, &ctx.invert(&ratio)))
    }
}

fn price_exponent(count: &BigDecimal) -> i64 {
    count
        .with_scale_round(0, RoundingMode::Ceiling)
        .to_i64()
        .unwrap_or(MAX_PRICE_EXPONENT)
        .clamp(0, MAX_PRICE_EXPONENT)
}

/// A quantity of a unit that must be on hand.
///
/// `base_price` is an absolute amount, not an increment over the current
/// quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Cost {
    pub unit: UnitId,
    pub base_price: BigDecimal,
}

impl Cost {
    pub fn new(unit: UnitId, base_price: BigDecimal) -> Self {
        Cost { unit, base_price }
    }
}

/// A purchasable operation, such as hiring a unit or buying its twin.
#[derive(Debug, Clone)]
pub struct Action {
    pub id: String,
    pub name: String,
    /// Times this action has been performed
    pub quantity: BigDecimal,
    pub prices: Vec<Price>,
}

impl Action {
    pub fn new(id: &str, quantity: BigDecimal) -> Self {
        Action {
            id: id.to_string(),
            name: id.to_string(),
            quantity,
            prices: Vec::new(),
        }
    }

    /// Resources needed on hand to perform `n` more instances of this action.
    ///
    /// Returns one [`Cost`] per price-list entry, in price-list order. A
    /// non-positive `n` needs nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use bigdecimal::{BigDecimal, Context};
    /// use prestimax::models::{Action, Price, UnitId};
    ///
    /// let mut hire = Action::new("hire_ant", BigDecimal::from(0));
    /// hire.prices.push(Price::new(UnitId(0), BigDecimal::from(10), BigDecimal::from(2)));
    ///
    /// // 10 + 20 + 40
    /// let costs = hire.get_costs(&BigDecimal::from(3), &Context::default());
    /// assert_eq!(costs[0].base_price, BigDecimal::from(70));
    /// ```
    pub fn get_costs(&self, n: &BigDecimal, ctx: &Context) -> Vec<Cost> {
        if *n <= BigDecimal::zero() {
            return Vec::new();
        }

        self.prices
            .iter()
            .map(|price| Cost {
                unit: price.unit,
                base_price: price.total_for(&self.quantity, n, ctx),
            })
            .collect()
    }
}

/// Everything the estimator reads: units, actions and the prestige thresholds.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub units: Vec<Unit>,
    pub actions: Vec<Action>,
    /// Quantities required before prestige becomes available
    pub unlock_thresholds: Vec<Cost>,
}

impl GameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        self.units.push(unit);
        UnitId(self.units.len() - 1)
    }

    pub fn add_action(&mut self, action: Action) -> ActionId {
        self.actions.push(action);
        ActionId(self.actions.len() - 1)
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.0]
    }

    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    pub fn action_mut(&mut self, id: ActionId) -> &mut Action {
        &mut self.actions[id.0]
    }

    /// Looks up a unit handle by its string id.
    pub fn find_unit(&self, id: &str) -> Option<UnitId> {
        self.units.iter().position(|u| u.id == id).map(UnitId)
    }

    /// Looks up an action handle by its string id.
    pub fn find_action(&self, id: &str) -> Option<ActionId> {
        self.actions.iter().position(|a| a.id == id).map(ActionId)
    }
}

/// The recommended plan for one unlock threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    /// Name of the unit the threshold is on
    pub name: String,
    /// Additional buy actions to perform
    pub buy_required: BigDecimal,
    /// Buy action count after the plan completes
    pub buy_total: BigDecimal,
    /// Additional twin actions to perform
    pub twin_required: BigDecimal,
    /// Twin action count after the plan completes
    pub twin_total: BigDecimal,
    /// Wait until the buy actions are affordable
    pub buy_time: Eta,
    /// Wait until the twin actions are affordable
    pub twin_time: Eta,
}

impl Goal {
    /// A goal that can never be met.
    pub fn unreachable(name: &str) -> Self {
        Goal {
            name: name.to_string(),
            buy_required: BigDecimal::zero(),
            buy_total: BigDecimal::zero(),
            twin_required: BigDecimal::zero(),
            twin_total: BigDecimal::zero(),
            buy_time: Eta::Never,
            twin_time: Eta::Never,
        }
    }

    /// Both halves of the plan must finish before the threshold is met.
    pub fn time_to_prestige(&self) -> Eta {
        self.buy_time.clone().max(self.twin_time.clone())
    }
}

/// Which half of a goal a requirement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Buy,
    Twin,
}

/// The slowest single requirement across all goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub goal: String,
    pub kind: RequirementKind,
    pub required: BigDecimal,
    pub time: Eta,
}

/// Combined estimate over every unlock threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrestigeResult {
    pub goals: Vec<Goal>,
    pub time_to_prestige: Eta,
    pub bottleneck: Option<Bottleneck>,
}

// ============================================================================
// Snapshot Record Structures
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_grow_factor() -> BigDecimal {
    BigDecimal::one()
}

/// Serialized game snapshot; units, actions and thresholds refer to each other by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub unlock_thresholds: Vec<CostRecord>,
}

/// Serialized [`Unit`].
#[derive(Debug, Clone, Deserialize)]
pub struct UnitRecord {
    pub id: String,
    /// Defaults to the id
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: BigDecimal,
    #[serde(default = "default_true")]
    pub unlocked: bool,
    #[serde(default)]
    pub produced_by: Vec<RelationRecord>,
    /// Id of the buy action
    #[serde(default)]
    pub buy_action: Option<String>,
    /// Id of the twin action
    #[serde(default)]
    pub twin_action: Option<String>,
}

/// Serialized [`ProductionRelation`].
#[derive(Debug, Clone, Deserialize)]
pub struct RelationRecord {
    /// Id of the producing unit
    pub producer: String,
    pub prod_per_sec: BigDecimal,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Serialized [`Action`].
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: BigDecimal,
    #[serde(default)]
    pub prices: Vec<PriceRecord>,
}

/// Serialized [`Price`].
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRecord {
    pub unit: String,
    pub base_price: BigDecimal,
    #[serde(default = "default_grow_factor")]
    pub grow_factor: BigDecimal,
}

/// Serialized [`Cost`].
#[derive(Debug, Clone, Deserialize)]
pub struct CostRecord {
    pub unit: String,
    pub base_price: BigDecimal,
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// Row of `units.csv`.
#[derive(Debug, Deserialize)]
pub struct UnitRow {
    pub id: String,
    pub name: Option<String>,
    pub quantity: String,
    pub unlocked: Option<bool>,
    pub buy_action: Option<String>,
    pub twin_action: Option<String>,
}

/// Row of `relations.csv`: `producer` produces `unit`.
#[derive(Debug, Deserialize)]
pub struct RelationRow {
    pub unit: String,
    pub producer: String,
    pub prod_per_sec: String,
    pub active: Option<bool>,
}

/// Row of `actions.csv`.
#[derive(Debug, Deserialize)]
pub struct ActionRow {
    pub id: String,
    pub name: Option<String>,
    pub quantity: String,
}

/// Row of `prices.csv`.
#[derive(Debug, Deserialize)]
pub struct PriceRow {
    pub action: String,
    pub unit: String,
    pub base_price: String,
    pub grow_factor: Option<String>,
}

/// Row of `thresholds.csv`.
#[derive(Debug, Deserialize)]
pub struct ThresholdRow {
    pub unit: String,
    pub base_price: String,
}
