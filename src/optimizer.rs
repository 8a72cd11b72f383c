//! Goal optimization and prestige aggregation.
//!
//! Every unlock threshold is a quantity of some unit. Units bought through a
//! buy action can also be "twinned": each twin adds one to a multiplier that
//! divides the number of buy actions needed. Twins cost resources of their
//! own, so this module searches the twin count that finishes both halves of
//! the plan soonest, then folds all goals into one prestige estimate.

use std::collections::BTreeMap;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, One, Signed, ToPrimitive, Zero};
use log::{debug, info};

use crate::config::{CalculatorConfig, SearchStrategy};
use crate::estimator::{ActionCostEstimator, ProductionTimeEstimator};
use crate::models::{
    ActionId, Bottleneck, Cost, Eta, GameSnapshot, Goal, PrestigeResult, RequirementKind, Unit,
};
use crate::solver::CubicSolver;

/// Most twins a single unit can ever have.
pub const MAX_TWINS: u64 = 80;

/// Exact `ceil(numerator / denominator)` for a positive `denominator`,
/// however many digits either side carries.
fn ceil_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    let scale = numerator
        .fractional_digit_count()
        .max(denominator.fractional_digit_count());
    let (num, _) = numerator.with_scale(scale).into_bigint_and_exponent();
    let (den, _) = denominator.with_scale(scale).into_bigint_and_exponent();

    let quotient = &num / &den;
    let quotient = if (&num % &den).is_positive() {
        quotient + BigInt::one()
    } else {
        quotient
    };
    BigDecimal::new(quotient, 0)
}

/// One candidate twin count and what it implies for the buy action.
#[derive(Debug, Clone)]
struct TwinPlan {
    twin_required: BigDecimal,
    buy_required: BigDecimal,
    twin_time: Eta,
    buy_time: Eta,
}

impl TwinPlan {
    fn time_to_prestige(&self) -> Eta {
        self.buy_time.clone().max(self.twin_time.clone())
    }
}

/// Scans every candidate in `0..=upper` and returns the cheapest.
///
/// Ties go to the smallest candidate.
pub fn exhaustive_search<F>(upper: u64, mut cost: F) -> (u64, Eta)
where
    F: FnMut(u64) -> Eta,
{
    let mut best = (0, cost(0));
    for candidate in 1..=upper {
        let eta = cost(candidate);
        if eta < best.1 {
            best = (candidate, eta);
        }
    }
    best
}

/// Bracketed local search over `0..=upper`.
///
/// Evaluates the bracket midpoint and moves toward whichever neighbour is
/// strictly cheaper, stopping at the first local minimum. Each candidate is
/// evaluated at most once, and the cheapest candidate seen is returned. The
/// result equals [`exhaustive_search`] whenever `cost` is unimodal.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::models::Eta;
/// use prestimax::optimizer::bracketed_search;
///
/// let valley = |n: u64| Eta::Finite(BigDecimal::from((n as i64 - 17).pow(2)));
/// assert_eq!(bracketed_search(80, valley).0, 17);
/// ```
pub fn bracketed_search<F>(upper: u64, mut cost: F) -> (u64, Eta)
where
    F: FnMut(u64) -> Eta,
{
    let mut seen: BTreeMap<u64, Eta> = BTreeMap::new();
    let mut eval = |n: u64| seen.entry(n).or_insert_with(|| cost(n)).clone();

    let (mut left, mut right) = (0u64, upper);
    while left <= right {
        let mid = left + (right - left) / 2;
        let here = eval(mid);

        if mid < upper && eval(mid + 1) < here {
            left = mid + 1;
        } else if mid > 0 && eval(mid - 1) < here {
            right = mid - 1;
        } else {
            break;
        }
    }

    seen.into_iter()
        .min_by(|a, b| a.1.cmp(&b.1))
        .unwrap_or((0, Eta::Never))
}

/// Finds the fastest way to meet each unlock threshold.
#[derive(Debug, Clone, Copy)]
pub struct GoalOptimizer<'a> {
    costs: ActionCostEstimator<'a>,
    strategy: SearchStrategy,
    max_twins: u64,
}

impl<'a> GoalOptimizer<'a> {
    pub fn new(snapshot: &'a GameSnapshot, solver: &'a CubicSolver, config: &CalculatorConfig) -> Self {
        GoalOptimizer {
            costs: ActionCostEstimator::new(ProductionTimeEstimator::new(snapshot, solver)),
            strategy: config.strategy,
            max_twins: config.max_twins,
        }
    }

    fn snapshot(&self) -> &'a GameSnapshot {
        self.costs.production().snapshot()
    }

    /// Best plan for a single threshold.
    ///
    /// - Units with a buy action search the twin count (none without a twin
    ///   action).
    /// - Units that are only produced wait on production alone.
    /// - Anything else can only be met if it already is.
    pub fn optimize(&self, threshold: &Cost) -> Goal {
        let unit = self.snapshot().unit(threshold.unit);

        match unit.buy_action {
            Some(buy) => self.optimize_purchase(unit, buy, unit.twin_action, &threshold.base_price),
            None if !unit.produced_by.is_empty() => Goal {
                buy_time: self
                    .costs
                    .production()
                    .time_to_reach(threshold.unit, &threshold.base_price),
                twin_time: Eta::zero(),
                ..Goal::unreachable(&unit.name)
            },
            None if unit.quantity >= threshold.base_price => Goal {
                buy_time: Eta::zero(),
                twin_time: Eta::zero(),
                ..Goal::unreachable(&unit.name)
            },
            None => Goal::unreachable(&unit.name),
        }
    }

    fn optimize_purchase(
        &self,
        unit: &Unit,
        buy: ActionId,
        twin: Option<ActionId>,
        target: &BigDecimal,
    ) -> Goal {
        let snapshot = self.snapshot();
        let current_bought = &snapshot.action(buy).quantity;
        let current_twin = twin
            .map(|t| snapshot.action(t).quantity.clone())
            .unwrap_or_else(BigDecimal::zero);

        let upper = match twin {
            Some(_) => self
                .max_twins
                .saturating_sub(current_twin.to_u64().unwrap_or(u64::MAX)),
            None => 0,
        };

        let mut plans: BTreeMap<u64, TwinPlan> = BTreeMap::new();
        let evaluate = |n: u64| {
            let plan = self.plan(buy, twin, target, current_bought, &current_twin, n);
            debug!(
                "{}: {} twins -> buy {} in {}, twins in {}",
                unit.name, n, plan.buy_required, plan.buy_time, plan.twin_time
            );
            let eta = plan.time_to_prestige();
            plans.insert(n, plan);
            eta
        };

        let (best, eta) = match self.strategy {
            SearchStrategy::Exhaustive => exhaustive_search(upper, evaluate),
            SearchStrategy::Bracketed => bracketed_search(upper, evaluate),
        };

        let plan = match plans.remove(&best) {
            Some(plan) if !eta.is_never() => plan,
            _ => return Goal::unreachable(&unit.name),
        };

        Goal {
            name: unit.name.clone(),
            buy_total: current_bought + &plan.buy_required,
            buy_required: plan.buy_required,
            twin_total: &current_twin + &plan.twin_required,
            twin_required: plan.twin_required,
            buy_time: plan.buy_time,
            twin_time: plan.twin_time,
        }
    }

    /// Buys `twin_required` more twins, then buys whatever the multiplier
    /// still leaves missing.
    fn plan(
        &self,
        buy: ActionId,
        twin: Option<ActionId>,
        target: &BigDecimal,
        current_bought: &BigDecimal,
        current_twin: &BigDecimal,
        twin_required: u64,
    ) -> TwinPlan {
        let twin_required = BigDecimal::from(twin_required);
        let multiplier = current_twin + &twin_required + BigDecimal::one();
        let total_bought = ceil_div(target, &multiplier);
        let buy_required = (total_bought - current_bought).max(BigDecimal::zero());

        let twin_time = match twin {
            Some(twin) => self.costs.time_to_perform(twin, &twin_required),
            None => Eta::zero(),
        };
        let buy_time = self.costs.time_to_perform(buy, &buy_required);

        TwinPlan {
            twin_required,
            buy_required,
            twin_time,
            buy_time,
        }
    }

    /// Optimizes every threshold independently and combines the results.
    pub fn aggregate(&self, thresholds: &[Cost]) -> PrestigeResult {
        let goals: Vec<Goal> = thresholds.iter().map(|t| self.optimize(t)).collect();
        let time_to_prestige = goals
            .iter()
            .map(Goal::time_to_prestige)
            .max()
            .unwrap_or_else(Eta::zero);
        let bottleneck = find_bottleneck(&goals);

        info!(
            "{} goals, time to prestige {}",
            goals.len(),
            time_to_prestige
        );

        PrestigeResult {
            goals,
            time_to_prestige,
            bottleneck,
        }
    }
}

/// The single slowest requirement across all goals.
///
/// Goals are scanned in order, buy before twin, and only a strictly slower
/// requirement replaces the current one. Returns `None` when nothing has to
/// be waited for.
pub fn find_bottleneck(goals: &[Goal]) -> Option<Bottleneck> {
    let mut slowest = Eta::zero();
    let mut bottleneck = None;

    for goal in goals {
        let requirements = [
            (RequirementKind::Buy, &goal.buy_time, &goal.buy_required),
            (RequirementKind::Twin, &goal.twin_time, &goal.twin_required),
        ];
        for (kind, time, required) in requirements {
            if *time > slowest {
                slowest = time.clone();
                bottleneck = Some(Bottleneck {
                    goal: goal.name.clone(),
                    kind,
                    required: required.clone(),
                    time: time.clone(),
                });
            }
        }
    }
    bottleneck
}

/// Estimates the time to prestige for every threshold in `snapshot`.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::config::CalculatorConfig;
/// use prestimax::models::{Cost, Eta, GameSnapshot, ProductionRelation, Unit};
/// use prestimax::optimizer::calculate_prestige;
///
/// let mut snapshot = GameSnapshot::new();
/// let food = snapshot.add_unit(Unit::new("food", BigDecimal::from(0)));
/// let ant = snapshot.add_unit(Unit::new("ant", BigDecimal::from(5)));
/// snapshot
///     .unit_mut(food)
///     .produced_by
///     .push(ProductionRelation::new(ant, BigDecimal::from(2)));
/// snapshot.unlock_thresholds.push(Cost::new(food, BigDecimal::from(100)));
///
/// let result = calculate_prestige(&snapshot, &CalculatorConfig::default());
/// assert_eq!(result.time_to_prestige, Eta::Finite(BigDecimal::from(10)));
/// ```
pub fn calculate_prestige(snapshot: &GameSnapshot, config: &CalculatorConfig) -> PrestigeResult {
    let solver = CubicSolver::new(config.precision);
    GoalOptimizer::new(snapshot, &solver, config).aggregate(&snapshot.unlock_thresholds)
}
