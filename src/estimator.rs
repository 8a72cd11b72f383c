//! Time-to-threshold estimation over the production graph.
//!
//! A unit's quantity over elapsed time `t` is approximated by a truncated
//! expansion over its upstream producers:
//!
//! ```text
//! q(t) = q0 + c*t + b*t^2 + a*t^3
//! c = sum(rate1 * qty1)
//! b = sum(rate1 * rate2 * qty2) / 2
//! a = sum(rate1 * rate2 * rate3 * qty3) / 6
//! ```
//!
//! Each tier's own producers are treated as constant over the horizon, and
//! nothing beyond the third tier is modelled. The wait until the unit reaches
//! a target is the smallest positive root of `q(t) - target`.

use bigdecimal::{BigDecimal, One, Signed};
use log::debug;

use crate::models::{ActionId, Eta, GameSnapshot, ProductionRelation, UnitId};
use crate::solver::{Cubic, CubicSolver};

/// Number of producer tiers folded into the polynomial.
pub const MAX_TIER: usize = 3;

/// Estimates how long a unit takes to reach a quantity.
#[derive(Debug, Clone, Copy)]
pub struct ProductionTimeEstimator<'a> {
    snapshot: &'a GameSnapshot,
    solver: &'a CubicSolver,
}

impl<'a> ProductionTimeEstimator<'a> {
    pub fn new(snapshot: &'a GameSnapshot, solver: &'a CubicSolver) -> Self {
        ProductionTimeEstimator { snapshot, solver }
    }

    pub fn snapshot(&self) -> &'a GameSnapshot {
        self.snapshot
    }

    pub fn solver(&self) -> &'a CubicSolver {
        self.solver
    }

    /// Relations into `unit` that currently produce anything.
    fn contributing(&self, unit: UnitId) -> impl Iterator<Item = &'a ProductionRelation> + 'a {
        let snapshot = self.snapshot;
        snapshot
            .unit(unit)
            .produced_by
            .iter()
            .filter(move |r| r.is_active() && snapshot.unit(r.producer).unlocked)
    }

    /// Rate-weighted producer quantities for tiers 1 through [`MAX_TIER`].
    ///
    /// Walks the producer graph depth-first over unit handles. Each path
    /// contributes the product of the rates along it times the quantity of
    /// the unit at its end; cycles are cut off by the depth bound.
    pub fn tier_sums(&self, unit: UnitId) -> [BigDecimal; MAX_TIER] {
        let ctx = self.solver.context();
        let mut sums: [BigDecimal; MAX_TIER] = Default::default();
        let mut pending = vec![(unit, BigDecimal::one(), 0usize)];

        while let Some((current, rate, depth)) = pending.pop() {
            for relation in self.contributing(current) {
                let chained = ctx.multiply(&rate, &relation.prod_per_sec);
                let producer = self.snapshot.unit(relation.producer);
                sums[depth] += ctx.multiply(&chained, &producer.quantity);

                if depth + 1 < MAX_TIER {
                    pending.push((relation.producer, chained, depth + 1));
                }
            }
        }
        sums
    }

    /// Polynomial whose smallest positive root is the wait until `unit`
    /// holds `target`.
    pub fn polynomial(&self, unit: UnitId, target: &BigDecimal) -> Cubic {
        let [first, second, third] = self.tier_sums(unit);
        let quantity = &self.snapshot.unit(unit).quantity;

        let cubic = Cubic::new(
            self.solver.divide(&third, &BigDecimal::from(6)),
            second.half(),
            first,
            quantity - target,
        );
        debug!(
            "{}: {}t^3 + {}t^2 + {}t + {}",
            self.snapshot.unit(unit).id,
            cubic.a,
            cubic.b,
            cubic.c,
            cubic.d
        );
        cubic
    }

    /// Wait until `unit` holds at least `target`.
    ///
    /// Zero when the target is already met; [`Eta::Never`] when nothing
    /// upstream produces enough to ever get there.
    pub fn time_to_reach(&self, unit: UnitId, target: &BigDecimal) -> Eta {
        if self.snapshot.unit(unit).quantity >= *target {
            return Eta::zero();
        }

        let cubic = self.polynomial(unit, target);
        self.solver
            .solve(&cubic)
            .into_iter()
            .filter(|root| root.is_positive())
            .min()
            .map(Eta::Finite)
            .unwrap_or(Eta::Never)
    }
}

/// Estimates how long until an action can be afforded.
#[derive(Debug, Clone, Copy)]
pub struct ActionCostEstimator<'a> {
    production: ProductionTimeEstimator<'a>,
}

impl<'a> ActionCostEstimator<'a> {
    pub fn new(production: ProductionTimeEstimator<'a>) -> Self {
        ActionCostEstimator { production }
    }

    pub fn production(&self) -> &ProductionTimeEstimator<'a> {
        &self.production
    }

    /// Wait until `n` more instances of `action` are affordable.
    ///
    /// Resources accumulate in parallel, so the wait is set by the slowest
    /// cost rather than their sum.
    pub fn time_to_perform(&self, action: ActionId, n: &BigDecimal) -> Eta {
        let snapshot = self.production.snapshot();
        let ctx = self.production.solver().context();

        snapshot
            .action(action)
            .get_costs(n, ctx)
            .iter()
            .map(|cost| self.production.time_to_reach(cost.unit, &cost.base_price))
            .max()
            .unwrap_or_else(Eta::zero)
    }
}
