//! Real-root finding for polynomials of degree three or less.
//!
//! All arithmetic runs on [`BigDecimal`] at a configurable number of
//! significant digits. Game quantities span hundreds of orders of magnitude,
//! so the coefficients of a single equation routinely differ by more than
//! `f64` can represent.
//!
//! The cubic branch is classified with the exact discriminant of the raw
//! coefficients (products of the inputs are exact in `BigDecimal`). Repeated
//! roots come from closed forms. Otherwise each real root is isolated in a
//! sign-changing bracket and found by Newton steps that fall back to
//! bisection, with the Cardano and trigonometric forms as starting points.

use std::f64::consts::PI;
use std::num::NonZeroU64;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Context, RoundingMode, Signed, ToPrimitive, Zero};

/// Significant digits used when no precision is configured.
pub const DEFAULT_PRECISION: u64 = 100;

const NEWTON_MAX_STEPS: usize = 64;

/// Iterations allowed per bracketed root. Bisection alone needs a few
/// thousand to cross the whole range of a bound near `1e300`.
const BRACKET_MAX_STEPS: usize = 4000;

/// Digits of working precision not trusted when testing convergence.
const GUARD_DIGITS: u64 = 10;

/// Coefficients of `a*x^3 + b*x^2 + c*x + d`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubic {
    pub a: BigDecimal,
    pub b: BigDecimal,
    pub c: BigDecimal,
    pub d: BigDecimal,
}

impl Cubic {
    pub fn new(a: BigDecimal, b: BigDecimal, c: BigDecimal, d: BigDecimal) -> Self {
        Cubic { a, b, c, d }
    }

    /// Evaluates the polynomial at `x` (Horner form, exact).
    pub fn eval(&self, x: &BigDecimal) -> BigDecimal {
        ((&self.a * x + &self.b) * x + &self.c) * x + &self.d
    }

    /// Evaluates the derivative `3a*x^2 + 2b*x + c` at `x`.
    pub fn slope(&self, x: &BigDecimal) -> BigDecimal {
        (BigDecimal::from(3) * &self.a * x + self.b.double()) * x + &self.c
    }
}

/// Arbitrary-precision solver for linear, quadratic and cubic equations.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::solver::CubicSolver;
///
/// let solver = CubicSolver::default();
/// let roots = solver.solve_cubic(
///     &BigDecimal::from(0),
///     &BigDecimal::from(0),
///     &BigDecimal::from(10),
///     &BigDecimal::from(-100),
/// );
/// assert_eq!(roots, vec![BigDecimal::from(10)]);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSolver {
    ctx: Context,
    tolerance: BigDecimal,
}

impl Default for CubicSolver {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl CubicSolver {
    /// Creates a solver working with `precision` significant digits.
    ///
    /// A precision of zero is raised to one digit.
    pub fn new(precision: u64) -> Self {
        let digits = NonZeroU64::new(precision).unwrap_or(NonZeroU64::MIN);
        let ctx = Context::new(digits, RoundingMode::HalfEven);
        let trusted = digits.get().saturating_sub(GUARD_DIGITS).max(1);
        let tolerance = BigDecimal::new(BigInt::from(1), trusted as i64);

        CubicSolver { ctx, tolerance }
    }

    /// The arithmetic context carrying precision and rounding mode.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn precision(&self) -> u64 {
        self.ctx.precision().get()
    }

    /// Real roots of `cubic`, sorted ascending.
    pub fn solve(&self, cubic: &Cubic) -> Vec<BigDecimal> {
        self.solve_cubic(&cubic.a, &cubic.b, &cubic.c, &cubic.d)
    }

    /// Real roots of `a*x^3 + b*x^2 + c*x + d = 0`, sorted ascending.
    ///
    /// Degenerate leading coefficients fall through to the quadratic and
    /// linear cases. Complex roots are dropped; a repeated real root appears
    /// once per multiplicity in the cubic case.
    pub fn solve_cubic(
        &self,
        a: &BigDecimal,
        b: &BigDecimal,
        c: &BigDecimal,
        d: &BigDecimal,
    ) -> Vec<BigDecimal> {
        if a.is_zero() {
            if b.is_zero() {
                return self.solve_linear(c, d);
            }
            return self.solve_quadratic(b, c, d);
        }

        let cubic = Cubic::new(a.clone(), b.clone(), c.clone(), d.clone());

        // delta0 = b^2 - 3ac, delta1 = 2b^3 - 9abc + 27a^2 d
        let delta0 = b * b - BigDecimal::from(3) * a * c;
        let delta1 = BigDecimal::from(2) * b * b * b - BigDecimal::from(9) * a * b * c
            + BigDecimal::from(27) * a * a * d;
        // Positive: one real root. Negative: three distinct real roots.
        let shape = &delta1 * &delta1 - BigDecimal::from(4) * &delta0 * &delta0 * &delta0;

        let mut roots: Vec<BigDecimal> = if shape.is_zero() {
            self.repeated_roots(&cubic, &delta0)
                .into_iter()
                .map(|root| self.polish(&cubic, root))
                .collect()
        } else if shape.is_positive() {
            let seed = self.cardano_root(&cubic, &delta0, &delta1, &shape);
            let bound = self.root_bound(&cubic);
            self.bracketed_root(&cubic, -&bound, bound, seed)
                .into_iter()
                .collect()
        } else {
            self.distinct_roots(&cubic, &delta0, &delta1)
        };
        roots.sort();
        roots
    }

    /// Real roots of `a*x^2 + b*x + c = 0`, sorted ascending.
    pub fn solve_quadratic(&self, a: &BigDecimal, b: &BigDecimal, c: &BigDecimal) -> Vec<BigDecimal> {
        if a.is_zero() {
            return self.solve_linear(b, c);
        }

        let disc = b * b - BigDecimal::from(4) * a * c;
        if disc.is_negative() {
            return Vec::new();
        }
        if disc.is_zero() {
            return vec![self.divide(&-b, &a.double())];
        }

        let Some(root) = disc.sqrt_with_context(&self.ctx) else {
            return Vec::new();
        };
        // q = -(b + sign(b) * sqrt(disc)) / 2 avoids cancelling b against the root
        let q = if b.is_negative() {
            (root - b).half()
        } else {
            -(b + root).half()
        };

        let mut roots = vec![self.divide(&q, a), self.divide(c, &q)];
        roots.sort();
        roots
    }

    /// Root of `c*x + d = 0`; none when `c` is zero.
    pub fn solve_linear(&self, c: &BigDecimal, d: &BigDecimal) -> Vec<BigDecimal> {
        if c.is_zero() {
            return Vec::new();
        }
        vec![self.divide(&-d, c)]
    }

    /// `numerator / denominator` rounded to the working precision.
    ///
    /// Terminating quotients such as `3 / 3` or `1.2e7 / 6` come back
    /// exact. `denominator` must not be zero.
    pub fn divide(&self, numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
        if numerator.is_zero() {
            return BigDecimal::zero();
        }

        let (num, num_scale) = numerator.as_bigint_and_exponent();
        let (den, den_scale) = denominator.as_bigint_and_exponent();
        // The integer quotient needs at least one digit past the precision.
        let shift = (self.precision() + denominator.digits() + 2).saturating_sub(numerator.digits());
        let shift = u32::try_from(shift).unwrap_or(u32::MAX);

        let scaled = num * BigInt::from(10).pow(shift);
        let mut digits = &scaled / &den;
        let mut scale = num_scale - den_scale + i64::from(shift);
        if !(&scaled % &den).is_zero() {
            // Sticky digit so the final rounding sees the inexact tail
            let tail = if numerator.is_negative() == denominator.is_negative() { 1 } else { -1 };
            digits = digits * BigInt::from(10) + BigInt::from(tail);
            scale += 1;
        }
        self.ctx.round_decimal(BigDecimal::new(digits, scale))
    }

    fn repeated_roots(&self, cubic: &Cubic, delta0: &BigDecimal) -> Vec<BigDecimal> {
        let Cubic { a, b, c, d } = cubic;

        if delta0.is_zero() {
            let triple = self.divide(&-b, &(BigDecimal::from(3) * a));
            return vec![triple.clone(), triple.clone(), triple];
        }

        let double = self.divide(
            &(BigDecimal::from(9) * a * d - b * c),
            &delta0.double(),
        );
        let simple = self.divide(
            &(BigDecimal::from(4) * a * b * c - BigDecimal::from(9) * a * a * d - b * b * b),
            &(a * delta0),
        );
        vec![simple, double.clone(), double]
    }

    /// Three distinct real roots, one on each monotonic stretch of the
    /// polynomial. The critical points split `(-bound, bound)` into three
    /// sign-changing brackets.
    fn distinct_roots(
        &self,
        cubic: &Cubic,
        delta0: &BigDecimal,
        delta1: &BigDecimal,
    ) -> Vec<BigDecimal> {
        let critical = self.solve_quadratic(
            &(BigDecimal::from(3) * &cubic.a),
            &cubic.b.double(),
            &cubic.c,
        );
        let bound = self.root_bound(cubic);

        let mut edges = vec![-&bound];
        edges.extend(critical);
        edges.push(bound);

        let mut seeds = self.trigonometric_seeds(cubic, delta0, delta1);
        seeds.sort();

        edges
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                self.bracketed_root(cubic, pair[0].clone(), pair[1].clone(), seeds.get(i).cloned())
            })
            .collect()
    }

    /// Starting point for the single real root.
    fn cardano_root(
        &self,
        cubic: &Cubic,
        delta0: &BigDecimal,
        delta1: &BigDecimal,
        shape: &BigDecimal,
    ) -> Option<BigDecimal> {
        let root = shape.sqrt_with_context(&self.ctx)?;
        // Take the sign of delta1 so the sum cannot cancel to zero.
        let radicand = if delta1.is_negative() {
            (delta1 - root).half()
        } else {
            (delta1 + root).half()
        };
        let big_c = self.signed_cbrt(&radicand);
        if big_c.is_zero() {
            return None;
        }

        let sum = &cubic.b + &big_c + self.divide(delta0, &big_c);
        Some(self.divide(&-sum, &(BigDecimal::from(3) * &cubic.a)))
    }

    /// Approximate roots from the trigonometric form, good to `f64`
    /// accuracy at best. Used only as starting points.
    fn trigonometric_seeds(
        &self,
        cubic: &Cubic,
        delta0: &BigDecimal,
        delta1: &BigDecimal,
    ) -> Vec<BigDecimal> {
        let Some(sqrt_delta0) = delta0.sqrt_with_context(&self.ctx) else {
            return Vec::new();
        };
        let a = &cubic.a;

        // cos(3 phi) = -sign(a) * delta1 / (2 * delta0^(3/2))
        let mut cos_arg = self.divide(delta1, &(delta0 * &sqrt_delta0).double());
        if a.is_positive() {
            cos_arg = -cos_arg;
        }
        let Some(cos_arg) = cos_arg.to_f64() else {
            return Vec::new();
        };
        let phi = cos_arg.clamp(-1.0, 1.0).acos() / 3.0;

        let shift = self.divide(&cubic.b, &(BigDecimal::from(3) * a));
        let scale = self.divide(&sqrt_delta0.double(), &(BigDecimal::from(3) * a.abs()));

        (0..3)
            .filter_map(|k| {
                let cosine = (phi - 2.0 * PI * f64::from(k) / 3.0).cos();
                let cosine = BigDecimal::try_from(cosine).ok()?;
                Some(self.ctx.round_decimal(self.ctx.multiply(&scale, &cosine) - &shift))
            })
            .collect()
    }

    /// Every real root lies strictly inside `(-bound, bound)`.
    fn root_bound(&self, cubic: &Cubic) -> BigDecimal {
        let largest = [&cubic.b, &cubic.c, &cubic.d]
            .into_iter()
            .map(BigDecimal::abs)
            .max()
            .unwrap_or_default();
        self.divide(&largest, &cubic.a.abs()).double() + BigDecimal::from(2)
    }

    /// Newton iteration kept inside a sign-changing bracket.
    ///
    /// Steps that would leave the bracket are replaced by bisection, so the
    /// iterate always converges on a root between `lo` and `hi`. `None` when
    /// the polynomial has the same sign at both ends.
    fn bracketed_root(
        &self,
        cubic: &Cubic,
        mut lo: BigDecimal,
        mut hi: BigDecimal,
        seed: Option<BigDecimal>,
    ) -> Option<BigDecimal> {
        let low_value = cubic.eval(&lo);
        let high_value = cubic.eval(&hi);
        if low_value.is_zero() {
            return Some(lo);
        }
        if high_value.is_zero() {
            return Some(hi);
        }
        if low_value.is_negative() == high_value.is_negative() {
            return None;
        }
        let rising = low_value.is_negative();

        let mut x = match seed {
            Some(seed) if seed > lo && seed < hi => seed,
            _ => self.midpoint(&lo, &hi),
        };

        for _ in 0..BRACKET_MAX_STEPS {
            let value = cubic.eval(&x);
            if value.is_zero() {
                return Some(x);
            }
            if value.is_negative() == rising {
                lo = x.clone();
            } else {
                hi = x.clone();
            }

            let slope = cubic.slope(&x);
            let newton = if slope.is_zero() {
                None
            } else {
                Some(self.ctx.round_decimal(&x - self.divide(&value, &slope)))
            };
            let next = match newton {
                Some(next) if next > lo && next < hi => next,
                _ => self.midpoint(&lo, &hi),
            };
            // Bracket exhausted at the working precision
            if next <= lo || next >= hi {
                return Some(x);
            }

            let step = (&next - &x).abs();
            x = next;
            if step <= self.ctx.multiply(&self.tolerance, &x.abs()) {
                break;
            }
        }
        Some(x)
    }

    /// Newton refinement on the input polynomial.
    ///
    /// Stops as soon as a step fails to reduce the residual, so a good seed
    /// is never made worse.
    fn polish(&self, cubic: &Cubic, seed: BigDecimal) -> BigDecimal {
        let mut x = seed;
        let mut value = self.ctx.round_decimal(cubic.eval(&x));

        for _ in 0..NEWTON_MAX_STEPS {
            if value.is_zero() {
                break;
            }
            let slope = self.ctx.round_decimal(cubic.slope(&x));
            if slope.is_zero() {
                break;
            }

            let step = self.divide(&value, &slope);
            let next = self.ctx.round_decimal(&x - &step);
            let next_value = self.ctx.round_decimal(cubic.eval(&next));
            if next_value.abs() >= value.abs() {
                break;
            }

            x = next;
            value = next_value;

            let magnitude = x.abs().max(BigDecimal::from(1));
            if step.abs() <= self.ctx.multiply(&self.tolerance, &magnitude) {
                break;
            }
        }
        x
    }

    fn midpoint(&self, lo: &BigDecimal, hi: &BigDecimal) -> BigDecimal {
        self.ctx.round_decimal((lo + hi).half())
    }

    fn signed_cbrt(&self, value: &BigDecimal) -> BigDecimal {
        let root = value.abs().cbrt_with_context(&self.ctx);
        if value.is_negative() {
            -root
        } else {
            root
        }
    }
}
