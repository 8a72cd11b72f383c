//! Tests for the polynomial root solver.

use bigdecimal::BigDecimal;
use prestimax::solver::{Cubic, CubicSolver, DEFAULT_PRECISION};
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn assert_close(actual: &BigDecimal, expected: &BigDecimal, tolerance: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff < dec(tolerance),
        "expected {} within {}, got {}",
        expected,
        tolerance,
        actual
    );
}

fn assert_roots(roots: &[BigDecimal], expected: &[&str]) {
    assert_eq!(roots.len(), expected.len(), "roots: {:?}", roots);
    for (root, want) in roots.iter().zip(expected) {
        assert_close(root, &dec(want), "1e-30");
    }
}

#[test]
fn test_solver_precision() {
    assert_eq!(CubicSolver::default().precision(), DEFAULT_PRECISION);
    assert_eq!(CubicSolver::new(50).precision(), 50);
    // Zero digits is raised to one
    assert_eq!(CubicSolver::new(0).precision(), 1);
}

#[test]
fn test_linear_root() {
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("0"), &dec("0"), &dec("10"), &dec("-100"));
    assert_eq!(roots, vec![dec("10")]);
}

#[test]
fn test_linear_without_slope_has_no_root() {
    let solver = CubicSolver::default();
    assert!(solver
        .solve_cubic(&dec("0"), &dec("0"), &dec("0"), &dec("-100"))
        .is_empty());
    assert!(solver.solve_linear(&dec("0"), &dec("5")).is_empty());
}

#[test]
fn test_quadratic_two_roots() {
    // (x - 1)(x - 2)
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("0"), &dec("1"), &dec("-3"), &dec("2"));
    assert_roots(&roots, &["1", "2"]);
}

#[test]
fn test_quadratic_roots_are_sorted() {
    // (x + 3)(x - 0.5) = x^2 + 2.5x - 1.5
    let solver = CubicSolver::default();
    let roots = solver.solve_quadratic(&dec("1"), &dec("2.5"), &dec("-1.5"));
    assert_roots(&roots, &["-3", "0.5"]);
}

#[test]
fn test_quadratic_double_root_reported_once() {
    // (x - 1)^2
    let solver = CubicSolver::default();
    let roots = solver.solve_quadratic(&dec("1"), &dec("-2"), &dec("1"));
    assert_roots(&roots, &["1"]);
}

#[test]
fn test_quadratic_without_real_roots() {
    // x^2 + 1
    let solver = CubicSolver::default();
    assert!(solver
        .solve_quadratic(&dec("1"), &dec("0"), &dec("1"))
        .is_empty());
}

#[test]
fn test_cubic_three_real_roots() {
    // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("1"), &dec("-6"), &dec("11"), &dec("-6"));
    assert_roots(&roots, &["1", "2", "3"]);
}

#[test]
fn test_cubic_three_real_roots_scaled() {
    // 2(x + 1)(x - 0.5)(x - 4) = 2x^3 - 7x^2 - 5x + 4
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("2"), &dec("-7"), &dec("-5"), &dec("4"));
    assert_roots(&roots, &["-1", "0.5", "4"]);
}

#[test]
fn test_cubic_negative_leading_coefficient() {
    // -2(x + 1)(x - 0.5)(x - 4)
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("-2"), &dec("7"), &dec("5"), &dec("-4"));
    assert_roots(&roots, &["-1", "0.5", "4"]);
}

#[test]
fn test_cubic_one_real_root() {
    // (x - 2)(x^2 + 1) = x^3 - 2x^2 + x - 2
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("1"), &dec("-2"), &dec("1"), &dec("-2"));
    assert_roots(&roots, &["2"]);
}

#[test]
fn test_cubic_one_real_root_negative() {
    // (x + 5)(x^2 + x + 1) = x^3 + 6x^2 + 6x + 5
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("1"), &dec("6"), &dec("6"), &dec("5"));
    assert_roots(&roots, &["-5"]);
}

#[test]
fn test_cubic_double_root() {
    // (x - 1)^2 (x - 2) = x^3 - 4x^2 + 5x - 2
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("1"), &dec("-4"), &dec("5"), &dec("-2"));
    assert_eq!(roots, vec![dec("1"), dec("1"), dec("2")]);
}

#[test]
fn test_cubic_triple_root() {
    // (x - 1)^3
    let solver = CubicSolver::default();
    let roots = solver.solve_cubic(&dec("1"), &dec("-3"), &dec("3"), &dec("-1"));
    assert_eq!(roots, vec![dec("1"), dec("1"), dec("1")]);
}

#[test]
fn test_cubic_pure_growth() {
    // t^3 / 6 = 36 at t = 6
    let solver = CubicSolver::default();
    let cubic = Cubic::new(
        dec("1") / dec("6"),
        dec("0"),
        dec("0"),
        dec("-36"),
    );
    let roots = solver.solve(&cubic);
    assert_roots(&roots, &["6"]);
}

#[test]
fn test_cubic_with_huge_coefficients() {
    let solver = CubicSolver::default();
    let cubic = Cubic::new(dec("2e6"), dec("4e20"), dec("1e26"), dec("-7e30"));

    let roots = solver.solve(&cubic);
    assert_eq!(roots.len(), 3, "roots: {:?}", roots);
    assert_close(&roots[0], &dec("-199999999749999.9995999999988906249961148437"), "1e-20");
    assert_close(&roots[1], &dec("-307002.7476294687685633709182191830096871"), "1e-25");
    assert_close(&roots[2], &dec("57002.74722946876745399591433402674444"), "1e-25");
    for root in &roots {
        assert!(cubic.eval(root).abs() < dec("1e-40"), "residual at {}", root);
    }
}

#[test]
fn test_cubic_with_tiny_leading_coefficient() {
    // 1e-30 x^3 + x^2 - 4 keeps both roots near +-2 next to one near -1e30
    let solver = CubicSolver::default();
    let cubic = Cubic::new(dec("1e-30"), dec("1"), dec("0"), dec("-4"));

    let roots = solver.solve(&cubic);
    assert_eq!(roots.len(), 3, "roots: {:?}", roots);
    assert_close(&roots[0], &dec("-1e30"), "1e-20");
    assert_close(&roots[1], &dec("-2.000000000000000000000000000002"), "1e-45");
    assert_close(&roots[2], &dec("1.999999999999999999999999999998"), "1e-45");
}

#[test]
fn test_roots_are_distinct_when_seeds_are_poor() {
    let solver = CubicSolver::default();
    let cubic = Cubic::new(dec("2e6"), dec("4e20"), dec("1e26"), dec("-6e30"));

    let roots = solver.solve(&cubic);
    assert_eq!(roots.len(), 3);
    assert!(roots[0] < roots[1] && roots[1] < roots[2]);
    assert_close(&roots[2], &dec("49999.99999821428571446793002913002208901"), "1e-25");
}

#[test]
fn test_divide_is_exact_when_terminating() {
    let solver = CubicSolver::default();
    assert_eq!(solver.divide(&dec("3"), &dec("3")), dec("1"));
    assert_eq!(solver.divide(&dec("1.2e7"), &dec("6")), dec("2e6"));
    assert_eq!(solver.divide(&dec("-7"), &dec("0.5")), dec("-14"));
    assert_eq!(solver.divide(&dec("0"), &dec("9")), dec("0"));
}

#[test]
fn test_divide_rounds_to_precision() {
    let solver = CubicSolver::new(10);
    assert_eq!(solver.divide(&dec("1"), &dec("3")), dec("0.3333333333"));
    assert_eq!(solver.divide(&dec("2"), &dec("3")), dec("0.6666666667"));
    assert_eq!(solver.divide(&dec("-2"), &dec("3")), dec("-0.6666666667"));
}

#[test]
fn test_roots_satisfy_polynomial() {
    let solver = CubicSolver::default();
    let cubic = Cubic::new(dec("3"), dec("-1.5"), dec("-20"), dec("7"));

    let roots = solver.solve(&cubic);
    assert_eq!(roots.len(), 3);
    for root in &roots {
        assert_close(&cubic.eval(root), &dec("0"), "1e-50");
    }
}

#[test]
fn test_cubic_eval() {
    let cubic = Cubic::new(dec("1"), dec("-6"), dec("11"), dec("-6"));
    assert_eq!(cubic.eval(&dec("4")), dec("6"));
    assert_eq!(cubic.eval(&dec("2")), dec("0"));
}
