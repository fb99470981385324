//! Property-Based and Fuzz Testing
//!
//! Uses quickcheck for:
//! - Parser robustness on arbitrary text
//! - Polynomial limits by direct substitution
//! - Symbolic derivatives against central differences
//! - Repeatable analysis runs

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{
    central_difference, compute_limit, compute_sign, differentiate, parse, Expression,
    LimitResult,
};

// ============================================================
// GENERATORS
// ============================================================

/// Small coefficient in [-9, 9]
fn coefficient(g: &mut Gen) -> i32 {
    i32::from(i8::arbitrary(g)) % 10
}

/// Polynomial of degree <= 4 with small integer coefficients, as text
#[derive(Debug, Clone)]
struct Polynomial {
    coefficients: Vec<i32>,
}

impl Polynomial {
    fn text(&self) -> String {
        let terms: Vec<String> = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(power, c)| match power {
                0 => format!("({c})"),
                1 => format!("({c})*x"),
                _ => format!("({c})*x^{power}"),
            })
            .collect();
        terms.join(" + ")
    }

    fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + f64::from(c))
    }
}

impl Arbitrary for Polynomial {
    fn arbitrary(g: &mut Gen) -> Self {
        let degree = usize::arbitrary(g) % 5;
        Polynomial {
            coefficients: (0..=degree).map(|_| coefficient(g)).collect(),
        }
    }
}

/// Smooth expression text over x built from well-behaved pieces
fn smooth_expr(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 3 {
            0 => "x".to_string(),
            1 => format!("{}", coefficient(g)),
            _ => format!("({}*x)", coefficient(g)),
        };
    }
    let a = smooth_expr(g, depth - 1);
    let b = smooth_expr(g, depth - 1);
    match u8::arbitrary(g) % 7 {
        0 => format!("({a} + {b})"),
        1 => format!("({a} - {b})"),
        2 => format!("({a})*({b})"),
        3 => format!("sin({a})"),
        4 => format!("cos({a})"),
        5 => format!("exp(({a})/10)"),
        _ => format!("({a})^2"),
    }
}

/// Point in [-2, 2]
fn point(g: &mut Gen) -> f64 {
    f64::from(i8::arbitrary(g)) / 64.0
}

// ============================================================
// PARSER FUZZ TESTS
// ============================================================

#[test]
fn test_parser_never_panics_on_random_input() {
    fn prop(input: String) -> TestResult {
        let _ = parse(&input);
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(1000)
        .max_tests(2000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn test_parser_edge_cases() {
    let edge_cases = [
        "", "   ", "()", "((()))", "+++", "---x", "1+", "+1", "sin()", "sin(x,x)", "1..2",
        "1e999999", "1e-999999", "x^x^x", "((((x))))", "2e", "1/0", "0/0", "(-0)", "π", "∞",
        "log(2, x)", "e^x", ")(", "x(",
    ];
    for case in &edge_cases {
        let _ = parse(case);
        let _ = compute_limit(case, 0.0);
        let _ = compute_sign(case);
    }
}

#[test]
fn test_parser_deep_nesting() {
    let mut expr = "x".to_string();
    for _ in 0..50 {
        expr = format!("({expr}+1)");
    }
    assert!(parse(&expr).is_ok());

    let mut deep = "x".to_string();
    for _ in 0..500 {
        deep = format!("sin({deep})");
    }
    assert!(parse(&deep).is_err());
}

#[test]
fn test_display_round_trips() {
    let mut g = Gen::new(8);
    for _ in 0..200 {
        let text = smooth_expr(&mut g, 3);
        let expr = parse(&text).unwrap();
        let reparsed = parse(&expr.to_string()).unwrap();
        let (a, b) = (
            Expression::from_expr(expr),
            Expression::from_expr(reparsed),
        );
        for x in [-1.5, 0.0, 0.75, 2.0] {
            // Regrouped sums may round differently
            match (a.evaluate(x).finite(), b.evaluate(x).finite()) {
                (Some(u), Some(v)) => {
                    assert!((u - v).abs() <= 1e-9 * u.abs().max(1.0), "{text}: {u} vs {v}")
                }
                (u, v) => assert_eq!(u.is_some(), v.is_some(), "{text}"),
            }
        }
    }
}

// ============================================================
// ANALYSIS PROPERTIES
// ============================================================

#[test]
fn test_polynomial_limits_are_direct() {
    fn prop(p: Polynomial, x0: i8) -> TestResult {
        let x0 = f64::from(x0) / 16.0;
        match compute_limit(&p.text(), x0) {
            Ok(analysis) => match analysis.result {
                LimitResult::Direct { value } => {
                    TestResult::from_bool((value - p.eval(x0)).abs() < 1e-6)
                }
                _ => TestResult::failed(),
            },
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Polynomial, i8) -> TestResult);
}

#[test]
fn test_derivative_matches_central_difference() {
    let mut g = Gen::new(8);
    for _ in 0..200 {
        let text = smooth_expr(&mut g, 2);
        let f = Expression::parse(&text).unwrap();
        let d = differentiate(&f).unwrap();
        let x = point(&mut g);
        let (Some(exact), Some(estimate)) =
            (d.evaluate(x).finite(), central_difference(&f, x, 1e-5))
        else {
            continue;
        };
        let scale = exact.abs().max(1.0);
        assert!(
            (exact - estimate).abs() < 1e-2 * scale,
            "{text} at {x}: {exact} vs {estimate} (f' = {d})"
        );
    }
}

#[test]
fn test_analyses_are_idempotent() {
    fn prop(p: Polynomial) -> bool {
        let text = format!("({})/(x - 1)", p.text());
        compute_limit(&text, 1.0) == compute_limit(&text, 1.0)
            && compute_sign(&text) == compute_sign(&text)
    }
    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Polynomial) -> bool);
}
