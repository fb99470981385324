//! End-to-end behaviour of the four analyses on the reference functions

use crate::{
    compute_continuity, compute_derivative, compute_limit, compute_sign, ContinuityResult,
    DerivativeResult, Evaluation, LimitResult, Sign, SignMethod,
};

// ============================================================
// Limits
// ============================================================

#[test]
fn test_polynomial_limit_is_direct() {
    let analysis = compute_limit("x^3 - 2*x + 1", 2.0).unwrap();
    assert_eq!(analysis.result, LimitResult::Direct { value: 5.0 });
}

#[test]
fn test_removable_hole_limit() {
    let analysis = compute_limit("(x^2-4)/(x-2)", 2.0).unwrap();
    match analysis.result {
        LimitResult::TwoSidedAgreement { value, left, right } => {
            assert!((value - 4.0).abs() < 1e-3);
            assert!((left - right).abs() < 1e-3);
        }
        other => panic!("expected agreement, got {other:?}"),
    }
    let text: Vec<&str> = analysis.steps.iter().map(|s| s.content.as_str()).collect();
    assert!(text.iter().any(|t| t.contains("indeterminate form 0/0")));
}

#[test]
fn test_pole_limit_diverges_in_opposite_directions() {
    match compute_limit("1/x", 0.0).unwrap().result {
        LimitResult::NoLimit {
            left: Some(l),
            right: Some(r),
        } => assert!(l < 0.0 && r > 0.0),
        other => panic!("expected no limit, got {other:?}"),
    }
}

#[test]
fn test_default_form_input() {
    // The calculator's preset: a zero of the numerator, not a hole
    let analysis = compute_limit("(x^2 - 8*x + 15)/(x^2 - 5)", 3.0).unwrap();
    assert_eq!(analysis.result, LimitResult::Direct { value: 0.0 });
}

// ============================================================
// Derivatives
// ============================================================

#[test]
fn test_square_derivative_at_three() {
    match compute_derivative("x^2", 3.0).unwrap().result {
        DerivativeResult::Computed {
            derivative, value, ..
        } => {
            assert_eq!(derivative, "2*x");
            assert_eq!(value, Evaluation::Finite(6.0));
        }
        other => panic!("expected a derivative, got {other:?}"),
    }
}

#[test]
fn test_chain_rule_value() {
    match compute_derivative("sin(x^2)", 1.0).unwrap().result {
        DerivativeResult::Computed {
            value,
            numeric_estimate,
            ..
        } => {
            let exact = value.finite().unwrap();
            assert!((exact - 2.0 * 1.0f64.cos()).abs() < 1e-12);
            assert!((numeric_estimate.unwrap() - exact).abs() < 1e-6);
        }
        other => panic!("expected a derivative, got {other:?}"),
    }
}

#[test]
fn test_quotient_rule_matches_numeric_estimate() {
    let analysis = compute_derivative("(x^2 - 8*x + 15)/(x^2 - 5)", 3.0).unwrap();
    match analysis.result {
        DerivativeResult::Computed {
            value,
            numeric_estimate,
            ..
        } => {
            // f'(3) = (2*3 - 8)(9 - 5) - 0 over 16 = -0.5
            assert!((value.finite().unwrap() + 0.5).abs() < 1e-9);
            assert!((numeric_estimate.unwrap() + 0.5).abs() < 1e-6);
        }
        other => panic!("expected a derivative, got {other:?}"),
    }
}

// ============================================================
// Continuity
// ============================================================

#[test]
fn test_hole_is_removable_discontinuity() {
    assert!(matches!(
        compute_continuity("(x^2-4)/(x-2)", 2.0).unwrap().result,
        ContinuityResult::RemovableDiscontinuity { value: None, .. }
    ));
}

#[test]
fn test_pole_is_jump_discontinuity() {
    assert!(matches!(
        compute_continuity("1/x", 0.0).unwrap().result,
        ContinuityResult::JumpDiscontinuity { .. }
    ));
}

#[test]
fn test_continuous_point() {
    let result = compute_continuity("sqrt(x + 1)", 3.0).unwrap().result;
    assert_eq!(result, ContinuityResult::Continuous { value: 2.0 });
}

// ============================================================
// Sign tables
// ============================================================

#[test]
fn test_sign_of_product() {
    let table = compute_sign("(x-1)*(x+1)").unwrap().result;
    assert_eq!(table.sign_at(0.0), Some(Sign::Negative));
    assert_eq!(table.sign_at(-0.5), Some(Sign::Negative));
    assert_eq!(table.sign_at(-3.0), Some(Sign::Positive));
    assert_eq!(table.sign_at(3.0), Some(Sign::Positive));
    assert_eq!(table.zeros(), vec![-1.0, 1.0]);
}

#[test]
fn test_sign_of_default_quotient() {
    let analysis = compute_sign("(x^2 - 8*x + 15)/(x^2 - 5)").unwrap();
    assert!(matches!(analysis.result.method, SignMethod::Rational { .. }));
    let labels: Vec<&str> = analysis
        .steps
        .iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Step 1: Identify the function",
            "Step 2: Split numerator and denominator",
            "Step 3: Sign of the numerator N(x)",
            "Step 4: Sign of the denominator D(x)",
            "Step 5: Sign of f(x) = N(x) / D(x)",
        ]
    );
    assert_eq!(analysis.result.entries.len(), 9);
}

#[test]
fn test_pole_on_grid_splits_whole_table() {
    let table = compute_sign("x^(-1)").unwrap().result;
    assert_eq!(table.method, SignMethod::Whole);
    assert_eq!(table.sign_at(0.0), Some(Sign::Undefined));
    assert_eq!(table.sign_at(-4.0), Some(Sign::Negative));
    assert_eq!(table.sign_at(4.0), Some(Sign::Positive));
    assert!(table.zeros().is_empty());
}

#[test]
fn test_even_root_is_missed_by_crossing_scan() {
    // (x - 0.25)^2 touches zero between grid samples without changing sign
    let table = compute_sign("(x - 0.25)^2").unwrap().result;
    assert!(table.zeros().is_empty());
    assert_eq!(table.entries.len(), 1);
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn test_runs_are_repeatable() {
    for text in ["(x^2-4)/(x-2)", "1/x", "sqrt(x)", "sin(x)/x"] {
        assert_eq!(compute_limit(text, 0.0), compute_limit(text, 0.0));
        assert_eq!(compute_derivative(text, 1.0), compute_derivative(text, 1.0));
        assert_eq!(compute_continuity(text, 2.0), compute_continuity(text, 2.0));
        assert_eq!(compute_sign(text), compute_sign(text));
    }
}
