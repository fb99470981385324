use crate::plot::{analysis_marker, sample_curve, Marker, PlotWindow};
use crate::{
    compute_derivative, compute_limit, compute_sign, differentiate, parse, simplify,
    AnalysisConfig, AnalysisError, Analyzer, DerivativeResult, DifferentiationError, Expression,
    Mode, ParseError,
};

#[test]
fn test_parse_errors_become_error_steps() {
    for bad in ["", "x +", "(x + 1", "x + 1)", "foo(x)", "x*y", "sin(x, 2)", "2 $ x"] {
        let err = compute_limit(bad, 0.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)), "{bad}: {err:?}");
        let step = err.as_step();
        assert_eq!(step.label, "Error");
        assert!(step.content.contains("syntax"));
    }
}

#[test]
fn test_specific_parse_errors() {
    assert_eq!(parse(""), Err(ParseError::EmptyFormula));
    assert!(matches!(
        parse("x*y"),
        Err(ParseError::MultipleVariables { .. })
    ));
    assert!(matches!(
        parse("(x + 1"),
        Err(ParseError::UnbalancedParentheses { .. })
    ));
    assert!(matches!(
        parse("foo(x)"),
        Err(ParseError::UnknownIdentifier { .. })
    ));
}

#[test]
fn test_implicit_multiplication() {
    let explicit = Expression::parse("2*x*(x + 1)").unwrap();
    let implicit = Expression::parse("2x(x + 1)").unwrap();
    for x in [-2.0, 0.5, 3.0] {
        assert_eq!(explicit.evaluate(x), implicit.evaluate(x));
    }
}

#[test]
fn test_other_variable_names() {
    let analysis = compute_derivative("t^3", 2.0).unwrap();
    match analysis.result {
        DerivativeResult::Computed { derivative, .. } => assert_eq!(derivative, "3*t^2"),
        other => panic!("expected a derivative, got {other:?}"),
    }
    assert!(analysis.steps[0].content.contains("f(t) = t^3"));
}

#[test]
fn test_differentiate_and_simplify_are_public() {
    let f = Expression::parse("x^2 + 3*x").unwrap();
    let d = differentiate(&f).unwrap();
    assert_eq!(d.to_string(), "2*x + 3");

    let messy = parse("0 + 1*x^1").unwrap();
    assert_eq!(simplify(&messy).to_string(), "x");

    let g = Expression::parse("floor(x)").unwrap();
    assert_eq!(
        differentiate(&g),
        Err(DifferentiationError::NoRule("floor".into()))
    );
}

#[test]
fn test_json_report_shape() {
    let report = Analyzer::new().run(Mode::Sign, "(x-1)*(x+1)", 0.0).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "sign");
    assert_eq!(json["result"]["method"]["kind"], "whole");
    let entries = json["result"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[2]["sign"], "negative");
    assert_eq!(entries[2]["region"]["kind"], "interval");
    assert_eq!(entries[2]["label"], "-1 < x < 1");
}

#[test]
fn test_latex_steps() {
    let analysis = compute_limit("(x^2-4)/(x-2)", 2.0).unwrap();
    let first = analysis.steps[0].math.as_deref().unwrap();
    assert!(first.starts_with("\\lim_{x \\to 2}"));
    assert!(first.contains("\\frac"));
}

#[test]
fn test_summary_lines() {
    let a = Analyzer::new();
    let limit = a.run(Mode::Limit, "x^2", 3.0).unwrap();
    assert_eq!(limit.summary(), "limit = 9 (direct substitution)");
    let sign = a.run(Mode::Sign, "x^2 + 1", 0.0).unwrap();
    assert_eq!(sign.summary(), "x ∈ ℝ: +");
}

#[test]
fn test_plot_agrees_with_continuity() {
    let config = AnalysisConfig::default();
    let f = Expression::parse("(x^2-4)/(x-2)").unwrap();
    assert!(matches!(
        analysis_marker(&f, 2.0, &config),
        Marker::Hollow { .. }
    ));
    let curve = sample_curve(&f, &PlotWindow::around(2.0), &config);
    // x = 2 is a sample of the window and is skipped
    assert_eq!(curve.segments.len(), 2);
}

#[test]
fn test_sign_ignores_invalid_point_only_in_sign_mode() {
    assert!(compute_sign("x").is_ok());
    assert!(matches!(
        Analyzer::new().run(Mode::Limit, "x", f64::INFINITY),
        Err(AnalysisError::InvalidPoint(_))
    ));
}
