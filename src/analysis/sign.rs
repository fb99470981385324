//! Sign analysis: where a function is positive, negative, zero or undefined
//!
//! Quotients written as `(N)/(D)` are split and each side is scanned on its
//! own; other formulas are scanned whole. Zeros are found by sampling a fixed
//! grid and watching for sign changes, so roots of even multiplicity that only
//! touch zero between samples are missed, and a pole can look like a crossing.
//! The sampled critical points cut the line into intervals whose sign is read
//! at their midpoints.

use std::fmt;
use std::sync::OnceLock;

use num_traits::Float;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use super::Analysis;
use crate::config::AnalysisConfig;
use crate::evaluator::eval_at;
use crate::expression::{Evaluation, Expression};
use crate::parser::parse_with_limits;
use crate::steps::StepTrail;
use crate::traits::format_number;
use crate::ast::Expr;

/// Qualitative sign of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
    Zero,
    Undefined,
}

impl Sign {
    /// `Zero` inside `(-epsilon, epsilon)`, `Undefined` when not finite
    pub fn classify<T: Float>(value: T, epsilon: T) -> Sign {
        if !value.is_finite() {
            Sign::Undefined
        } else if value.abs() < epsilon {
            Sign::Zero
        } else if value > T::zero() {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    pub fn of(outcome: &Evaluation, epsilon: f64) -> Sign {
        match outcome {
            Evaluation::Finite(v) => Sign::classify(*v, epsilon),
            Evaluation::NonFinite(_) | Evaluation::Undefined(_) => Sign::Undefined,
        }
    }

    /// Sign of `N / D` from the signs of `N` and `D`
    pub fn quotient(numerator: Sign, denominator: Sign) -> Sign {
        match (numerator, denominator) {
            (_, Sign::Zero | Sign::Undefined) | (Sign::Undefined, _) => Sign::Undefined,
            (Sign::Zero, _) => Sign::Zero,
            (n, d) if n == d => Sign::Positive,
            _ => Sign::Negative,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Sign::Positive => "+",
            Sign::Negative => "-",
            Sign::Zero => "0",
            Sign::Undefined => "∄",
        }
    }

    fn word(self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
            Sign::Zero => "zero",
            Sign::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Part of the real line covered by one entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Open interval; `None` bounds are infinite
    Interval {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// A single point; `approximate` when located from a sign change
    Point { x: f64, approximate: bool },
}

impl Region {
    pub fn contains(&self, x: f64) -> bool {
        match *self {
            Region::Interval { lower, upper } => {
                lower.map_or(true, |lo| x > lo) && upper.map_or(true, |hi| x < hi)
            }
            Region::Point { x: p, .. } => x == p,
        }
    }

    /// Human-readable bounds such as `x < 2`, `2 < x < 3` or `x ≈ 2.25`
    pub fn label(&self, var: &str) -> String {
        match *self {
            Region::Interval {
                lower: None,
                upper: None,
            } => format!("{var} ∈ ℝ"),
            Region::Interval {
                lower: None,
                upper: Some(hi),
            } => format!("{var} < {}", format_number(hi)),
            Region::Interval {
                lower: Some(lo),
                upper: None,
            } => format!("{var} > {}", format_number(lo)),
            Region::Interval {
                lower: Some(lo),
                upper: Some(hi),
            } => format!("{} < {var} < {}", format_number(lo), format_number(hi)),
            Region::Point { x, approximate } => {
                let rel = if approximate { "≈" } else { "=" };
                format!("{var} {rel} {}", format_number(x))
            }
        }
    }
}

/// One row of a sign table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignEntry {
    pub region: Region,
    pub sign: Sign,
    pub label: String,
}

/// How the table was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignMethod {
    /// Numerator and denominator scanned separately
    Rational {
        numerator: String,
        denominator: String,
    },
    /// The whole formula scanned as one
    Whole,
    /// A quotient that could not be split: fixed test points only
    Sampled,
}

/// Ordered sign table, ascending in the variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignTable {
    pub method: SignMethod,
    pub entries: Vec<SignEntry>,
}

impl SignTable {
    /// Sign of the entry covering `x`, if any
    pub fn sign_at(&self, x: f64) -> Option<Sign> {
        self.entries
            .iter()
            .find(|e| e.region.contains(x))
            .map(|e| e.sign)
    }

    /// Points where the function is zero
    pub fn zeros(&self) -> Vec<f64> {
        self.points_with(Sign::Zero)
    }

    /// Points where the function is undefined
    pub fn undefined_points(&self) -> Vec<f64> {
        self.points_with(Sign::Undefined)
    }

    fn points_with(&self, sign: Sign) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|e| e.sign == sign)
            .filter_map(|e| match e.region {
                Region::Point { x, .. } => Some(x),
                Region::Interval { .. } => None,
            })
            .collect()
    }

    /// Compact one-line rendering: `x < -1: + | x = -1: 0 | ...`
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.label, e.sign))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for SignTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ===== Quotient detection =====

static QUOTIENT: OnceLock<Option<Regex>> = OnceLock::new();

/// `(N)/(D)` with no nested parentheses on either side
fn quotient_pattern() -> Option<&'static Regex> {
    QUOTIENT
        .get_or_init(|| Regex::new(r"^\s*\(([^()]+)\)\s*/\s*\(([^()]+)\)\s*$").ok())
        .as_ref()
}

/// Split formula text into numerator and denominator text
pub(crate) fn split_quotient(text: &str) -> Option<(&str, &str)> {
    let caps = quotient_pattern()?.captures(text)?;
    let numerator = caps.get(1)?.as_str().trim();
    let denominator = caps.get(2)?.as_str().trim();
    Some((numerator, denominator))
}

// ===== Grid scan =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PointKind {
    Zero,
    /// No finite value
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CriticalPoint {
    x: f64,
    kind: PointKind,
    /// Located as the midpoint of a sign change rather than sampled directly
    approximate: bool,
}

impl CriticalPoint {
    /// Undefined beats zero, then sampled beats approximate
    fn outranks(&self, other: &CriticalPoint) -> bool {
        (self.kind, !self.approximate) > (other.kind, !other.approximate)
    }

    fn region(&self) -> Region {
        Region::Point {
            x: self.x,
            approximate: self.approximate,
        }
    }

    fn sign(&self) -> Sign {
        match self.kind {
            PointKind::Zero => Sign::Zero,
            PointKind::Undefined => Sign::Undefined,
        }
    }
}

/// A formula evaluated with the outer expression's variable
struct Component<'a> {
    expr: &'a Expr,
    var: &'a str,
}

impl Component<'_> {
    fn evaluate(&self, x: f64) -> Evaluation {
        Evaluation::from_result(eval_at(self.expr, self.var, x))
    }
}

/// Sample the grid, reporting zeros and undefined samples in ascending order
fn scan(component: &Component<'_>, config: &AnalysisConfig) -> Vec<CriticalPoint> {
    let eps = config.epsilon;
    let samples: Vec<(f64, Evaluation)> = (0..config.grid_len())
        .map(|i| {
            let x = config.grid_point(i);
            (x, component.evaluate(x))
        })
        .collect();

    let mut points = Vec::new();
    for (x, outcome) in &samples {
        match outcome.finite() {
            Some(v) if v.abs() < eps => points.push(CriticalPoint {
                x: *x,
                kind: PointKind::Zero,
                approximate: false,
            }),
            Some(_) => {}
            None => points.push(CriticalPoint {
                x: *x,
                kind: PointKind::Undefined,
                approximate: false,
            }),
        }
    }

    for pair in samples.windows(2) {
        let (x1, a) = &pair[0];
        let (x2, b) = &pair[1];
        if let (Some(v1), Some(v2)) = (a.finite(), b.finite()) {
            // Near-zero samples are already recorded as exact zeros
            if v1.abs() >= eps && v2.abs() >= eps && v1 * v2 < 0.0 {
                let mid = (x1 + x2) / 2.0;
                debug!(x1 = *x1, x2 = *x2, mid, "sign change");
                points.push(CriticalPoint {
                    x: mid,
                    kind: PointKind::Zero,
                    approximate: true,
                });
            }
        }
    }

    merge_points(points, eps)
}

/// Sort and deduplicate within epsilon; undefined wins over zero, exact over approximate
fn merge_points(mut points: Vec<CriticalPoint>, eps: f64) -> Vec<CriticalPoint> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    let mut merged: Vec<CriticalPoint> = Vec::with_capacity(points.len());
    for p in points {
        match merged.last_mut() {
            Some(last) if (p.x - last.x).abs() < eps => {
                if p.outranks(last) {
                    *last = p;
                }
            }
            _ => merged.push(p),
        }
    }
    merged
}

/// Interval probe: the midpoint, with unbounded ends clamped to the grid
fn probe_point(lower: Option<f64>, upper: Option<f64>, config: &AnalysisConfig) -> f64 {
    match (lower, upper) {
        (Some(lo), Some(hi)) => (lo + hi) / 2.0,
        (None, Some(hi)) => (config.grid_min.min(hi - config.grid_step) + hi) / 2.0,
        (Some(lo), None) => (lo + config.grid_max.max(lo + config.grid_step)) / 2.0,
        (None, None) => (config.grid_min + config.grid_max) / 2.0,
    }
}

/// Append an entry, folding `I, P, I` runs that all share one sign
fn push_entry(entries: &mut Vec<(Region, Sign)>, region: Region, sign: Sign) {
    if let Region::Interval { upper, .. } = region {
        let n = entries.len();
        if n >= 2 {
            let (prev_region, prev_sign) = entries[n - 2];
            let (point_region, point_sign) = entries[n - 1];
            if let (Region::Interval { lower, .. }, Region::Point { .. }) = (prev_region, point_region)
            {
                if prev_sign == sign && point_sign == sign {
                    entries.truncate(n - 2);
                    entries.push((Region::Interval { lower, upper }, sign));
                    return;
                }
            }
        }
    }
    entries.push((region, sign));
}

/// Build the alternating interval/point table from critical points
fn build_entries(
    points: &[CriticalPoint],
    config: &AnalysisConfig,
    sign_at: impl Fn(f64) -> Sign,
) -> Vec<(Region, Sign)> {
    let mut entries = Vec::with_capacity(points.len() * 2 + 1);
    let mut lower = None;

    for p in points {
        let upper = Some(p.x);
        let mid = probe_point(lower, upper, config);
        push_entry(&mut entries, Region::Interval { lower, upper }, sign_at(mid));

        push_entry(&mut entries, p.region(), p.sign());
        lower = Some(p.x);
    }

    let mid = probe_point(lower, None, config);
    push_entry(
        &mut entries,
        Region::Interval { lower, upper: None },
        sign_at(mid),
    );
    entries
}

fn labeled(entries: Vec<(Region, Sign)>, var: &str) -> Vec<SignEntry> {
    entries
        .into_iter()
        .map(|(region, sign)| SignEntry {
            label: region.label(var),
            region,
            sign,
        })
        .collect()
}

fn describe_points(points: &[CriticalPoint], var: &str, name: &str) -> String {
    let zeros: Vec<String> = points
        .iter()
        .filter(|p| p.kind == PointKind::Zero)
        .map(|p| p.region().label(var))
        .collect();
    let undefined: Vec<String> = points
        .iter()
        .filter(|p| p.kind == PointKind::Undefined)
        .map(|p| format_number(p.x))
        .collect();

    let mut text = if zeros.is_empty() {
        format!("{name} has no sign change on the sampled range.")
    } else {
        format!("{name} is zero at: {}.", zeros.join(", "))
    };
    if !undefined.is_empty() {
        text.push_str(&format!(" {name} is undefined at: {}.", undefined.join(", ")));
    }
    text
}

// ===== Analysis =====

pub(crate) fn analyze(expression: &Expression, config: &AnalysisConfig) -> Analysis<SignTable> {
    let var = expression.variable();
    let mut trail = StepTrail::new();

    trail.push_math(
        "Identify the function",
        format!("f({var}) = {expression}"),
        format!("f({var}) = {}", expression.to_latex()),
    );

    let split = split_quotient(expression.source()).and_then(|(n, d)| {
        let limits = config.parse_limits();
        match (parse_with_limits(n, limits), parse_with_limits(d, limits)) {
            (Ok(num), Ok(den)) => Some((num, den)),
            _ => {
                debug!(numerator = n, denominator = d, "quotient sides did not parse");
                None
            }
        }
    });

    let table = match split {
        Some((num, den)) => rational_table(&num, &den, var, config, &mut trail),
        None if expression.source().contains('/') => sampled_table(expression, config, &mut trail),
        None => whole_table(expression, config, &mut trail),
    };

    info!(
        expression = %expression,
        method = ?table.method,
        entries = table.entries.len(),
        "sign analysis done"
    );

    Analysis {
        steps: trail.into_steps(),
        result: table,
    }
}

fn rational_table(
    num: &Expr,
    den: &Expr,
    var: &str,
    config: &AnalysisConfig,
    trail: &mut StepTrail,
) -> SignTable {
    let eps = config.epsilon;
    trail.push_math(
        "Split numerator and denominator",
        format!("N({var}) = {num}\nD({var}) = {den}\nf({var}) = N({var}) / D({var})"),
        format!(
            "f({var}) = \\frac{{N({var})}}{{D({var})}} = \\frac{{{}}}{{{}}}",
            num.to_latex(),
            den.to_latex()
        ),
    );

    let n = Component { expr: num, var };
    let d = Component { expr: den, var };

    let n_points = scan(&n, config);
    trail.push(
        &format!("Sign of the numerator N({var})"),
        describe_points(&n_points, var, &format!("N({var})")),
    );

    let d_points = scan(&d, config);
    trail.push(
        &format!("Sign of the denominator D({var})"),
        describe_points(&d_points, var, &format!("D({var})")),
    );

    // A zero of D makes f undefined there
    let mut critical = n_points;
    critical.extend(d_points.into_iter().map(|p| CriticalPoint {
        kind: PointKind::Undefined,
        ..p
    }));
    let critical = merge_points(critical, eps);

    let entries = build_entries(&critical, config, |x| {
        Sign::quotient(Sign::of(&n.evaluate(x), eps), Sign::of(&d.evaluate(x), eps))
    });
    let entries = labeled(entries, var);

    let table = SignTable {
        method: SignMethod::Rational {
            numerator: num.to_string(),
            denominator: den.to_string(),
        },
        entries,
    };
    trail.push_math(
        &format!("Sign of f({var}) = N({var}) / D({var})"),
        format!(
            "Sign rule: (+)/(+) = +, (-)/(-) = +, (+)/(-) = -, (-)/(+) = -; f is ∄ where D = 0.\n{}",
            table.render()
        ),
        "\\frac{(+)}{(+)} = + \\quad \\frac{(-)}{(-)} = + \\quad \\frac{(+)}{(-)} = - \\quad \\frac{(-)}{(+)} = -",
    );
    table
}

fn whole_table(expression: &Expression, config: &AnalysisConfig, trail: &mut StepTrail) -> SignTable {
    let var = expression.variable();
    let eps = config.epsilon;
    let f = Component {
        expr: expression.expr(),
        var,
    };

    let points = scan(&f, config);
    trail.push(
        "Find zeros",
        format!(
            "Sampling f on [{}, {}] with step {}. {}",
            format_number(config.grid_min),
            format_number(config.grid_max),
            config.grid_step,
            describe_points(&points, var, &format!("f({var})"))
        ),
    );

    let entries = build_entries(&points, config, |x| Sign::of(&f.evaluate(x), eps));
    let table = SignTable {
        method: SignMethod::Whole,
        entries: labeled(entries, var),
    };
    trail.push("Sign table", table.render());
    table
}

fn sampled_table(
    expression: &Expression,
    config: &AnalysisConfig,
    trail: &mut StepTrail,
) -> SignTable {
    let var = expression.variable();
    trail.push(
        "Analyze signs",
        "Quotient detected, but it is not of the form (N)/(D) with simple sides. \
         Checking the sign at fixed test points.",
    );

    let entries: Vec<SignEntry> = config
        .fallback_points
        .iter()
        .map(|&x| {
            let region = Region::Point {
                x,
                approximate: false,
            };
            let sign = Sign::of(&expression.evaluate(x), config.epsilon);
            SignEntry {
                label: region.label(var),
                region,
                sign,
            }
        })
        .collect();

    let detail = entries
        .iter()
        .map(|e| format!("{}: {} ({})", e.label, e.sign, e.sign.word()))
        .collect::<Vec<_>>()
        .join(" | ");
    trail.push("Sign table", detail);

    SignTable {
        method: SignMethod::Sampled,
        entries,
    }
}
