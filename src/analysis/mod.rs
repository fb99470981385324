//! The four analyses: limit, derivative, continuity and sign
//!
//! Each analysis takes a parsed [`Expression`] and returns an [`Analysis`]:
//! the ordered explanation steps plus a typed result. None of them fail once
//! the expression has been parsed; undefined points become part of the
//! result instead.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::expression::Expression;
use crate::steps::SolutionStep;

pub mod continuity;
pub mod derivative;
pub mod limit;
pub mod sign;

pub use continuity::ContinuityResult;
pub use derivative::DerivativeResult;
pub use limit::LimitResult;
pub use sign::{Region, Sign, SignEntry, SignMethod, SignTable};

/// Steps plus result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis<R> {
    pub steps: Vec<SolutionStep>,
    pub result: R,
}

/// Which analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Limit,
    Derivative,
    Continuity,
    Sign,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Limit, Mode::Derivative, Mode::Continuity, Mode::Sign];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Limit => "limit",
            Mode::Derivative => "derivative",
            Mode::Continuity => "continuity",
            Mode::Sign => "sign",
        }
    }

    /// Whether the analysis point is used
    pub fn uses_point(self) -> bool {
        !matches!(self, Mode::Sign)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.name() == lowered)
            .ok_or_else(|| {
                format!("unknown mode '{s}', expected one of: limit, derivative, continuity, sign")
            })
    }
}

/// Result of any analysis, tagged with its mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisReport {
    Limit(Analysis<LimitResult>),
    Derivative(Analysis<DerivativeResult>),
    Continuity(Analysis<ContinuityResult>),
    Sign(Analysis<SignTable>),
}

impl AnalysisReport {
    pub fn mode(&self) -> Mode {
        match self {
            AnalysisReport::Limit(_) => Mode::Limit,
            AnalysisReport::Derivative(_) => Mode::Derivative,
            AnalysisReport::Continuity(_) => Mode::Continuity,
            AnalysisReport::Sign(_) => Mode::Sign,
        }
    }

    pub fn steps(&self) -> &[SolutionStep] {
        match self {
            AnalysisReport::Limit(a) => &a.steps,
            AnalysisReport::Derivative(a) => &a.steps,
            AnalysisReport::Continuity(a) => &a.steps,
            AnalysisReport::Sign(a) => &a.steps,
        }
    }

    /// One-line verdict
    pub fn summary(&self) -> String {
        match self {
            AnalysisReport::Limit(a) => a.result.to_string(),
            AnalysisReport::Derivative(a) => a.result.to_string(),
            AnalysisReport::Continuity(a) => a.result.to_string(),
            AnalysisReport::Sign(a) => a.result.to_string(),
        }
    }
}

/// Run one analysis on an already parsed expression
pub(crate) fn run(
    mode: Mode,
    expression: &Expression,
    point: f64,
    config: &AnalysisConfig,
) -> AnalysisReport {
    match mode {
        Mode::Limit => AnalysisReport::Limit(limit::analyze(expression, point, config)),
        Mode::Derivative => {
            AnalysisReport::Derivative(derivative::analyze(expression, point, config))
        }
        Mode::Continuity => {
            AnalysisReport::Continuity(continuity::analyze(expression, point, config))
        }
        Mode::Sign => AnalysisReport::Sign(sign::analyze(expression, config)),
    }
}
