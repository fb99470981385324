//! Parallel batch analysis using Rayon
//!
//! Requests share nothing, so a batch is a plain parallel map.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! stepcalc = { version = "0.1", features = ["parallel"] }
//! ```

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{AnalysisReport, Mode};
use crate::builder::Analyzer;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// One independent analysis request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub mode: Mode,
    pub expression: String,
    pub point: f64,
}

impl Request {
    pub fn new(mode: Mode, expression: impl Into<String>, point: f64) -> Self {
        Request {
            mode,
            expression: expression.into(),
            point,
        }
    }
}

/// Run every request in parallel; results come back in input order
///
/// # Example
/// ```ignore
/// use stepcalc::parallel::{analyze_batch, Request};
/// use stepcalc::{AnalysisConfig, Mode};
///
/// let batch = [
///     Request::new(Mode::Limit, "sin(x)/x", 0.0),
///     Request::new(Mode::Sign, "(x-1)*(x+1)", 0.0),
/// ];
/// let results = analyze_batch(&batch, &AnalysisConfig::default());
/// ```
pub fn analyze_batch(
    requests: &[Request],
    config: &AnalysisConfig,
) -> Vec<Result<AnalysisReport, AnalysisError>> {
    let analyzer = Analyzer::with_config(config.clone());
    requests
        .par_iter()
        .map(|r| analyzer.run(r.mode, &r.expression, r.point))
        .collect()
}
