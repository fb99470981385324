//! Plot data: sampled curve segments and the analysis-point marker
//!
//! Nothing here draws pixels. The marker is derived from the same continuity
//! classification the analyses report, so a plot can never contradict the
//! step trail.

use serde::Serialize;

use crate::analysis::continuity::{classify, ContinuityResult};
use crate::config::AnalysisConfig;
use crate::expression::Expression;

/// Horizontal range and resolution of a plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub samples: usize,
}

impl Default for PlotWindow {
    fn default() -> Self {
        PlotWindow {
            x_min: -10.0,
            x_max: 10.0,
            samples: 401,
        }
    }
}

impl PlotWindow {
    /// Window centred on `x0` with the default width
    pub fn around(x0: f64) -> Self {
        let d = PlotWindow::default();
        let half = (d.x_max - d.x_min) / 2.0;
        PlotWindow {
            x_min: x0 - half,
            x_max: x0 + half,
            ..d
        }
    }

    fn x_at(&self, i: usize) -> f64 {
        if self.samples < 2 {
            return self.x_min;
        }
        let t = i as f64 / (self.samples - 1) as f64;
        self.x_min + t * (self.x_max - self.x_min)
    }
}

/// Connected pieces of a curve; gaps fall where the function is not drawable
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Curve {
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl Curve {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// Smallest and largest y over all segments
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.segments
            .iter()
            .flatten()
            .map(|&(_, y)| y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

/// Sample `expression` across `window`, breaking the curve at non-finite or clamped values
pub fn sample_curve(expression: &Expression, window: &PlotWindow, config: &AnalysisConfig) -> Curve {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for i in 0..window.samples {
        let x = window.x_at(i);
        match expression.evaluate(x).finite() {
            Some(y) if y.abs() < config.plot_clamp => current.push((x, y)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    Curve { segments }
}

/// How the analysis point is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marker {
    /// Solid dot at a defined point
    Filled { x: f64, y: f64 },
    /// Open circle at the limit of a removable discontinuity
    Hollow { x: f64, y: f64 },
    /// Only the vertical guide line at `x`
    Hidden { x: f64 },
}

impl Marker {
    pub fn x(&self) -> f64 {
        match *self {
            Marker::Filled { x, .. } | Marker::Hollow { x, .. } | Marker::Hidden { x } => x,
        }
    }
}

/// Marker for the analysis point `x0`, consistent with the continuity verdict
pub fn analysis_marker(expression: &Expression, x0: f64, config: &AnalysisConfig) -> Marker {
    let drawable = |y: f64| y.abs() < config.plot_clamp;
    match classify(expression, x0, config) {
        ContinuityResult::Continuous { value } if drawable(value) => Marker::Filled { x: x0, y: value },
        ContinuityResult::RemovableDiscontinuity { limit, .. } if drawable(limit) => {
            Marker::Hollow { x: x0, y: limit }
        }
        // Defined but the limit does not exist: the value itself is still a point of the graph
        ContinuityResult::JumpDiscontinuity { .. } => match expression.evaluate(x0).finite() {
            Some(y) if drawable(y) => Marker::Filled { x: x0, y },
            _ => Marker::Hidden { x: x0 },
        },
        _ => Marker::Hidden { x: x0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> Expression {
        Expression::parse(input).unwrap()
    }

    #[test]
    fn test_window_endpoints() {
        let w = PlotWindow::default();
        assert_eq!(w.x_at(0), -10.0);
        assert_eq!(w.x_at(200), 0.0);
        assert_eq!(w.x_at(400), 10.0);
        let around = PlotWindow::around(3.0);
        assert_eq!((around.x_min, around.x_max), (-7.0, 13.0));
    }

    #[test]
    fn test_pole_splits_curve() {
        let curve = sample_curve(&expr("1/x"), &PlotWindow::default(), &AnalysisConfig::default());
        assert_eq!(curve.segments.len(), 2);
        assert!(curve.segments[0].iter().all(|&(x, _)| x < 0.0));
        assert!(curve.segments[1].iter().all(|&(x, _)| x > 0.0));
    }

    #[test]
    fn test_clamp_drops_large_values() {
        let curve = sample_curve(&expr("x^3"), &PlotWindow::default(), &AnalysisConfig::default());
        let (lo, hi) = curve.y_range().unwrap();
        assert!(lo > -100.0 && hi < 100.0);
        assert!(curve.point_count() < 401);
    }

    #[test]
    fn test_markers_follow_continuity() {
        let cfg = AnalysisConfig::default();
        assert_eq!(
            analysis_marker(&expr("x^2"), 3.0, &cfg),
            Marker::Filled { x: 3.0, y: 9.0 }
        );
        match analysis_marker(&expr("(x^2 - 4)/(x - 2)"), 2.0, &cfg) {
            Marker::Hollow { x, y } => {
                assert_eq!(x, 2.0);
                assert!((y - 4.0).abs() < 1e-3);
            }
            other => panic!("expected hollow marker, got {other:?}"),
        }
        assert_eq!(analysis_marker(&expr("1/x"), 0.0, &cfg), Marker::Hidden { x: 0.0 });
    }
}
