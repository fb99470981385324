//! Didactic step trails
//!
//! Every analysis narrates its reasoning as an ordered list of
//! [`SolutionStep`]s. The trail is append-only: steps are numbered as they are
//! pushed and never reordered or removed.

use serde::Serialize;

/// One explanation fragment of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionStep {
    /// Short heading, e.g. `Step 2: Direct substitution`
    pub label: String,
    /// Human-readable explanation
    pub content: String,
    /// Optional LaTeX rendering of the formula the step is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math: Option<String>,
}

impl SolutionStep {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        SolutionStep {
            label: label.into(),
            content: content.into(),
            math: None,
        }
    }

    /// Attach a LaTeX formula
    pub fn with_math(mut self, latex: impl Into<String>) -> Self {
        self.math = Some(latex.into());
        self
    }
}

/// Append-only, auto-numbering collection of steps for one analysis run
#[derive(Debug, Default)]
pub(crate) struct StepTrail {
    steps: Vec<SolutionStep>,
}

impl StepTrail {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_label(&self, title: &str) -> String {
        format!("Step {}: {title}", self.steps.len() + 1)
    }

    /// Append a numbered step
    pub(crate) fn push(&mut self, title: &str, content: impl Into<String>) {
        let label = self.next_label(title);
        self.steps.push(SolutionStep::new(label, content));
    }

    /// Append a numbered step with a LaTeX formula
    pub(crate) fn push_math(
        &mut self,
        title: &str,
        content: impl Into<String>,
        latex: impl Into<String>,
    ) {
        let label = self.next_label(title);
        self.steps
            .push(SolutionStep::new(label, content).with_math(latex));
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn into_steps(self) -> Vec<SolutionStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_numbered_in_order() {
        let mut trail = StepTrail::new();
        trail.push("Compute the limit", "lim x->2");
        trail.push_math("Direct substitution", "f(2) = 4", "f(2) = 4");
        assert_eq!(trail.len(), 2);

        let steps = trail.into_steps();
        assert_eq!(steps[0].label, "Step 1: Compute the limit");
        assert_eq!(steps[1].label, "Step 2: Direct substitution");
        assert!(steps[0].math.is_none());
        assert_eq!(steps[1].math.as_deref(), Some("f(2) = 4"));
    }

    #[test]
    fn test_math_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&SolutionStep::new("Error", "bad")).unwrap();
        assert_eq!(json, r#"{"label":"Error","content":"bad"}"#);
    }
}
