//! Plan - the Architect's structured output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a plan would violate its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("plan title must not be empty")]
    EmptyTitle,

    #[error("plan must contain at least one step")]
    NoSteps,

    #[error("plan step {index} must not be empty")]
    EmptyStep { index: usize },

    #[error("plan title must be a single line")]
    MultiLineTitle,

    #[error("plan step {index} must be a single line")]
    MultiLineStep { index: usize },
}

fn is_multi_line(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

/// A titled, ordered list of steps.
///
/// Construction always goes through [`Plan::new`] (deserialization included),
/// so a `Plan` value has a non-empty title and at least one non-empty step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPlan")]
pub struct Plan {
    title: String,
    steps: Vec<String>,
}

#[derive(Deserialize)]
struct RawPlan {
    title: String,
    steps: Vec<String>,
}

impl TryFrom<RawPlan> for Plan {
    type Error = PlanError;

    fn try_from(raw: RawPlan) -> Result<Self, Self::Error> {
        Plan::new(raw.title, raw.steps)
    }
}

impl Plan {
    pub fn new(title: impl Into<String>, steps: Vec<String>) -> Result<Self, PlanError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(PlanError::EmptyTitle);
        }
        if is_multi_line(&title) {
            return Err(PlanError::MultiLineTitle);
        }
        if steps.is_empty() {
            return Err(PlanError::NoSteps);
        }
        if let Some(index) = steps.iter().position(|s| s.trim().is_empty()) {
            return Err(PlanError::EmptyStep { index });
        }
        if let Some(index) = steps.iter().position(|s| is_multi_line(s)) {
            return Err(PlanError::MultiLineStep { index });
        }
        Ok(Self { title, steps })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Renders the plan as the title line followed by a 1-indexed step list.
    ///
    /// ```text
    /// Todo App Brief
    /// 1. Define audience
    /// 2. Outline features
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.title.len() + self.steps.iter().map(|s| s.len() + 6).sum::<usize>(),
        );
        out.push_str(&self.title);
        for (i, step) in self.steps.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{}. {}", i + 1, step));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_accepts_valid_plan() {
        let plan = Plan::new("T", steps(&["a", "b"])).unwrap();
        assert_eq!(plan.title(), "T");
        assert_eq!(plan.steps(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn new_rejects_blank_title() {
        assert_eq!(Plan::new("   ", steps(&["a"])), Err(PlanError::EmptyTitle));
    }

    #[test]
    fn new_rejects_missing_steps() {
        assert_eq!(Plan::new("T", vec![]), Err(PlanError::NoSteps));
    }

    #[test]
    fn new_rejects_blank_step() {
        assert_eq!(
            Plan::new("T", steps(&["a", " "])),
            Err(PlanError::EmptyStep { index: 1 })
        );
    }

    #[test]
    fn new_rejects_multi_line_title() {
        assert_eq!(
            Plan::new("T\nmore", steps(&["a"])),
            Err(PlanError::MultiLineTitle)
        );
    }

    #[test]
    fn new_rejects_step_that_would_inject_a_numbered_line() {
        assert_eq!(
            Plan::new("T", steps(&["a\n2. injected", "b"])),
            Err(PlanError::MultiLineStep { index: 0 })
        );
        assert_eq!(
            Plan::new("T", steps(&["a", "b\r\nc"])),
            Err(PlanError::MultiLineStep { index: 1 })
        );
    }

    #[test]
    fn render_has_one_line_per_step() {
        let plan = Plan::new("T", steps(&["a", "b", "c"])).unwrap();
        assert_eq!(plan.render().lines().count(), 4);
    }

    #[test]
    fn render_numbers_steps_in_order() {
        let plan = Plan::new("Todo App Brief", steps(&["Define audience", "Outline features"]))
            .unwrap();
        assert_eq!(
            plan.render(),
            "Todo App Brief\n1. Define audience\n2. Outline features"
        );
    }

    #[test]
    fn deserialize_enforces_invariants() {
        let ok: Plan = serde_json::from_str(r#"{"title":"T","steps":["a"]}"#).unwrap();
        assert_eq!(ok.steps().len(), 1);

        let empty = serde_json::from_str::<Plan>(r#"{"title":"T","steps":[]}"#);
        assert!(empty.is_err());

        let missing = serde_json::from_str::<Plan>(r#"{"title":"T"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn serializes_to_wire_shape() {
        let plan = Plan::new("T", steps(&["a"])).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json, serde_json::json!({"title": "T", "steps": ["a"]}));
    }
}
