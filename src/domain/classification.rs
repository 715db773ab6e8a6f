//! Intent labels produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of intents the router can dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationLabel {
    ComponentRequest,
    TaskRequest,
    ApprovalRequest,
    #[default]
    GeneralChat,
}

/// The model's completion did not name a known label.
///
/// Recovered locally by the classifier; never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized classification: {raw:?}")]
pub struct UnrecognizedClassification {
    pub raw: String,
}

impl ClassificationLabel {
    pub const ALL: [ClassificationLabel; 4] = [
        ClassificationLabel::ComponentRequest,
        ClassificationLabel::TaskRequest,
        ClassificationLabel::ApprovalRequest,
        ClassificationLabel::GeneralChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::ComponentRequest => "component_request",
            ClassificationLabel::TaskRequest => "task_request",
            ClassificationLabel::ApprovalRequest => "approval_request",
            ClassificationLabel::GeneralChat => "general_chat",
        }
    }

    /// Matches a raw completion against the label set.
    ///
    /// Surrounding whitespace is trimmed; everything else must match a label
    /// exactly and case-sensitively. `"task_request."` or `"Task_Request"`
    /// are unrecognized.
    pub fn from_completion(raw: &str) -> Result<Self, UnrecognizedClassification> {
        raw.trim().parse()
    }
}

impl FromStr for ClassificationLabel {
    type Err = UnrecognizedClassification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnrecognizedClassification { raw: s.to_string() })
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
