//! Names of the flows the core exposes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every named flow. The string form is the flow's external identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowName {
    Classifier,
    Architect,
    Creator,
    Editor,
    Researcher,
    ComponentBuilder,
    GeneralChat,
    Conductor,
    Assistant,
}

impl FlowName {
    pub const ALL: [FlowName; 9] = [
        FlowName::Classifier,
        FlowName::Architect,
        FlowName::Creator,
        FlowName::Editor,
        FlowName::Researcher,
        FlowName::ComponentBuilder,
        FlowName::GeneralChat,
        FlowName::Conductor,
        FlowName::Assistant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowName::Classifier => "classifier",
            FlowName::Architect => "architect",
            FlowName::Creator => "creator",
            FlowName::Editor => "editor",
            FlowName::Researcher => "researcher",
            FlowName::ComponentBuilder => "component_builder",
            FlowName::GeneralChat => "general_chat",
            FlowName::Conductor => "conductor",
            FlowName::Assistant => "assistant",
        }
    }

    /// Id of the stored persona prompt this flow fetches, if it has one.
    pub fn prompt_id(&self) -> Option<&'static str> {
        match self {
            FlowName::Architect
            | FlowName::Creator
            | FlowName::Editor
            | FlowName::Researcher
            | FlowName::ComponentBuilder => Some(self.as_str()),
            FlowName::Classifier
            | FlowName::GeneralChat
            | FlowName::Conductor
            | FlowName::Assistant => None,
        }
    }
}

impl fmt::Display for FlowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
