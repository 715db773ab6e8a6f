//! Personas shipped with the binary.
//!
//! Seed for `InMemoryPromptStore` when no external prompt directory is
//! configured.

use crate::domain::FlowName;
use crate::ports::PromptRecord;

const ARCHITECT: &str = "You are a software and content architect. Break the user's request \
into a short, ordered plan. Respond with a JSON object of the form \
{\"title\": string, \"steps\": [string, ...]} and nothing else. Every step is one concrete, \
actionable sentence.";

const CREATOR: &str = "You are a skilled writer. Produce a complete, well-structured draft \
that fulfils the user's request. Follow any plan you are given step by step, in order.";

const EDITOR: &str = "You are a careful editor. Improve clarity, grammar, and flow of the \
text you are given while preserving its meaning and voice. Return only the revised text.";

const RESEARCHER: &str = "You are a research assistant. Answer with accurate, current, \
well-sourced information. Cite sources inline where you rely on them.";

const COMPONENT_BUILDER: &str = "You are a front-end engineer. Write a single, self-contained \
UI component that satisfies the user's request.";

/// Built-in persona prompts, keyed by flow prompt id.
pub fn builtin_personas() -> Vec<PromptRecord> {
    [
        (FlowName::Architect, ARCHITECT),
        (FlowName::Creator, CREATOR),
        (FlowName::Editor, EDITOR),
        (FlowName::Researcher, RESEARCHER),
        (FlowName::ComponentBuilder, COMPONENT_BUILDER),
    ]
    .into_iter()
    .filter_map(|(flow, text)| flow.prompt_id().map(|id| PromptRecord::new(id, text)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flow_with_a_prompt_id_has_a_builtin() {
        let personas = builtin_personas();
        for flow in FlowName::ALL {
            if let Some(id) = flow.prompt_id() {
                assert!(
                    personas.iter().any(|p| p.id == id && !p.text.trim().is_empty()),
                    "missing builtin persona for {}",
                    id
                );
            }
        }
    }
}
