//! ClassifierFlow - map free text to one intent label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{require_text, Flow, FlowError, FlowServices};
use crate::domain::{ClassificationLabel, FlowName, MessageSequence};
use crate::ports::GenerationConfig;

const SYSTEM_PROMPT: &str = "You are an intent classifier for a multi-agent assistant. \
Classify the user's request into exactly one of these labels:

component_request - the user wants a UI component or a piece of code written.
task_request - the user wants a multi-step deliverable planned and produced (a document, brief, article, or similar).
approval_request - the user is approving, rejecting, or asking to sign off on previous work.
general_chat - anything else: questions, small talk, or requests that fit no other label.

Respond with the label only, exactly as written above, with no punctuation or explanation.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierInput {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: ClassificationLabel,
}

/// Routes raw text to a label of the closed set.
///
/// The model's completion is trimmed and matched exactly. Anything else
/// (empty, extra prose, punctuation, wrong case) yields `general_chat` and a
/// warning; the caller always receives a member of the set.
#[derive(Clone)]
pub struct ClassifierFlow {
    services: FlowServices,
}

impl ClassifierFlow {
    pub fn new(services: FlowServices) -> Self {
        Self { services }
    }

    fn user_message(text: &str) -> String {
        format!("Classify this request:\n\"\"\"\n{}\n\"\"\"", text)
    }
}

#[async_trait]
impl Flow for ClassifierFlow {
    type Input = ClassifierInput;
    type Output = ClassifierOutput;

    fn name(&self) -> FlowName {
        FlowName::Classifier
    }

    async fn run(&self, input: ClassifierInput) -> Result<ClassifierOutput, FlowError> {
        require_text(self.name(), "text", &input.text)?;

        let messages = MessageSequence::single_turn(SYSTEM_PROMPT, Self::user_message(&input.text));
        let result = self
            .services
            .generate(self.name(), messages, GenerationConfig::deterministic())
            .await?;

        let raw = result.into_text();
        let label = ClassificationLabel::from_completion(&raw).unwrap_or_else(|unrecognized| {
            tracing::warn!(
                raw = %unrecognized.raw,
                "Unrecognized classification, defaulting to general_chat"
            );
            ClassificationLabel::GeneralChat
        });

        tracing::info!(label = %label, "Classified request");
        Ok(ClassifierOutput { label })
    }
}
