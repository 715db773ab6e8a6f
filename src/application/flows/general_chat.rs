//! GeneralChatFlow - conversational reply over caller-supplied history.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{require_text, Flow, FlowError, FlowServices, TextOutput};
use crate::domain::{ChatTurn, FlowName, MessageSequence};
use crate::ports::GenerationConfig;

const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralChatInput {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub message: String,
}

/// Plain chat with no stored persona and no system message.
#[derive(Clone)]
pub struct GeneralChatFlow {
    services: FlowServices,
}

impl GeneralChatFlow {
    pub fn new(services: FlowServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Flow for GeneralChatFlow {
    type Input = GeneralChatInput;
    type Output = TextOutput;

    fn name(&self) -> FlowName {
        FlowName::GeneralChat
    }

    async fn run(&self, input: GeneralChatInput) -> Result<TextOutput, FlowError> {
        require_text(self.name(), "message", &input.message)?;

        let messages = MessageSequence::assemble(None, &input.history, input.message);
        let result = self
            .services
            .generate(self.name(), messages, GenerationConfig::new(TEMPERATURE))
            .await?;

        Ok(TextOutput {
            text: result.into_text(),
        })
    }
}
