//! Single-persona text flows: Creator, Editor, Researcher, Component-Builder.

use async_trait::async_trait;

use super::{require_text, Flow, FlowError, FlowServices, TextInput, TextOutput};
use crate::domain::{FlowName, MessageSequence};
use crate::ports::GenerationConfig;

/// Appended to the Component-Builder persona. The flow never strips fences
/// from the model's code itself.
const NO_FENCE_INSTRUCTION: &str = "Output only the raw source code. Do not wrap it in \
markdown code fences and do not add any explanation before or after it.";

/// The specialist personas sharing the text-in, text-out template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialist {
    Creator,
    Editor,
    Researcher,
    ComponentBuilder,
}

impl Specialist {
    pub const ALL: [Specialist; 4] = [
        Specialist::Creator,
        Specialist::Editor,
        Specialist::Researcher,
        Specialist::ComponentBuilder,
    ];

    pub fn flow_name(&self) -> FlowName {
        match self {
            Specialist::Creator => FlowName::Creator,
            Specialist::Editor => FlowName::Editor,
            Specialist::Researcher => FlowName::Researcher,
            Specialist::ComponentBuilder => FlowName::ComponentBuilder,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Specialist::Creator => 0.8,
            Specialist::Editor => 0.3,
            Specialist::Researcher => 0.4,
            Specialist::ComponentBuilder => 0.2,
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        let config = GenerationConfig::new(self.temperature());
        match self {
            Specialist::Researcher => config.with_retrieval(),
            _ => config,
        }
    }

    fn system_prompt(&self, persona: &str) -> String {
        match self {
            Specialist::ComponentBuilder => format!("{}\n\n{}", persona, NO_FENCE_INSTRUCTION),
            _ => persona.to_string(),
        }
    }
}

/// Runs one specialist persona over free text and returns the model's text
/// unmodified.
#[derive(Clone)]
pub struct SpecialistFlow {
    services: FlowServices,
    specialist: Specialist,
}

impl SpecialistFlow {
    pub fn new(services: FlowServices, specialist: Specialist) -> Self {
        Self {
            services,
            specialist,
        }
    }

    pub fn creator(services: FlowServices) -> Self {
        Self::new(services, Specialist::Creator)
    }

    pub fn specialist(&self) -> Specialist {
        self.specialist
    }
}

#[async_trait]
impl Flow for SpecialistFlow {
    type Input = TextInput;
    type Output = TextOutput;

    fn name(&self) -> FlowName {
        self.specialist.flow_name()
    }

    async fn run(&self, input: TextInput) -> Result<TextOutput, FlowError> {
        let flow = self.name();
        require_text(flow, "text", &input.text)?;

        let persona = self
            .services
            .personas()
            .resolve(flow.prompt_id().unwrap_or(flow.as_str()))
            .await;
        let system = self.specialist.system_prompt(&persona.text);

        let messages = MessageSequence::single_turn(&system, input.text);
        let result = self
            .services
            .generate(flow, messages, self.specialist.generation_config())
            .await?;

        let text = result.into_text();
        tracing::info!(flow = %flow, chars = text.len(), "Specialist completed");
        Ok(TextOutput { text })
    }
}
