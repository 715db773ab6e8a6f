//! Flows - named, typed units of orchestration.
//!
//! Each flow turns one typed input into one typed output using the
//! generation port, and optionally a stored persona.
//!
//! ## Single-shot flows
//! - `ClassifierFlow` - free text to one intent label
//! - `ArchitectFlow` - task description to a validated `Plan`
//! - `SpecialistFlow` - Creator, Editor, Researcher, Component-Builder
//! - `GeneralChatFlow` - history plus message to a reply
//!
//! ## Composed flows
//! - `ConductorFlow` - Architect, then Creator on the rendered plan
//! - `AssistantFlow` - Classifier, then dispatch on the label

mod architect;
mod assistant;
mod classifier;
mod conductor;
mod error;
mod general_chat;
mod specialist;

pub use architect::{ArchitectFlow, ArchitectInput};
pub use assistant::{AssistantFlow, AssistantInput, AssistantOutcome, AssistantOutput};
pub use classifier::{ClassifierFlow, ClassifierInput, ClassifierOutput};
pub use conductor::{ConductorFlow, ConductorInput, ConductorStage};
pub use error::{FailureKind, FlowError};
pub use general_chat::{GeneralChatFlow, GeneralChatInput};
pub use specialist::{Specialist, SpecialistFlow};

pub(crate) use error::require_text;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::personas::PersonaResolver;
use crate::application::structured::StructuredOutputAdapter;
use crate::domain::{FlowName, MessageSequence};
use crate::ports::{
    GenerationConfig, GenerationPort, GenerationResult, PromptStore, SchemaValidator,
};

/// A named flow with a typed input and output contract.
#[async_trait]
pub trait Flow: Send + Sync {
    type Input: DeserializeOwned + Send;
    type Output: Serialize + Send;

    fn name(&self) -> FlowName;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, FlowError>;
}

/// Input of the free-text specialist flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Output of every flow that produces free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOutput {
    pub text: String,
}

/// Dependencies shared by every flow. Constructed once per process.
#[derive(Clone)]
pub struct FlowServices {
    generator: Arc<dyn GenerationPort>,
    personas: PersonaResolver,
    structured: StructuredOutputAdapter,
}

impl FlowServices {
    pub fn new(
        generator: Arc<dyn GenerationPort>,
        prompts: Arc<dyn PromptStore>,
        validator: Arc<dyn SchemaValidator>,
    ) -> Self {
        Self {
            generator,
            personas: PersonaResolver::new(prompts),
            structured: StructuredOutputAdapter::new(validator),
        }
    }

    pub fn personas(&self) -> &PersonaResolver {
        &self.personas
    }

    pub fn structured(&self) -> &StructuredOutputAdapter {
        &self.structured
    }

    /// Calls the generation port once, attributing any failure to `flow`.
    pub async fn generate(
        &self,
        flow: FlowName,
        messages: MessageSequence,
        config: GenerationConfig,
    ) -> Result<GenerationResult, FlowError> {
        tracing::debug!(
            flow = %flow,
            messages = messages.len(),
            temperature = config.temperature(),
            "Invoking generation port"
        );

        self.generator
            .generate(messages, config)
            .await
            .map_err(|e| {
                tracing::warn!(
                    flow = %flow,
                    error = %e,
                    unreachable = e.is_unreachable(),
                    "Generation port call failed"
                );
                FlowError::generation(flow, e)
            })
    }
}
