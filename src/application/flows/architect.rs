//! ArchitectFlow - task description to a validated `Plan`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{require_text, Flow, FlowError, FlowServices};
use crate::domain::{FlowName, MessageSequence, Plan, SchemaId};
use crate::ports::GenerationConfig;

const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectInput {
    pub task: String,
}

impl ArchitectInput {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

/// Breaks a task into a titled, ordered plan.
///
/// The output never comes back partially valid: a parse failure or schema
/// violation fails the flow with `StructuredOutputInvalid`.
#[derive(Clone)]
pub struct ArchitectFlow {
    services: FlowServices,
}

impl ArchitectFlow {
    pub fn new(services: FlowServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Flow for ArchitectFlow {
    type Input = ArchitectInput;
    type Output = Plan;

    fn name(&self) -> FlowName {
        FlowName::Architect
    }

    async fn run(&self, input: ArchitectInput) -> Result<Plan, FlowError> {
        let flow = self.name();
        require_text(flow, "task", &input.task)?;

        let persona = self
            .services
            .personas()
            .resolve(flow.prompt_id().unwrap_or(flow.as_str()))
            .await;

        let messages = MessageSequence::single_turn(&persona.text, input.task);
        let config = GenerationConfig::new(TEMPERATURE).with_structured_output(SchemaId::Plan);
        let result = self.services.generate(flow, messages, config).await?;

        let plan: Plan = self
            .services
            .structured()
            .extract(SchemaId::Plan, result.output)
            .map_err(|e| {
                tracing::error!(error = %e, "Architect output rejected");
                FlowError::structured_output(flow, e)
            })?;

        tracing::info!(title = plan.title(), steps = plan.steps().len(), "Plan produced");
        Ok(plan)
    }
}
