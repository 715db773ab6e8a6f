//! AssistantFlow - classify a message, then dispatch on its label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    require_text, ClassifierFlow, ClassifierInput, ConductorFlow, ConductorInput, Flow,
    FlowError, FlowServices, GeneralChatFlow, GeneralChatInput, Specialist, SpecialistFlow,
    TextInput,
};
use crate::domain::{ChatTurn, ClassificationLabel, FlowName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantInput {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// What the routed request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssistantOutcome {
    /// A flow ran and produced text.
    Generated { flow: FlowName, text: String },
    /// Approvals are left to a human reviewer; nothing was generated.
    ApprovalPending { request: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantOutput {
    pub label: ClassificationLabel,
    pub outcome: AssistantOutcome,
}

/// Top-level router.
///
/// | label               | target            |
/// |---------------------|-------------------|
/// | `component_request` | component_builder |
/// | `task_request`      | conductor         |
/// | `general_chat`      | general_chat      |
/// | `approval_request`  | none (pending)    |
#[derive(Clone)]
pub struct AssistantFlow {
    classifier: ClassifierFlow,
    component_builder: SpecialistFlow,
    conductor: ConductorFlow,
    general_chat: GeneralChatFlow,
}

impl AssistantFlow {
    pub fn new(services: FlowServices) -> Self {
        Self {
            classifier: ClassifierFlow::new(services.clone()),
            component_builder: SpecialistFlow::new(services.clone(), Specialist::ComponentBuilder),
            conductor: ConductorFlow::new(services.clone()),
            general_chat: GeneralChatFlow::new(services),
        }
    }
}

#[async_trait]
impl Flow for AssistantFlow {
    type Input = AssistantInput;
    type Output = AssistantOutput;

    fn name(&self) -> FlowName {
        FlowName::Assistant
    }

    async fn run(&self, input: AssistantInput) -> Result<AssistantOutput, FlowError> {
        require_text(self.name(), "message", &input.message)?;

        let label = self
            .classifier
            .run(ClassifierInput {
                text: input.message.clone(),
            })
            .await?
            .label;

        let outcome = match label {
            ClassificationLabel::ComponentRequest => {
                let output = self
                    .component_builder
                    .run(TextInput::new(input.message))
                    .await?;
                AssistantOutcome::Generated {
                    flow: self.component_builder.name(),
                    text: output.text,
                }
            }
            ClassificationLabel::TaskRequest => {
                let output = self.conductor.run(ConductorInput::new(input.message)).await?;
                AssistantOutcome::Generated {
                    flow: self.conductor.name(),
                    text: output.text,
                }
            }
            ClassificationLabel::GeneralChat => {
                let output = self
                    .general_chat
                    .run(GeneralChatInput {
                        history: input.history,
                        message: input.message,
                    })
                    .await?;
                AssistantOutcome::Generated {
                    flow: self.general_chat.name(),
                    text: output.text,
                }
            }
            ClassificationLabel::ApprovalRequest => {
                tracing::info!("Approval request left pending");
                AssistantOutcome::ApprovalPending {
                    request: input.message,
                }
            }
        };

        Ok(AssistantOutput { label, outcome })
    }
}
