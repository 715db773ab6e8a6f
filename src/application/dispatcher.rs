//! FlowDispatcher - run a flow by name over JSON documents.
//!
//! The single entry point used by transports. Each call deserializes the
//! flow's typed input, runs it inside a `flow` span carrying a fresh
//! invocation id, and serializes the typed output.

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use super::flows::{
    ArchitectFlow, AssistantFlow, ClassifierFlow, ConductorFlow, Flow, FlowError, FlowServices,
    GeneralChatFlow, Specialist, SpecialistFlow,
};
use crate::domain::FlowName;

#[derive(Clone)]
pub struct FlowDispatcher {
    classifier: ClassifierFlow,
    architect: ArchitectFlow,
    creator: SpecialistFlow,
    editor: SpecialistFlow,
    researcher: SpecialistFlow,
    component_builder: SpecialistFlow,
    general_chat: GeneralChatFlow,
    conductor: ConductorFlow,
    assistant: AssistantFlow,
}

impl FlowDispatcher {
    pub fn new(services: FlowServices) -> Self {
        let specialist = |s| SpecialistFlow::new(services.clone(), s);
        Self {
            classifier: ClassifierFlow::new(services.clone()),
            architect: ArchitectFlow::new(services.clone()),
            creator: specialist(Specialist::Creator),
            editor: specialist(Specialist::Editor),
            researcher: specialist(Specialist::Researcher),
            component_builder: specialist(Specialist::ComponentBuilder),
            general_chat: GeneralChatFlow::new(services.clone()),
            conductor: ConductorFlow::new(services.clone()),
            assistant: AssistantFlow::new(services),
        }
    }

    /// Every flow this dispatcher can run.
    pub fn flow_names(&self) -> &'static [FlowName] {
        &FlowName::ALL
    }

    /// Runs the flow registered under `name` with a JSON input document.
    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value, FlowError> {
        let flow: FlowName = name.parse().map_err(FlowError::UnknownFlow)?;
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "flow",
            flow = %flow,
            invocation_id = %invocation_id
        );

        let result = async {
            match flow {
                FlowName::Classifier => run_json(&self.classifier, input).await,
                FlowName::Architect => run_json(&self.architect, input).await,
                FlowName::Creator => run_json(&self.creator, input).await,
                FlowName::Editor => run_json(&self.editor, input).await,
                FlowName::Researcher => run_json(&self.researcher, input).await,
                FlowName::ComponentBuilder => run_json(&self.component_builder, input).await,
                FlowName::GeneralChat => run_json(&self.general_chat, input).await,
                FlowName::Conductor => run_json(&self.conductor, input).await,
                FlowName::Assistant => run_json(&self.assistant, input).await,
            }
        }
        .instrument(span.clone())
        .await;

        span.in_scope(|| match &result {
            Ok(_) => tracing::debug!("Flow succeeded"),
            Err(e) => tracing::error!(error = %e, kind = ?e.kind(), "Flow failed"),
        });
        result
    }
}

async fn run_json<F: Flow>(flow: &F, input: Value) -> Result<Value, FlowError> {
    let input: F::Input = serde_json::from_value(input)
        .map_err(|e| FlowError::invalid_input(flow.name(), e.to_string()))?;

    let output = flow.run(input).await?;

    serde_json::to_value(output).map_err(|e| FlowError::Internal {
        flow: flow.name(),
        message: format!("failed to encode output: {}", e),
    })
}
