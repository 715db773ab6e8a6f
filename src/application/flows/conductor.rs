//! ConductorFlow - Architect, then Creator on the rendered plan.
//!
//! Linear, two steps, no branching and no retry:
//!
//! ```text
//! Start -> ArchitectCalled -> CreatorCalled -> Done
//! ```
//!
//! A failure at either step ends the run with that step's error. The plan is
//! never exposed to the caller.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    require_text, ArchitectFlow, ArchitectInput, Flow, FlowError, FlowServices, SpecialistFlow,
    TextInput, TextOutput,
};
use crate::domain::FlowName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConductorInput {
    pub task: String,
}

impl ConductorInput {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

/// Progress of a single conductor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConductorStage {
    Start,
    ArchitectCalled,
    CreatorCalled,
    Done,
}

impl fmt::Display for ConductorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConductorStage::Start => "start",
            ConductorStage::ArchitectCalled => "architect_called",
            ConductorStage::CreatorCalled => "creator_called",
            ConductorStage::Done => "done",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
pub struct ConductorFlow {
    architect: ArchitectFlow,
    creator: SpecialistFlow,
}

impl ConductorFlow {
    pub fn new(services: FlowServices) -> Self {
        Self {
            architect: ArchitectFlow::new(services.clone()),
            creator: SpecialistFlow::creator(services),
        }
    }
}

#[async_trait]
impl Flow for ConductorFlow {
    type Input = ConductorInput;
    type Output = TextOutput;

    fn name(&self) -> FlowName {
        FlowName::Conductor
    }

    async fn run(&self, input: ConductorInput) -> Result<TextOutput, FlowError> {
        require_text(self.name(), "task", &input.task)?;

        tracing::debug!(stage = %ConductorStage::Start, "Conductor started");

        let plan = self
            .architect
            .run(ArchitectInput::new(input.task))
            .await
            .map_err(|e| {
                tracing::error!(
                    stage = %ConductorStage::Start,
                    error = %e,
                    "Conductor failed at architect"
                );
                e
            })?;
        tracing::debug!(
            stage = %ConductorStage::ArchitectCalled,
            steps = plan.steps().len(),
            "Plan received"
        );

        let draft = self
            .creator
            .run(TextInput::new(plan.render()))
            .await
            .map_err(|e| {
                tracing::error!(
                    stage = %ConductorStage::ArchitectCalled,
                    error = %e,
                    "Conductor failed at creator"
                );
                e
            })?;
        tracing::debug!(stage = %ConductorStage::CreatorCalled, "Draft received");

        tracing::info!(stage = %ConductorStage::Done, "Conductor completed");
        Ok(draft)
    }
}
