//! Flow failures surfaced to callers.

use thiserror::Error;

use crate::application::structured::StructuredOutputError;
use crate::domain::FlowName;
use crate::ports::GenerationError;

/// Coarse failure category callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The generation port produced no result.
    Generation,
    /// Structured output failed parsing or invariant checks.
    Validation,
    /// The caller's input did not satisfy the flow's contract.
    Input,
    /// No flow is registered under the requested name.
    NotFound,
    /// The flow's own output could not be encoded.
    Internal,
}

/// A flow invocation failed.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{flow} flow failed: generation failure: {source}")]
    GenerationFailure {
        flow: FlowName,
        source: GenerationError,
    },

    #[error("{flow} flow failed: structured output invalid: {reason}")]
    StructuredOutputInvalid {
        flow: FlowName,
        #[source]
        reason: StructuredOutputError,
    },

    #[error("{flow} flow rejected input: {message}")]
    InvalidInput { flow: FlowName, message: String },

    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    #[error("{flow} flow failed: {message}")]
    Internal { flow: FlowName, message: String },
}

impl FlowError {
    pub fn generation(flow: FlowName, source: GenerationError) -> Self {
        Self::GenerationFailure { flow, source }
    }

    pub fn structured_output(flow: FlowName, reason: impl Into<StructuredOutputError>) -> Self {
        Self::StructuredOutputInvalid {
            flow,
            reason: reason.into(),
        }
    }

    pub fn invalid_input(flow: FlowName, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            flow,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FlowError::GenerationFailure { .. } => FailureKind::Generation,
            FlowError::StructuredOutputInvalid { .. } => FailureKind::Validation,
            FlowError::InvalidInput { .. } => FailureKind::Input,
            FlowError::UnknownFlow(_) => FailureKind::NotFound,
            FlowError::Internal { .. } => FailureKind::Internal,
        }
    }

    /// The flow that failed, when one was resolved.
    pub fn flow(&self) -> Option<FlowName> {
        match self {
            FlowError::GenerationFailure { flow, .. }
            | FlowError::StructuredOutputInvalid { flow, .. }
            | FlowError::InvalidInput { flow, .. }
            | FlowError::Internal { flow, .. } => Some(*flow),
            FlowError::UnknownFlow(_) => None,
        }
    }
}

/// Rejects blank text fields.
pub(crate) fn require_text(flow: FlowName, field: &str, value: &str) -> Result<(), FlowError> {
    if value.trim().is_empty() {
        return Err(FlowError::invalid_input(
            flow,
            format!("{} must not be empty", field),
        ));
    }
    Ok(())
}
