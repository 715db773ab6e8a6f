//! HTTP DTOs for flow endpoints.
//!
//! Flow inputs and outputs pass through as raw JSON documents; only the
//! envelope types live here.

use serde::Serialize;

use crate::application::{FailureKind, FlowError};
use crate::domain::FlowName;

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub structured_output: bool,
}

/// Response for `GET /flows`.
#[derive(Debug, Clone, Serialize)]
pub struct FlowListResponse {
    pub flows: Vec<FlowName>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowName>,
}

impl ErrorResponse {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: "INVALID_INPUT".to_string(),
            message: message.into(),
            flow: None,
        }
    }

    pub fn from_flow_error(err: &FlowError) -> Self {
        let code = match err.kind() {
            FailureKind::Input => "INVALID_INPUT",
            FailureKind::NotFound => "NOT_FOUND",
            FailureKind::Generation => "GENERATION_FAILED",
            FailureKind::Validation => "STRUCTURED_OUTPUT_INVALID",
            FailureKind::Internal => "INTERNAL_ERROR",
        };
        Self {
            code: code.to_string(),
            message: err.to_string(),
            flow: err.flow(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerationError;
    use serde_json::json;

    #[test]
    fn generation_failure_names_flow() {
        let err = FlowError::generation(FlowName::Researcher, GenerationError::rate_limited(10));
        let body = serde_json::to_value(ErrorResponse::from_flow_error(&err)).unwrap();

        assert_eq!(body["code"], "GENERATION_FAILED");
        assert_eq!(body["flow"], "researcher");
    }

    #[test]
    fn unknown_flow_omits_flow_field() {
        let err = FlowError::UnknownFlow("nope".to_string());
        let body = serde_json::to_value(ErrorResponse::from_flow_error(&err)).unwrap();

        assert_eq!(
            body,
            json!({"code": "NOT_FOUND", "message": "unknown flow: nope"})
        );
    }
}
