//! HTTP handlers for flow endpoints.
//!
//! Thin transport: decode the body, hand it to the dispatcher, map the
//! outcome to a status code.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::application::{FailureKind, FlowDispatcher, FlowError};
use crate::ports::ProviderInfo;

use super::dto::{ErrorResponse, FlowListResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct FlowsAppState {
    pub dispatcher: Arc<FlowDispatcher>,
    pub provider: ProviderInfo,
}

impl FlowsAppState {
    pub fn new(dispatcher: FlowDispatcher, provider: ProviderInfo) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            provider,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health(State(state): State<FlowsAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name.clone(),
        model: state.provider.model.clone(),
        structured_output: state.provider.supports_structured_output,
    })
}

/// GET /flows
pub async fn list_flows(State(state): State<FlowsAppState>) -> impl IntoResponse {
    Json(FlowListResponse {
        flows: state.dispatcher.flow_names().to_vec(),
    })
}

/// POST /flows/:name - Run a flow
pub async fn invoke_flow(
    State(state): State<FlowsAppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, FlowApiError> {
    let Json(input) = body.map_err(|e| FlowApiError::BadRequest(e.body_text()))?;
    let output = state.dispatcher.invoke(&name, input).await?;
    Ok(Json(output))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts flow errors to HTTP responses.
#[derive(Debug)]
pub enum FlowApiError {
    /// The request body was not a JSON document.
    BadRequest(String),
    Flow(FlowError),
}

impl From<FlowError> for FlowApiError {
    fn from(err: FlowError) -> Self {
        FlowApiError::Flow(err)
    }
}

impl IntoResponse for FlowApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            FlowApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::invalid_input(msg))
            }
            FlowApiError::Flow(err) => {
                let status = match err.kind() {
                    FailureKind::Input => StatusCode::BAD_REQUEST,
                    FailureKind::NotFound => StatusCode::NOT_FOUND,
                    FailureKind::Generation | FailureKind::Validation => StatusCode::BAD_GATEWAY,
                    FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, ErrorResponse::from_flow_error(&err))
            }
        };

        (status, Json(error)).into_response()
    }
}
