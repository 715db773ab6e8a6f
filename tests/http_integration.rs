//! Integration tests for the HTTP surface.
//!
//! Requests go through the full router, transport layers included.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use agent_flows::adapters::ai::MockGenerationProvider;
use agent_flows::adapters::http::{app_router, FlowsAppState};
use agent_flows::adapters::prompts::InMemoryPromptStore;
use agent_flows::adapters::validation::JsonSchemaValidator;
use agent_flows::application::{FlowDispatcher, FlowServices};
use agent_flows::config::ServerConfig;
use agent_flows::ports::{GenerationError, GenerationPort};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: &MockGenerationProvider) -> Router {
    let dispatcher = FlowDispatcher::new(FlowServices::new(
        Arc::new(provider.clone()),
        Arc::new(InMemoryPromptStore::with_builtin_personas()),
        Arc::new(JsonSchemaValidator::new()),
    ));
    let state = FlowsAppState::new(dispatcher, provider.provider_info());
    app_router(state, &ServerConfig::default())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn lists_all_flows() {
    let response = app(&MockGenerationProvider::new())
        .oneshot(Request::builder().uri("/flows").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let flows = body["flows"].as_array().unwrap();
    assert_eq!(flows.len(), 9);
    assert!(flows.contains(&json!("conductor")));
    assert!(flows.contains(&json!("component_builder")));
}

#[tokio::test]
async fn architect_returns_plan() {
    let provider = MockGenerationProvider::new()
        .with_text(r#"{"title": "Launch", "steps": ["Build", "Ship"]}"#);

    let response = app(&provider)
        .oneshot(post("/flows/architect", json!({"task": "Launch a product"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"title": "Launch", "steps": ["Build", "Ship"]})
    );
}

#[tokio::test]
async fn invalid_plan_is_bad_gateway() {
    let provider = MockGenerationProvider::new().with_text("I cannot help with that.");

    let response = app(&provider)
        .oneshot(post("/flows/architect", json!({"task": "Launch a product"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "STRUCTURED_OUTPUT_INVALID");
    assert_eq!(body["flow"], "architect");
}

#[tokio::test]
async fn generation_failure_is_bad_gateway() {
    let provider =
        MockGenerationProvider::new().with_error(GenerationError::network("connection reset"));

    let response = app(&provider)
        .oneshot(post("/flows/creator", json!({"text": "a story"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GENERATION_FAILED");
}

#[tokio::test]
async fn blank_input_is_bad_request() {
    let provider = MockGenerationProvider::new();

    let response = app(&provider)
        .oneshot(post("/flows/classifier", json!({"text": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["flow"], "classifier");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn wrong_input_shape_is_bad_request() {
    let response = app(&MockGenerationProvider::new())
        .oneshot(post("/flows/general_chat", json!({"text": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_on_flow_is_method_not_allowed() {
    let response = app(&MockGenerationProvider::new())
        .oneshot(
            Request::builder()
                .uri("/flows/creator")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
