//! Integration tests for flow dispatch.
//!
//! These tests drive the dispatcher end to end with a mock generation
//! provider and real prompt stores:
//! 1. Conductor composition through JSON
//! 2. Persona fallback across store implementations
//! 3. Assistant routing
//! 4. Concurrent requests sharing one dispatcher

use serde_json::json;
use std::sync::Arc;

use agent_flows::adapters::ai::MockGenerationProvider;
use agent_flows::adapters::prompts::{FilePromptStore, InMemoryPromptStore};
use agent_flows::adapters::validation::JsonSchemaValidator;
use agent_flows::application::{FailureKind, FlowDispatcher, FlowServices, FALLBACK_PERSONA};
use agent_flows::domain::{FlowName, Role, SchemaId};
use agent_flows::ports::{GenerationError, PromptStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn dispatcher_with(
    provider: &MockGenerationProvider,
    prompts: Arc<dyn PromptStore>,
) -> FlowDispatcher {
    FlowDispatcher::new(FlowServices::new(
        Arc::new(provider.clone()),
        prompts,
        Arc::new(JsonSchemaValidator::new()),
    ))
}

fn dispatcher(provider: &MockGenerationProvider) -> FlowDispatcher {
    dispatcher_with(provider, Arc::new(InMemoryPromptStore::with_builtin_personas()))
}

// =============================================================================
// Conductor
// =============================================================================

#[tokio::test]
async fn conductor_writes_product_brief() {
    let provider = MockGenerationProvider::new()
        .with_text(
            "```json\n{\"title\": \"Todo App Brief\", \"steps\": [\"Define audience\", \"Outline features\"]}\n```",
        )
        .with_text("Todo App Brief\n\nFor busy people. Features: lists, reminders.");

    let output = dispatcher(&provider)
        .invoke(
            "conductor",
            json!({"task": "Write a product brief for a todo app"}),
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        json!({"text": "Todo App Brief\n\nFor busy people. Features: lists, reminders."})
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    let creator_input = calls[1].messages.last_user_text();
    assert!(creator_input.contains("Todo App Brief"));
    let audience = creator_input.find("1. Define audience").unwrap();
    let features = creator_input.find("2. Outline features").unwrap();
    assert!(audience < features);
}

#[tokio::test]
async fn conductor_fails_on_invalid_plan_without_calling_creator() {
    let provider = MockGenerationProvider::new()
        .with_structured(SchemaId::Plan, json!({"title": "T", "steps": []}));

    let err = dispatcher(&provider)
        .invoke("conductor", json!({"task": "anything"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(err.flow(), Some(FlowName::Architect));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn conductor_surfaces_upstream_outage() {
    let provider = MockGenerationProvider::new()
        .with_error(GenerationError::unavailable("upstream returned 503"));

    let err = dispatcher(&provider)
        .invoke("conductor", json!({"task": "anything"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Generation);
    assert_eq!(provider.call_count(), 1);
}

// =============================================================================
// Prompt stores
// =============================================================================

#[tokio::test]
async fn file_prompts_are_used_and_missing_ones_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("editor.md"), "You are a strict copy editor.").unwrap();
    let provider = MockGenerationProvider::new()
        .with_text("edited")
        .with_text("drafted");
    let dispatcher = dispatcher_with(&provider, Arc::new(FilePromptStore::new(dir.path())));

    dispatcher
        .invoke("editor", json!({"text": "teh draft"}))
        .await
        .unwrap();
    dispatcher
        .invoke("creator", json!({"text": "a haiku"}))
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(
        calls[0].messages.system_text(),
        Some("You are a strict copy editor.")
    );
    assert_eq!(calls[1].messages.system_text(), Some(FALLBACK_PERSONA));
}

#[tokio::test]
async fn researcher_is_grounded_with_retrieval() {
    let provider = MockGenerationProvider::new().with_text("Rust 1.x was released ...");

    dispatcher(&provider)
        .invoke("researcher", json!({"text": "What's new in Rust?"}))
        .await
        .unwrap();

    assert!(provider.last_call().unwrap().config.retrieval_augmented);
}

// =============================================================================
// Assistant
// =============================================================================

#[tokio::test]
async fn assistant_routes_general_chat_with_history() {
    let provider = MockGenerationProvider::new()
        .with_text("general_chat")
        .with_text("You're welcome!");

    let output = dispatcher(&provider)
        .invoke(
            "assistant",
            json!({
                "message": "thanks!",
                "history": [
                    {"role": "user", "content": "What is 2 + 2?"},
                    {"role": "model", "content": "4"}
                ]
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        json!({
            "label": "general_chat",
            "outcome": {"status": "generated", "flow": "general_chat", "text": "You're welcome!"}
        })
    );

    let chat_call = &provider.calls()[1];
    let roles: Vec<Role> = chat_call.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
}

#[tokio::test]
async fn assistant_leaves_approvals_pending() {
    let provider = MockGenerationProvider::new().with_text("approval_request");

    let output = dispatcher(&provider)
        .invoke("assistant", json!({"message": "Approved, ship it."}))
        .await
        .unwrap();

    assert_eq!(output["outcome"]["status"], "approval_pending");
    assert_eq!(provider.call_count(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_invocations_are_independent() {
    let provider = MockGenerationProvider::new();
    let dispatcher = Arc::new(dispatcher(&provider));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher
                    .invoke("editor", json!({"text": format!("draft {}", i)}))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let output = handle.await.unwrap().unwrap();
        assert_eq!(output, json!({"text": "Mock response"}));
    }

    let mut inputs: Vec<String> = provider
        .calls()
        .iter()
        .map(|c| c.messages.last_user_text().to_string())
        .collect();
    inputs.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("draft {}", i)).collect();
    expected.sort();
    assert_eq!(inputs, expected);
}
