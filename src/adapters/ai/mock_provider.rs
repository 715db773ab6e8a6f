//! Mock Generation Provider for testing.
//!
//! Provides a configurable mock implementation of the GenerationPort,
//! allowing tests to run without calling a real model service.
//!
//! # Features
//!
//! - Pre-configured text or structured responses (consumed in order)
//! - Error injection for failure-path testing
//! - Call tracking for verifying the exact messages and config sent
//!
//! # Example
//!
//! ```ignore
//! let provider = MockGenerationProvider::new()
//!     .with_text(r#"{"title":"T","steps":["a"]}"#)
//!     .with_text("draft");
//!
//! let result = provider.generate(messages, config).await?;
//! assert_eq!(provider.call_count(), 1);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::{MessageSequence, SchemaId};
use crate::ports::{
    GenerationConfig, GenerationError, GenerationPort, GenerationResult, ProviderInfo, TokenUsage,
};

/// Text returned once the queue is exhausted.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

/// A recorded call to the mock provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: MessageSequence,
    pub config: GenerationConfig,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return free text.
    Text(String),
    /// Return an already-parsed structured value.
    Structured { schema: SchemaId, value: Value },
    /// Return an error.
    Error(GenerationError),
}

/// Mock generation provider for testing.
#[derive(Debug, Clone)]
pub struct MockGenerationProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    info: ProviderInfo,
    delay: Duration,
}

impl Default for MockGenerationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
        }
    }

    /// Queues a text response.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Text(text.into()))
    }

    /// Queues a structured response.
    pub fn with_structured(self, schema: SchemaId, value: Value) -> Self {
        self.push(MockResponse::Structured { schema, value })
    }

    /// Queues an error response.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(response);
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock call log poisoned").len()
    }

    /// Returns all recorded calls, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Returns the most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").last().cloned()
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("mock response queue poisoned").len()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text(DEFAULT_MOCK_RESPONSE.to_string()))
    }
}

#[async_trait]
impl GenerationPort for MockGenerationProvider {
    async fn generate(
        &self,
        messages: MessageSequence,
        config: GenerationConfig,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall { messages, config });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let result = match self.next_response() {
            MockResponse::Text(text) => GenerationResult::text(text),
            MockResponse::Structured { schema, value } => {
                GenerationResult::structured(schema, value)
            }
            MockResponse::Error(err) => return Err(err),
        };

        Ok(result
            .with_usage(TokenUsage::new(10, 20))
            .with_model(self.info.model.clone()))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerationOutput;
    use serde_json::json;

    fn messages() -> MessageSequence {
        MessageSequence::assemble(None, &[], "Hello")
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let provider = MockGenerationProvider::new()
            .with_text("First")
            .with_text("Second");

        let r1 = provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap();
        let r2 = provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap();

        assert_eq!(r1.into_text(), "First");
        assert_eq!(r2.into_text(), "Second");
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let provider = MockGenerationProvider::new().with_text("Only one");

        provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap();
        let r2 = provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap();

        assert_eq!(r2.into_text(), DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn returns_structured_value() {
        let provider = MockGenerationProvider::new()
            .with_structured(SchemaId::Plan, json!({"title": "T", "steps": ["a"]}));

        let result = provider
            .generate(messages(), GenerationConfig::new(0.2))
            .await
            .unwrap();

        assert_eq!(
            result.output,
            GenerationOutput::Structured {
                schema: SchemaId::Plan,
                value: json!({"title": "T", "steps": ["a"]}),
            }
        );
        assert_eq!(result.model, "mock-model-1");
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider =
            MockGenerationProvider::new().with_error(GenerationError::unavailable("down"));

        let err = provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn records_messages_and_config() {
        let provider = MockGenerationProvider::new();
        let config = GenerationConfig::new(0.3).with_retrieval();

        provider.generate(messages(), config.clone()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        let call = provider.last_call().unwrap();
        assert_eq!(call.messages, messages());
        assert_eq!(call.config, config);
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockGenerationProvider::new().with_delay(Duration::from_millis(20));

        let start = std::time::Instant::now();
        provider
            .generate(messages(), GenerationConfig::new(0.5))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
