//! Generation Port - Interface for language-model invocation.
//!
//! Every flow talks to the model through this port. The port receives an
//! ordered, role-tagged [`MessageSequence`] and an immutable
//! [`GenerationConfig`] and yields either free text or a structured value.
//!
//! # Design
//!
//! - Provider-agnostic message format (`system`, `user`, `model` roles)
//! - Output is a tagged variant: `Text` or `Structured { schema, value }`
//! - The core never retries; a `GenerationError` becomes a flow failure
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl GenerationPort for EchoProvider {
//!     async fn generate(
//!         &self,
//!         messages: MessageSequence,
//!         _config: GenerationConfig,
//!     ) -> Result<GenerationResult, GenerationError> {
//!         Ok(GenerationResult::text(messages.last_user_text()))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{MessageSequence, SchemaId};

/// Port for language-model generation.
///
/// Implementations connect to an upstream model service and translate
/// between its wire format and these types.
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Generate a completion for the given conversation.
    ///
    /// Fails with [`GenerationError`] if the service is unreachable, rejects
    /// the request, or returns no completion.
    async fn generate(
        &self,
        messages: MessageSequence,
        config: GenerationConfig,
    ) -> Result<GenerationResult, GenerationError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Per-call generation settings. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    /// Sampling temperature in `[0, 1]`.
    temperature: f32,
    /// Schema the output must conform to, if structured output is wanted.
    pub structured_output: Option<SchemaId>,
    /// Ground the completion with web retrieval.
    pub retrieval_augmented: bool,
    /// Upper bound on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Creates a config with the given temperature, clamped to `[0, 1]`.
    pub fn new(temperature: f32) -> Self {
        let temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(0.0, 1.0)
        };
        Self {
            temperature,
            structured_output: None,
            retrieval_augmented: false,
            max_output_tokens: None,
        }
    }

    /// Temperature 0.0, for categorical choices.
    pub fn deterministic() -> Self {
        Self::new(0.0)
    }

    /// Requests output conforming to `schema`.
    pub fn with_structured_output(mut self, schema: SchemaId) -> Self {
        self.structured_output = Some(schema);
        self
    }

    /// Enables retrieval augmentation.
    pub fn with_retrieval(mut self) -> Self {
        self.retrieval_augmented = true;
        self
    }

    /// Sets the maximum number of output tokens.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// What the model produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationOutput {
    /// Free text (possibly fenced JSON when structured output was requested).
    Text { text: String },
    /// A parsed value the provider claims conforms to `schema`.
    Structured { schema: SchemaId, value: Value },
}

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub output: GenerationOutput,
    /// Token usage, when the provider reports it.
    pub usage: TokenUsage,
    /// Model that produced the output.
    pub model: String,
}

impl GenerationResult {
    /// Creates a text result with zero usage.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            output: GenerationOutput::Text { text: text.into() },
            usage: TokenUsage::zero(),
            model: String::new(),
        }
    }

    /// Creates a structured result with zero usage.
    pub fn structured(schema: SchemaId, value: Value) -> Self {
        Self {
            output: GenerationOutput::Structured { schema, value },
            usage: TokenUsage::zero(),
            model: String::new(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The text form of the output.
    ///
    /// Structured values are rendered as compact JSON.
    pub fn text_output(&self) -> String {
        match &self.output {
            GenerationOutput::Text { text } => text.clone(),
            GenerationOutput::Structured { value, .. } => value.to_string(),
        }
    }

    /// Consumes the result, returning its text form.
    pub fn into_text(self) -> String {
        match self.output {
            GenerationOutput::Text { text } => text,
            GenerationOutput::Structured { value, .. } => value.to_string(),
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "mock").
    pub name: String,
    /// Model identifier (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Whether the provider can enforce a response schema itself.
    pub supports_structured_output: bool,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            supports_structured_output: false,
        }
    }

    pub fn with_structured_output(mut self, supports: bool) -> Self {
        self.supports_structured_output = supports;
        self
    }
}

/// Generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered but produced no completion.
    #[error("empty completion: {reason}")]
    EmptyCompletion {
        /// Why no completion was produced (e.g. finish reason).
        reason: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl GenerationError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn empty_completion(reason: impl Into<String>) -> Self {
        Self::EmptyCompletion {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True when the upstream service could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}
