//! Gemini Provider - Implementation of GenerationPort for Google's Gemini API.
//!
//! Talks to the `generateContent` REST endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = GeminiProvider::new(config, Arc::new(JsonSchemaValidator::new()))?;
//! ```
//!
//! # Mapping
//!
//! - `system` messages become `systemInstruction`; `user`/`model` turns become `contents`
//! - structured output sets `responseMimeType` and a `responseSchema`
//! - retrieval augmentation enables the `google_search` tool
//!
//! Requests are sent once. Failures are mapped to [`GenerationError`] and
//! returned to the caller.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{MessageSequence, Role, SchemaId};
use crate::ports::{
    GenerationConfig, GenerationError, GenerationPort, GenerationResult, ProviderInfo,
    SchemaValidator, TokenUsage,
};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Wait applied to a 429 that carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
    schemas: Arc<dyn SchemaValidator>,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// `schemas` supplies the JSON Schema documents sent as `responseSchema`.
    pub fn new(
        config: GeminiConfig,
        schemas: Arc<dyn SchemaValidator>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            schemas,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(
        &self,
        messages: &MessageSequence,
        config: &GenerationConfig,
    ) -> GeminiRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(GeminiPart {
                    text: msg.text.clone(),
                }),
                Role::User | Role::Model => contents.push(GeminiContent {
                    role: Some(
                        match msg.role {
                            Role::Model => "model",
                            _ => "user",
                        }
                        .to_string(),
                    ),
                    parts: vec![GeminiPart {
                        text: msg.text.clone(),
                    }],
                }),
            }
        }

        let (response_mime_type, response_schema) = match config.structured_output {
            Some(schema) => (
                Some("application/json".to_string()),
                Some(to_response_schema(self.schemas.schema_for(schema))),
            ),
            None => (None, None),
        };

        let tools = if config.retrieval_augmented {
            Some(vec![GeminiTool {
                google_search: Map::new(),
            }])
        } else {
            None
        };

        GeminiRequest {
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(GeminiContent {
                    role: None,
                    parts: system_parts,
                })
            },
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature(),
                max_output_tokens: config.max_output_tokens,
                response_mime_type,
                response_schema,
            },
            tools,
        }
    }

    async fn send_request(&self, request: &GeminiRequest) -> Result<Response, GenerationError> {
        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: u32::try_from(self.config.timeout.as_secs())
                            .unwrap_or(u32::MAX),
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    async fn parse_response(
        &self,
        response: Response,
        structured: Option<SchemaId>,
    ) -> Result<GenerationResult, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, retry_after, &body));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;

        into_generation_result(body, structured, &self.config.model)
    }
}

#[async_trait]
impl GenerationPort for GeminiProvider {
    async fn generate(
        &self,
        messages: MessageSequence,
        config: GenerationConfig,
    ) -> Result<GenerationResult, GenerationError> {
        let request = self.to_gemini_request(&messages, &config);

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            structured = ?config.structured_output,
            retrieval = config.retrieval_augmented,
            "Sending Gemini generateContent request"
        );

        let response = self.send_request(&request).await?;
        self.parse_response(response, config.structured_output).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", self.config.model.clone()).with_structured_output(true)
    }
}

/// Maps a non-success HTTP status to a generation error.
fn map_error_status(status: StatusCode, retry_after: Option<u32>, body: &str) -> GenerationError {
    match status.as_u16() {
        401 | 403 => GenerationError::AuthenticationFailed,
        429 => GenerationError::rate_limited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        400 | 404 | 422 => GenerationError::InvalidRequest(error_message(body)),
        500..=599 => GenerationError::unavailable(format!("Server error {}: {}", status, error_message(body))),
        _ => GenerationError::network(format!("Unexpected status {}: {}", status, error_message(body))),
    }
}

/// Reads a delay-seconds `Retry-After` header. HTTP-date values are ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn into_generation_result(
    body: GeminiResponse,
    structured: Option<SchemaId>,
    model: &str,
) -> Result<GenerationResult, GenerationError> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::empty_completion(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::empty_completion("no candidates in response"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::empty_completion(
            candidate
                .finish_reason
                .unwrap_or_else(|| "no text in candidate".to_string()),
        ));
    }

    let usage = body
        .usage_metadata
        .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
        .unwrap_or_default();

    // A JSON body under responseMimeType is handed over already parsed; anything
    // else stays text and is left to the core's extraction.
    let result = match structured.and_then(|schema| {
        serde_json::from_str::<Value>(&text)
            .ok()
            .map(|value| (schema, value))
    }) {
        Some((schema, value)) => GenerationResult::structured(schema, value),
        None => GenerationResult::text(text),
    };

    Ok(result.with_usage(usage).with_model(model))
}

/// Converts a JSON Schema document into Gemini's OpenAPI-style `responseSchema`.
///
/// Keeps only the keywords Gemini accepts and upper-cases type names.
fn to_response_schema(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in obj {
        match key.as_str() {
            "type" => {
                if let Some(t) = value.as_str() {
                    out.insert("type".to_string(), Value::String(t.to_uppercase()));
                }
            }
            "properties" => {
                if let Some(props) = value.as_object() {
                    let converted = props
                        .iter()
                        .map(|(name, prop)| (name.clone(), to_response_schema(prop)))
                        .collect();
                    out.insert("properties".to_string(), Value::Object(converted));
                }
            }
            "items" => {
                out.insert("items".to_string(), to_response_schema(value));
            }
            "required" | "enum" | "description" | "minItems" | "maxItems" => {
                out.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    Value::Object(out)
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    google_search: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
