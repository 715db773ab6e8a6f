//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Generation providers (Gemini, mock)
//! - `prompts` - Prompt stores (file, in-memory)
//! - `validation` - JSON Schema validation of structured output
//! - `http` - REST surface over the flow dispatcher

pub mod ai;
pub mod http;
pub mod prompts;
pub mod validation;

pub use ai::{GeminiConfig, GeminiProvider, MockGenerationProvider};
pub use prompts::{FilePromptStore, InMemoryPromptStore};
pub use validation::JsonSchemaValidator;
