//! Ports - Interfaces to external capabilities.
//!
//! The application layer depends only on these traits. Adapters implement
//! them and are injected at construction time.

mod generation;
mod prompt_store;
mod schema_validator;

pub use generation::{
    GenerationConfig, GenerationError, GenerationOutput, GenerationPort, GenerationResult,
    ProviderInfo, TokenUsage,
};
pub use prompt_store::{PromptRecord, PromptStore, PromptStoreError};
pub use schema_validator::{SchemaValidationError, SchemaValidator};
