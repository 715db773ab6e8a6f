//! Prompt Store Port - Read-only lookup of stored persona prompts.
//!
//! The store is owned by an external system. The core only reads from it,
//! keyed by a string id such as `"architect"`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for fetching prompt templates.
///
/// Implementations must be safe for concurrent reads.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Fetch the prompt stored under `id`.
    ///
    /// An empty stored text is returned as-is; callers decide how to treat it.
    async fn fetch_prompt(&self, id: &str) -> Result<PromptRecord, PromptStoreError>;
}

/// A stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    pub text: String,
}

impl PromptRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Errors from the prompt store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptStoreError {
    #[error("prompt not found: {0}")]
    NotFound(String),

    #[error("prompt {0} has empty text")]
    Empty(String),

    #[error("prompt store unavailable: {0}")]
    Unavailable(String),
}

impl PromptStoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
