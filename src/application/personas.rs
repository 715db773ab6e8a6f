//! Persona resolution with a fixed fallback.
//!
//! A missing or misconfigured prompt degrades a flow's specialization; it
//! never fails the request. Any store error, or a stored text that is blank,
//! resolves to [`FALLBACK_PERSONA`] and is logged as a warning. There are no
//! retries.

use std::sync::Arc;

use thiserror::Error;

use crate::ports::{PromptStore, PromptStoreError};

/// Persona used whenever a stored prompt cannot be obtained.
pub const FALLBACK_PERSONA: &str = "You are a helpful, knowledgeable assistant. \
Answer the user's request clearly, accurately, and completely.";

/// A stored prompt could not be used.
///
/// Recovered locally by substituting [`FALLBACK_PERSONA`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prompt {id} unavailable: {cause}")]
pub struct PromptUnavailable {
    pub id: String,
    pub cause: PromptStoreError,
}

/// Where a resolved persona came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaSource {
    Stored,
    Fallback(PromptUnavailable),
}

/// A system prompt ready to be sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: String,
    pub text: String,
    pub source: PersonaSource,
}

impl Persona {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PersonaSource::Fallback(_))
    }
}

/// Resolves persona prompts through the prompt store port.
#[derive(Clone)]
pub struct PersonaResolver {
    store: Arc<dyn PromptStore>,
}

impl PersonaResolver {
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self { store }
    }

    /// Fetches the persona stored under `id`, or the fallback persona.
    pub async fn resolve(&self, id: &str) -> Persona {
        let cause = match self.store.fetch_prompt(id).await {
            Ok(record) if !record.text.trim().is_empty() => {
                tracing::debug!(prompt_id = id, "Resolved stored persona");
                return Persona {
                    id: record.id,
                    text: record.text,
                    source: PersonaSource::Stored,
                };
            }
            Ok(_) => PromptStoreError::Empty(id.to_string()),
            Err(e) => e,
        };

        let unavailable = PromptUnavailable {
            id: id.to_string(),
            cause,
        };
        tracing::warn!(
            prompt_id = id,
            error = %unavailable,
            "Prompt unavailable, using fallback persona"
        );

        Persona {
            id: id.to_string(),
            text: FALLBACK_PERSONA.to_string(),
            source: PersonaSource::Fallback(unavailable),
        }
    }
}
