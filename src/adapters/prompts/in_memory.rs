//! In-memory prompt store.
//!
//! Used by tests and by deployments that ship personas with the binary.
//!
//! # Example
//!
//! ```ignore
//! let store = InMemoryPromptStore::new()
//!     .with_prompt("architect", "You are a meticulous planner.");
//!
//! let record = store.fetch_prompt("architect").await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::builtin::builtin_personas;
use crate::ports::{PromptRecord, PromptStore, PromptStoreError};

/// Prompt store backed by a map.
///
/// Returns `NotFound` for unknown ids and passes empty texts through
/// unchanged.
#[derive(Debug, Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<String, String>>,
    /// Optional error to return for all lookups (for error testing)
    force_error: RwLock<Option<PromptStoreError>>,
    fetches: AtomicUsize,
}

impl InMemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the personas shipped in the binary.
    pub fn with_builtin_personas() -> Self {
        builtin_personas()
            .into_iter()
            .fold(Self::new(), |store, record| store.with_prompt(record.id, record.text))
    }

    /// Adds (or replaces) a prompt.
    pub fn with_prompt(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    /// Forces all lookups to return the specified error.
    pub fn with_error(self, error: PromptStoreError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Adds (or replaces) a prompt at runtime.
    pub fn insert(&self, id: impl Into<String>, text: impl Into<String>) {
        self.prompts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), text.into());
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of `fetch_prompt` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.prompts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.read().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn fetch_prompt(&self, id: &str) -> Result<PromptRecord, PromptStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let forced = self
            .force_error
            .read()
            .map_err(|_| PromptStoreError::unavailable("prompt store lock poisoned"))?
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        self.prompts
            .read()
            .map_err(|_| PromptStoreError::unavailable("prompt store lock poisoned"))?
            .get(id)
            .map(|text| PromptRecord::new(id, text.clone()))
            .ok_or_else(|| PromptStoreError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stored_prompt() {
        let store = InMemoryPromptStore::new().with_prompt("editor", "Tighten prose.");

        let record = store.fetch_prompt("editor").await.unwrap();

        assert_eq!(record, PromptRecord::new("editor", "Tighten prose."));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = InMemoryPromptStore::new();

        let err = store.fetch_prompt("missing").await.unwrap_err();

        assert_eq!(err, PromptStoreError::not_found("missing"));
    }

    #[tokio::test]
    async fn forced_error_is_returned_until_cleared() {
        let store = InMemoryPromptStore::new()
            .with_prompt("architect", "Plan.")
            .with_error(PromptStoreError::unavailable("offline"));

        assert!(store.fetch_prompt("architect").await.is_err());

        store.clear_error();
        assert!(store.fetch_prompt("architect").await.is_ok());
    }

    #[tokio::test]
    async fn empty_text_is_passed_through() {
        let store = InMemoryPromptStore::new().with_prompt("creator", "");

        let record = store.fetch_prompt("creator").await.unwrap();

        assert!(record.text.is_empty());
    }

    #[test]
    fn builtin_personas_are_seeded() {
        let store = InMemoryPromptStore::with_builtin_personas();
        assert_eq!(store.len(), builtin_personas().len());
        assert!(!store.is_empty());
    }
}
