//! File-backed prompt store.
//!
//! Reads persona prompts from markdown files in a single directory:
//!
//! ```text
//! {base_path}/
//! ├── architect.md
//! ├── creator.md
//! └── editor.md
//! ```
//!
//! Ids are restricted to lowercase ASCII letters, digits, `_` and `-`, so an
//! id can never address a file outside `base_path`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::ports::{PromptRecord, PromptStore, PromptStoreError};

/// Maximum prompt file size accepted (256 KB).
const MAX_PROMPT_BYTES: u64 = 256 * 1024;

/// Prompt store reading `<id>.md` files from a directory.
#[derive(Debug, Clone)]
pub struct FilePromptStore {
    base_path: PathBuf,
}

impl FilePromptStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
    }

    fn prompt_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.md", id))
    }
}

#[async_trait]
impl PromptStore for FilePromptStore {
    async fn fetch_prompt(&self, id: &str) -> Result<PromptRecord, PromptStoreError> {
        if !Self::is_valid_id(id) {
            return Err(PromptStoreError::not_found(id));
        }

        let path = self.prompt_path(id);
        let metadata = fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PromptStoreError::not_found(id),
            _ => PromptStoreError::unavailable(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            )),
        })?;

        if !metadata.is_file() {
            return Err(PromptStoreError::not_found(id));
        }
        if metadata.len() > MAX_PROMPT_BYTES {
            return Err(PromptStoreError::unavailable(format!(
                "Prompt file {} exceeds {} bytes",
                path.display(),
                MAX_PROMPT_BYTES
            )));
        }

        let text = fs::read_to_string(&path).await.map_err(|e| {
            PromptStoreError::unavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!(prompt_id = id, bytes = text.len(), "Loaded prompt from file");
        Ok(PromptRecord::new(id, text))
    }
}
