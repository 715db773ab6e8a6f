//! Prompt store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where persona prompts are read from.
///
/// With no directory configured the built-in personas are served from memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptsConfig {
    /// Directory holding `<id>.md` prompt files
    pub directory: Option<PathBuf>,
}

impl PromptsConfig {
    /// Validate prompt store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.directory {
            Some(dir) if dir.as_os_str().is_empty() => {
                Err(ValidationError::MissingRequired("PROMPTS__DIRECTORY"))
            }
            Some(dir) if !dir.is_dir() => Err(ValidationError::PromptDirectoryNotFound(
                dir.display().to_string(),
            )),
            _ => Ok(()),
        }
    }
}
