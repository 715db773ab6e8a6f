//! Schema Validator Port - Structured output validation interface.
//!
//! Flows that demand structured model output depend on this trait to check a
//! candidate value before trusting it. Adapters (like `JsonSchemaValidator`)
//! provide the implementation.

use serde_json::Value;
use thiserror::Error;

use crate::domain::SchemaId;

/// Port for validating values against declared schemas.
///
/// # Contract
///
/// Implementations must:
/// - Know every [`SchemaId`]
/// - Reject missing required fields and wrong types
/// - Enforce non-emptiness constraints (`minLength`, `minItems`)
/// - Reject line breaks in single-line text fields
/// - Enforce closed enumerations exactly (case-sensitive)
pub trait SchemaValidator: Send + Sync {
    /// Validate `value` against the schema named by `schema`.
    fn validate(&self, schema: SchemaId, value: &Value) -> Result<(), SchemaValidationError>;

    /// Get the raw JSON Schema document for `schema`.
    ///
    /// Passed to the generation port when requesting structured output.
    fn schema_for(&self, schema: SchemaId) -> &Value;
}

/// Errors that can occur during schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Field {field} must not be empty")]
    EmptyString { field: String },

    #[error("Field {field} must be a single line")]
    MultiLine { field: String },

    #[error("Invalid value for field {field}: {value:?} is not one of {allowed:?}")]
    NotInEnum {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<SchemaValidationError>),
}

impl SchemaValidationError {
    /// Get the count of validation errors.
    pub fn error_count(&self) -> usize {
        match self {
            SchemaValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    /// Collapses a non-empty error list into one error.
    pub fn collect(mut errors: Vec<SchemaValidationError>) -> Option<SchemaValidationError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(SchemaValidationError::Multiple(errors)),
        }
    }
}
