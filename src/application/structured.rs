//! Schema-constrained output extraction.
//!
//! The one place where model output is turned into a typed value. Two tiers:
//!
//! 1. A `Structured` output is validated as-is against the requested schema.
//! 2. A `Text` output has a surrounding code fence stripped, is parsed as
//!    JSON, then validated.
//!
//! Either tier failing yields a [`StructuredOutputError`]; no partially valid
//! value is ever returned.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{parse_fenced_json, SchemaId};
use crate::ports::{GenerationOutput, SchemaValidationError, SchemaValidator};

/// Why structured output was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuredOutputError {
    #[error("output is not valid JSON: {0}")]
    Parse(String),

    #[error("output does not match schema: {0}")]
    Schema(#[from] SchemaValidationError),

    #[error("provider returned {actual:?} output, expected {expected:?}")]
    SchemaMismatch { expected: SchemaId, actual: SchemaId },

    #[error("output violates invariants: {0}")]
    Invariant(String),
}

/// Validates and decodes structured model output.
#[derive(Clone)]
pub struct StructuredOutputAdapter {
    validator: Arc<dyn SchemaValidator>,
}

impl StructuredOutputAdapter {
    pub fn new(validator: Arc<dyn SchemaValidator>) -> Self {
        Self { validator }
    }

    /// Extracts a `T` conforming to `schema` from `output`.
    pub fn extract<T: DeserializeOwned>(
        &self,
        schema: SchemaId,
        output: GenerationOutput,
    ) -> Result<T, StructuredOutputError> {
        let value = match output {
            GenerationOutput::Structured {
                schema: actual,
                value,
            } => {
                if actual != schema {
                    return Err(StructuredOutputError::SchemaMismatch {
                        expected: schema,
                        actual,
                    });
                }
                value
            }
            GenerationOutput::Text { text } => parse_fenced_json(&text)
                .map_err(|e| StructuredOutputError::Parse(e.to_string()))?,
        };

        self.validator.validate(schema, &value)?;

        serde_json::from_value(value).map_err(|e| StructuredOutputError::Invariant(e.to_string()))
    }}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::validation::JsonSchemaValidator;
    use crate::domain::Plan;
    use serde_json::json;

    fn adapter() -> StructuredOutputAdapter {
        StructuredOutputAdapter::new(Arc::new(JsonSchemaValidator::new()))
    }

    fn text(s: &str) -> GenerationOutput {
        GenerationOutput::Text {
            text: s.to_string(),
        }
    }

    fn expected_plan() -> Plan {
        Plan::new("T", vec!["a".to_string(), "b".to_string()]).unwrap()
    }

    #[test]
    fn structured_value_is_validated_and_decoded() {
        let output = GenerationOutput::Structured {
            schema: SchemaId::Plan,
            value: json!({"title": "T", "steps": ["a", "b"]}),
        };

        let plan: Plan = adapter().extract(SchemaId::Plan, output).unwrap();

        assert_eq!(plan, expected_plan());
    }

    #[test]
    fn plain_json_text_is_parsed() {
        let plan: Plan = adapter()
            .extract(SchemaId::Plan, text(r#"{"title":"T","steps":["a","b"]}"#))
            .unwrap();
        assert_eq!(plan, expected_plan());
    }

    #[test]
    fn fenced_json_text_is_parsed() {
        let plan: Plan = adapter()
            .extract(
                SchemaId::Plan,
                text("```json\n{\"title\":\"T\",\"steps\":[\"a\",\"b\"]}\n```"),
            )
            .unwrap();
        assert_eq!(plan, expected_plan());
    }

    #[test]
    fn malformed_text_is_parse_error() {
        let err = adapter()
            .extract::<Plan>(SchemaId::Plan, text("{\"title\": \"T\", \"steps\": ["))
            .unwrap_err();
        assert!(matches!(err, StructuredOutputError::Parse(_)));
    }

    #[test]
    fn structured_value_failing_schema_is_rejected() {
        let output = GenerationOutput::Structured {
            schema: SchemaId::Plan,
            value: json!({"title": "T", "steps": []}),
        };

        let err = adapter().extract::<Plan>(SchemaId::Plan, output).unwrap_err();

        assert!(matches!(err, StructuredOutputError::Schema(_)));
    }

    #[test]
    fn mismatched_schema_is_rejected() {
        let output = GenerationOutput::Structured {
            schema: SchemaId::ClassificationLabel,
            value: json!("task_request"),
        };

        let err = adapter().extract::<Plan>(SchemaId::Plan, output).unwrap_err();

        assert_eq!(
            err,
            StructuredOutputError::SchemaMismatch {
                expected: SchemaId::Plan,
                actual: SchemaId::ClassificationLabel,
            }
        );
    }
}
