//! JSON Schema Validator - Implementation of SchemaValidator.
//!
//! Uses manual validation against embedded JSON Schema definitions.
//! Schemas are embedded in the binary via `include_str!`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::{ClassificationLabel, SchemaId};
use crate::ports::{SchemaValidationError, SchemaValidator};

/// Static storage for raw schemas (for `schema_for`).
static RAW_SCHEMAS: Lazy<HashMap<SchemaId, Value>> = Lazy::new(|| {
    SchemaId::ALL
        .into_iter()
        .map(|id| (id, JsonSchemaValidator::load_raw_schema(id)))
        .collect()
});

/// JSON Schema-based validator implementation.
///
/// This struct is `Send + Sync` and can be shared across requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }

    fn load_raw_schema(id: SchemaId) -> Value {
        let schema_str = match id {
            SchemaId::Plan => include_str!("../../domain/schemas/plan.json"),
            SchemaId::ClassificationLabel => {
                include_str!("../../domain/schemas/classification_label.json")
            }
        };

        serde_json::from_str(schema_str)
            .unwrap_or_else(|e| panic!("Failed to parse schema for {:?}: {}", id, e))
    }

    fn validate_plan(&self, output: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(output, "root")?;
        let mut errors = Vec::new();

        if let Err(e) = self.require_single_line_string(obj, "title") {
            errors.push(e);
        }

        match obj.get("steps") {
            None => errors.push(SchemaValidationError::MissingRequired {
                field: "steps".to_string(),
            }),
            Some(Value::Array(steps)) => {
                if steps.is_empty() {
                    errors.push(SchemaValidationError::ArrayTooShort {
                        field: "steps".to_string(),
                        min: 1,
                        actual: 0,
                    });
                }
                for (i, step) in steps.iter().enumerate() {
                    let field = format!("steps[{}]", i);
                    match step.as_str() {
                        None => errors.push(SchemaValidationError::InvalidType {
                            field,
                            expected: "string".to_string(),
                            actual: Self::type_name(step),
                        }),
                        Some(s) if s.trim().is_empty() => {
                            errors.push(SchemaValidationError::EmptyString { field })
                        }
                        Some(s) if Self::is_multi_line(s) => {
                            errors.push(SchemaValidationError::MultiLine { field })
                        }
                        Some(_) => {}
                    }
                }
            }
            Some(other) => errors.push(SchemaValidationError::InvalidType {
                field: "steps".to_string(),
                expected: "array".to_string(),
                actual: Self::type_name(other),
            }),
        }

        match SchemaValidationError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn validate_label(&self, output: &Value) -> Result<(), SchemaValidationError> {
        let allowed: Vec<&str> = ClassificationLabel::ALL.iter().map(|l| l.as_str()).collect();
        self.validate_enum(output, &allowed, "root")
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_object<'a>(
        &self,
        value: &'a Value,
        path: &str,
    ) -> Result<&'a Map<String, Value>, SchemaValidationError> {
        value.as_object().ok_or_else(|| SchemaValidationError::InvalidType {
            field: path.to_string(),
            expected: "object".to_string(),
            actual: Self::type_name(value),
        })
    }

    fn require_non_empty_string(
        &self,
        obj: &Map<String, Value>,
        field: &str,
    ) -> Result<(), SchemaValidationError> {
        let val = obj
            .get(field)
            .ok_or_else(|| SchemaValidationError::MissingRequired {
                field: field.to_string(),
            })?;
        let s = val.as_str().ok_or_else(|| SchemaValidationError::InvalidType {
            field: field.to_string(),
            expected: "string".to_string(),
            actual: Self::type_name(val),
        })?;
        if s.trim().is_empty() {
            return Err(SchemaValidationError::EmptyString {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    fn require_single_line_string(
        &self,
        obj: &Map<String, Value>,
        field: &str,
    ) -> Result<(), SchemaValidationError> {
        self.require_non_empty_string(obj, field)?;
        match obj.get(field).and_then(Value::as_str) {
            Some(s) if Self::is_multi_line(s) => Err(SchemaValidationError::MultiLine {
                field: field.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn is_multi_line(s: &str) -> bool {
        s.contains(['\n', '\r'])
    }

    fn validate_enum(
        &self,
        value: &Value,
        valid_values: &[&str],
        path: &str,
    ) -> Result<(), SchemaValidationError> {
        let s = value.as_str().ok_or_else(|| SchemaValidationError::InvalidType {
            field: path.to_string(),
            expected: "string".to_string(),
            actual: Self::type_name(value),
        })?;
        if !valid_values.contains(&s) {
            return Err(SchemaValidationError::NotInEnum {
                field: path.to_string(),
                value: s.to_string(),
                allowed: valid_values.iter().map(|v| v.to_string()).collect(),
            });
        }
        Ok(())
    }

    fn type_name(value: &Value) -> String {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
        .to_string()
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: SchemaId, value: &Value) -> Result<(), SchemaValidationError> {
        match schema {
            SchemaId::Plan => self.validate_plan(value),
            SchemaId::ClassificationLabel => self.validate_label(value),
        }
    }

    fn schema_for(&self, schema: SchemaId) -> &Value {
        RAW_SCHEMAS
            .get(&schema)
            .unwrap_or_else(|| panic!("Schema not loaded for {:?}", schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> JsonSchemaValidator {
        JsonSchemaValidator::new()
    }

    #[test]
    fn all_schemas_load() {
        for id in SchemaId::ALL {
            assert!(validator().schema_for(id).is_object());
        }
    }

    #[test]
    fn plan_schema_declares_required_fields() {
        let validator = validator();
        let schema = validator.schema_for(SchemaId::Plan);
        assert_eq!(schema["required"], json!(["title", "steps"]));
    }

    #[test]
    fn valid_plan_passes() {
        let plan = json!({"title": "T", "steps": ["a", "b"]});
        assert!(validator().validate(SchemaId::Plan, &plan).is_ok());
    }

    #[test]
    fn plan_with_extra_fields_passes() {
        let plan = json!({"title": "T", "steps": ["a"], "notes": "ignored"});
        assert!(validator().validate(SchemaId::Plan, &plan).is_ok());
    }

    #[test]
    fn plan_missing_steps_fails() {
        let err = validator()
            .validate(SchemaId::Plan, &json!({"title": "T"}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::MissingRequired {
                field: "steps".to_string()
            }
        );
    }

    #[test]
    fn plan_with_empty_steps_fails() {
        let err = validator()
            .validate(SchemaId::Plan, &json!({"title": "T", "steps": []}))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::ArrayTooShort { min: 1, .. }));
    }

    #[test]
    fn plan_with_multi_line_title_fails() {
        let err = validator()
            .validate(SchemaId::Plan, &json!({"title": "T\nU", "steps": ["a"]}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::MultiLine {
                field: "title".to_string()
            }
        );
    }

    #[test]
    fn plan_with_multi_line_step_fails() {
        let plan = json!({"title": "T", "steps": ["a\n2. injected", "b"]});
        let err = validator().validate(SchemaId::Plan, &plan).unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::MultiLine {
                field: "steps[0]".to_string()
            }
        );
    }

    #[test]
    fn plan_with_non_string_step_fails() {
        let err = validator()
            .validate(SchemaId::Plan, &json!({"title": "T", "steps": ["a", 2]}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::InvalidType {
                field: "steps[1]".to_string(),
                expected: "string".to_string(),
                actual: "number".to_string(),
            }
        );
    }

    #[test]
    fn plan_collects_multiple_errors() {
        let err = validator()
            .validate(SchemaId::Plan, &json!({"title": "", "steps": "a"}))
            .unwrap_err();
        assert_eq!(err.error_count(), 2);
    }

    #[test]
    fn plan_must_be_object() {
        let err = validator()
            .validate(SchemaId::Plan, &json!(["a"]))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::InvalidType { .. }));
    }

    #[test]
    fn known_label_passes() {
        assert!(validator()
            .validate(SchemaId::ClassificationLabel, &json!("task_request"))
            .is_ok());
    }

    #[test]
    fn unknown_label_fails() {
        let err = validator()
            .validate(SchemaId::ClassificationLabel, &json!("Task_Request"))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::NotInEnum { .. }));
    }
}
