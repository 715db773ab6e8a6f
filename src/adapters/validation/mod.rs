//! Validation Adapters - Schema validation implementations.
//!
//! Contains adapters for validating structured model output against JSON Schemas.

mod json_schema_validator;

pub use json_schema_validator::JsonSchemaValidator;
