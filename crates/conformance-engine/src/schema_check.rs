//! JSON Schema validation adapter.
//!
//! Structural evaluation is delegated to the `jsonschema` crate; this
//! module's value is the stable translation of its errors onto the
//! report's [`Issue`] shape. An empty result means the document is
//! fully conformant.

use conformance_core::Issue;
use serde_json::Value;
use thiserror::Error;

/// The schema document itself could not be compiled.
#[derive(Error, Debug)]
#[error("Invalid JSON Schema: {message}")]
pub struct InvalidSchema {
    message: String,
}

/// Validates response documents against JSON Schema documents.
pub struct SchemaChecker;

impl SchemaChecker {
    /// Evaluate `document` against `schema`, mapping every emitted
    /// error onto an [`Issue`]: name = violated keyword, location =
    /// document path, rule path = schema path.
    pub fn validate(document: &Value, schema: &Value) -> Result<Vec<Issue>, InvalidSchema> {
        let validator = jsonschema::validator_for(schema).map_err(|e| InvalidSchema {
            message: e.to_string(),
        })?;

        let issues = validator
            .iter_errors(document)
            .map(|error| {
                let error_at = error.schema_path.to_string();
                let keyword = error_at
                    .rsplit('/')
                    .next()
                    .filter(|k| !k.is_empty())
                    .unwrap_or("schema")
                    .to_string();
                Issue::new(keyword, error.to_string())
                    .with_description("A schema validation issue has been found")
                    .with_location(error.instance_path.to_string(), error_at)
            })
            .collect();

        Ok(issues)
    }
}
