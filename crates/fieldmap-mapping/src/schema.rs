use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::document::MappingDocument;
use crate::errors::{IssueSeverity, MappingError, Result, ValidationIssue, ValidationReport};

/// Emit the JSON Schema for mapping documents.
pub fn mapping_document_json_schema() -> RootSchema {
    schema_for!(MappingDocument)
}

/// Validate a raw document against the mapping document JSON Schema.
pub fn validate_document_json(document: &Value) -> Result<ValidationReport> {
    let schema = serde_json::to_value(mapping_document_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| MappingError::JsonSchema(err.to_string()))?;

    let mut report = ValidationReport::default();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }
    Ok(report)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
