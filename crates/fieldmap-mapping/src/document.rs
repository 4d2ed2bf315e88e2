use fieldmap_core::TargetSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::automap::Suggestion;
use crate::errors::{MappingError, Result};
use crate::schema::validate_document_json;

/// Everything needed to reconstruct a mapping session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MappingDocument {
    /// Target table or collection.
    pub target: TargetSchema,
    /// Source record sampled from the API response.
    pub sample: Value,
    /// Scored suggestions from an external matcher.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    /// Mappings applied after auto-mapping, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<ExplicitMapping>,
}

/// A user-authored mapping inside a document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExplicitMapping {
    pub source_path: String,
    pub target_name: String,
    /// Transform names applied left to right.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub skip_if_null: bool,
}

/// Structurally validate and then parse a mapping document.
pub fn load_document(document: &Value) -> Result<MappingDocument> {
    let report = validate_document_json(document)?;
    if !report.is_ok() {
        return Err(MappingError::InvalidDocument(report));
    }
    Ok(serde_json::from_value(document.clone())?)
}
