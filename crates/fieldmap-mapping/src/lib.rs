//! Field mappings between a sampled source record and a target schema.
//!
//! A [`MappingEditor`] owns the mapping set and its linear undo history. Every
//! command revalidates the mappings it touches before the new state becomes
//! visible, and readers always receive owned copies.

pub mod automap;
pub mod document;
pub mod editor;
pub mod errors;
pub mod history;
pub mod model;
pub mod schema;
pub mod validate;

pub use automap::{
    AutoMapOptions, AutoMapOutcome, SkipReason, SkippedSuggestion, Suggestion, apply_suggestions,
};
pub use document::{ExplicitMapping, MappingDocument, load_document};
pub use editor::{MappingEditor, MappingUpdate};
pub use errors::{IssueSeverity, MappingError, Result, ValidationIssue, ValidationReport};
pub use history::{EditCommand, EditHistory, HistorySnapshot};
pub use model::{FieldMapping, MappingKey, MappingSet, MappingSummary, Validation};
pub use schema::{mapping_document_json_schema, validate_document_json};
pub use validate::{
    SetIssue, SetIssueCode, incompatible_mappings, set_report, validate_mapping, validate_set,
};
