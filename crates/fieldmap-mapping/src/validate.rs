use std::collections::{BTreeSet, HashSet};

use fieldmap_core::{SchemaKind, TargetField, TargetSchema};
use fieldmap_transform::TransformCatalog;
use serde::Serialize;

use crate::errors::{IssueSeverity, Result, ValidationIssue, ValidationReport};
use crate::model::FieldMapping;

/// Recompute a mapping's validation from its current chain and types.
///
/// Running this on a mapping that has not changed returns an equal mapping.
pub fn validate_mapping(
    catalog: &TransformCatalog,
    mapping: &FieldMapping,
) -> Result<FieldMapping> {
    mapping
        .clone()
        .with_transformations(catalog, mapping.transformations().to_vec())
}

/// Kind of set-level problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetIssueCode {
    RequiredFieldUnmapped,
    IdentityFieldUnmapped,
    DuplicateMapping,
}

impl SetIssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            SetIssueCode::RequiredFieldUnmapped => "required_field_unmapped",
            SetIssueCode::IdentityFieldUnmapped => "identity_field_unmapped",
            SetIssueCode::DuplicateMapping => "duplicate_mapping",
        }
    }
}

/// A completeness or consistency problem with the whole mapping set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetIssue {
    pub code: SetIssueCode,
    /// Target field the issue is about.
    pub field: String,
    pub message: String,
}

impl SetIssue {
    fn required(field: &TargetField) -> Self {
        Self {
            code: SetIssueCode::RequiredFieldUnmapped,
            field: field.name.clone(),
            message: format!("Required field \"{}\" must be mapped", field.name),
        }
    }

    fn identity(name: &str) -> Self {
        Self {
            code: SetIssueCode::IdentityFieldUnmapped,
            field: name.to_string(),
            message: format!("Primary key field \"{name}\" must be mapped"),
        }
    }
}

/// Check required-field coverage and pair uniqueness.
///
/// Issues follow schema field order, then duplicates in mapping order. Relational
/// fields are required when NOT NULL (by flag or constraint) or PRIMARY KEY.
/// Document fields are required when flagged by the collection validator, and
/// one declared identity field (`_id` or `id`) must be mapped.
pub fn validate_set(mappings: &[FieldMapping], schema: &TargetSchema) -> Vec<SetIssue> {
    let mapped: BTreeSet<&str> = mappings.iter().map(FieldMapping::target_name).collect();
    let mut issues = Vec::new();

    let identity_fields: Vec<&TargetField> = match schema.kind {
        SchemaKind::Document => schema.fields.iter().filter(|field| field.is_identity()).collect(),
        SchemaKind::Relational => Vec::new(),
    };
    let identity_satisfied = identity_fields
        .iter()
        .any(|field| mapped.contains(field.name.as_str()));

    for field in &schema.fields {
        if mapped.contains(field.name.as_str()) {
            continue;
        }
        let is_identity = schema.kind == SchemaKind::Document && field.is_identity();
        if is_identity {
            // Reported once below for the whole identity group.
            continue;
        }
        if field.is_required(schema.kind) {
            issues.push(SetIssue::required(field));
        }
    }

    if !identity_satisfied {
        // Prefer the field the validator also flags as required.
        let reported = identity_fields
            .iter()
            .find(|field| field.is_required(schema.kind))
            .or_else(|| identity_fields.first());
        if let Some(field) = reported {
            issues.push(SetIssue::identity(&field.name));
        }
    }

    let mut seen = HashSet::new();
    for mapping in mappings {
        if !seen.insert((mapping.source_path(), mapping.target_name())) {
            issues.push(SetIssue {
                code: SetIssueCode::DuplicateMapping,
                field: mapping.target_name().to_string(),
                message: format!(
                    "Source \"{}\" is mapped to \"{}\" more than once",
                    mapping.source_path(),
                    mapping.target_name()
                ),
            });
        }
    }

    issues
}

/// Mappings whose transformed type cannot land in the target.
pub fn incompatible_mappings(mappings: &[FieldMapping]) -> Vec<&FieldMapping> {
    mappings
        .iter()
        .filter(|mapping| !mapping.validation().compatible)
        .collect()
}

/// Set issues and per-mapping problems as one report.
///
/// Set issues and incompatible mappings are errors; mappings that still need a
/// conversion transform are warnings.
pub fn set_report(mappings: &[FieldMapping], schema: &TargetSchema) -> ValidationReport {
    let mut report = ValidationReport::default();

    for issue in validate_set(mappings, schema) {
        let hint = match issue.code {
            SetIssueCode::DuplicateMapping => {
                Some("remove one of the duplicate mappings".to_string())
            }
            _ => Some(format!("map a source field onto \"{}\"", issue.field)),
        };
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            issue.code.as_str(),
            format!("/fields/{}", issue.field),
            issue.message,
            hint,
        ));
    }

    for (idx, mapping) in mappings.iter().enumerate() {
        let validation = mapping.validation();
        let path = format!("/mappings/{idx}");
        let message = format!(
            "{}: {}",
            mapping.key(),
            validation.warning.as_deref().unwrap_or("no warning")
        );
        if !validation.compatible {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "incompatible_mapping",
                path,
                message,
                None,
            ));
        } else if validation.conversion_needed {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "conversion_needed",
                path,
                message,
                Some("add the named transform to the mapping chain".to_string()),
            ));
        } else if validation.warning.is_some() {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "target_caveat",
                path,
                message,
                None,
            ));
        }
    }

    report
}
