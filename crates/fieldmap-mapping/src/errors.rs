use fieldmap_transform::CatalogError;
use thiserror::Error;

use crate::model::MappingKey;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    /// Lowercase label used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        }
    }
}

/// Structured validation issue with location and hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
    pub hint: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            hint,
        }
    }
}

/// Errors and warnings collected from one validation pass over a document or
/// a mapping set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error issue.
    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// Add a warning issue.
    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }
}

/// Caller contract breaches and document loading failures.
///
/// A command that returns one of these leaves the editor untouched.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("mapping {0} already exists")]
    DuplicateMapping(MappingKey),
    #[error("no mapping {0}")]
    UnknownMapping(MappingKey),
    #[error("unknown source field '{0}'")]
    UnknownSource(String),
    #[error("unknown target field '{0}'")]
    UnknownTarget(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("transform position {position} is out of range for a chain of {len}")]
    TransformPosition { position: usize, len: usize },
    #[error("invalid target schema: {0}")]
    Schema(#[from] fieldmap_core::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("json schema error: {0}")]
    JsonSchema(String),
    #[error("mapping document has {} structural error(s)", .0.errors.len())]
    InvalidDocument(ValidationReport),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
