use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::IDENTITY_FIELDS;
use crate::canonical::{Canonicalized, canonicalize, canonicalize_detailed};
use crate::error::{Error, Result};
use crate::sample::{SampleValue, StringSubtype, detect_string_subtype};
use crate::types::{CanonicalType, OriginSystem};

/// A field addressable in the source sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceField {
    /// Dotted/indexed path into the sample (`customer.address.city`).
    pub path: String,
    /// Source-system type label (`string`, `integer`, `object`, ...).
    pub raw_type: String,
    /// Example value captured from the sample.
    pub sample_value: SampleValue,
}

impl SourceField {
    /// Capture a field from a sample value, labelling it with its JSON type.
    pub fn from_sample(path: impl Into<String>, sample_value: SampleValue) -> Self {
        Self {
            path: path.into(),
            raw_type: sample_value.type_label().to_string(),
            sample_value,
        }
    }

    pub fn canonical_type(&self) -> CanonicalType {
        canonicalize(&self.raw_type, OriginSystem::Json)
    }

    /// Display hint for string samples.
    pub fn string_subtype(&self) -> Option<StringSubtype> {
        self.sample_value.as_str().map(detect_string_subtype)
    }
}

/// Constraint attached to a target column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum FieldConstraint {
    #[serde(rename = "PRIMARY KEY", alias = "PRIMARY_KEY")]
    PrimaryKey,
    #[serde(rename = "FOREIGN KEY", alias = "FOREIGN_KEY")]
    ForeignKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "NOT NULL", alias = "NOT_NULL")]
    NotNull,
}

/// Kind of store the target schema was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Relational table: columns with SQL types, nullability, constraints.
    Relational,
    /// Document collection: fields with document types and validators.
    Document,
}

impl SchemaKind {
    pub fn origin(self) -> OriginSystem {
        match self {
            SchemaKind::Relational => OriginSystem::Sql,
            SchemaKind::Document => OriginSystem::Document,
        }
    }
}

/// A column or document field of the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetField {
    pub name: String,
    /// Target-system type label (`numeric(10,2)`, `ObjectId`, ...).
    #[serde(rename = "type", alias = "declared_type")]
    pub declared_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub constraints: BTreeSet<FieldConstraint>,
    /// Marked required by document schema validation rules.
    #[serde(default)]
    pub required: bool,
}

fn default_nullable() -> bool {
    true
}

impl TargetField {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            constraints: BTreeSet::new(),
            required: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.insert(constraint);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn resolve_type(&self, kind: SchemaKind) -> Canonicalized {
        canonicalize_detailed(&self.declared_type, kind.origin())
    }

    pub fn canonical_type(&self, kind: SchemaKind) -> CanonicalType {
        self.resolve_type(kind).canonical
    }

    /// Whether a mapping into this field is mandatory.
    pub fn is_required(&self, kind: SchemaKind) -> bool {
        match kind {
            SchemaKind::Relational => {
                !self.nullable
                    || self.constraints.contains(&FieldConstraint::PrimaryKey)
                    || self.constraints.contains(&FieldConstraint::NotNull)
            }
            SchemaKind::Document => self.required,
        }
    }

    pub fn is_identity(&self) -> bool {
        IDENTITY_FIELDS.contains(&self.name.as_str())
    }
}

/// Target schema as supplied by the external schema provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetSchema {
    pub kind: SchemaKind,
    /// Table or collection name.
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<TargetField>,
}

impl TargetSchema {
    pub fn relational(name: impl Into<String>, fields: Vec<TargetField>) -> Self {
        Self {
            kind: SchemaKind::Relational,
            name: Some(name.into()),
            fields,
        }
    }

    pub fn document(name: impl Into<String>, fields: Vec<TargetField>) -> Self {
        Self {
            kind: SchemaKind::Document,
            name: Some(name.into()),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&TargetField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TargetField> + '_ {
        self.fields
            .iter()
            .filter(move |field| field.is_required(self.kind))
    }

    /// Reject duplicate field names.
    pub fn check(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(Error::InvalidSchema("field name must not be empty".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field name: {}",
                    field.name
                )));
            }
        }
        Ok(())
    }
}
