use std::collections::BTreeSet;
use std::fmt;

use fieldmap_core::{CanonicalType, Canonicalized, SampleValue, TargetSchema, resolve};
use fieldmap_transform::TransformCatalog;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{MappingError, Result};

/// Identity of a mapping: one source path into one target field.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct MappingKey {
    pub source_path: String,
    pub target_name: String,
}

impl MappingKey {
    pub fn new(source_path: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_name: target_name.into(),
        }
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_path, self.target_name)
    }
}

/// Derived compatibility of a mapping after its transform chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub transformed_type: CanonicalType,
    pub compatible: bool,
    pub conversion_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Validation {
    /// Resolve an already composed type against the target.
    ///
    /// The target caveat only surfaces when the resolver has nothing to say.
    pub(crate) fn compute(
        transformed_type: CanonicalType,
        target_type: CanonicalType,
        target_caveat: Option<&str>,
    ) -> Self {
        let compatibility = resolve(transformed_type, target_type);
        let warning = match compatibility.warning {
            Some(warning) => Some(warning),
            None if compatibility.compatible => target_caveat.map(str::to_string),
            None => None,
        };
        Self {
            transformed_type,
            compatible: compatibility.compatible,
            conversion_needed: compatibility.conversion_needed,
            warning,
        }
    }

    /// Compatible without any conversion.
    pub fn is_direct(&self) -> bool {
        self.compatible && !self.conversion_needed
    }
}

/// One source path mapped onto one target field.
///
/// Fields that feed validation are private and only change through methods
/// that recompute `validation`, so the validation read back always matches
/// the current chain and types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    source_path: String,
    target_name: String,
    source_type: CanonicalType,
    target_type: CanonicalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_caveat: Option<String>,
    transformations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<SampleValue>,
    skip_if_null: bool,
    validation: Validation,
}

impl FieldMapping {
    /// A fresh mapping with an empty transform chain.
    pub fn new(key: MappingKey, source_type: CanonicalType, target: Canonicalized) -> Self {
        let target_caveat = target.caveat.map(str::to_string);
        let validation =
            Validation::compute(source_type, target.canonical, target_caveat.as_deref());
        Self {
            source_path: key.source_path,
            target_name: key.target_name,
            source_type,
            target_type: target.canonical,
            target_caveat,
            transformations: Vec::new(),
            default_value: None,
            skip_if_null: false,
            validation,
        }
    }

    /// Replace the chain; every name must exist in `catalog`.
    pub fn with_transformations(
        mut self,
        catalog: &TransformCatalog,
        transformations: Vec<String>,
    ) -> Result<Self> {
        let transformed = catalog.compose_type(self.source_type, &transformations)?;
        self.validation = Validation::compute(
            transformed,
            self.target_type,
            self.target_caveat.as_deref(),
        );
        self.transformations = transformations;
        Ok(self)
    }

    /// Point the mapping at another target field, keeping the chain.
    pub fn with_target(mut self, target_name: impl Into<String>, target: Canonicalized) -> Self {
        self.target_name = target_name.into();
        self.target_type = target.canonical;
        self.target_caveat = target.caveat.map(str::to_string);
        self.validation = Validation::compute(
            self.validation.transformed_type,
            self.target_type,
            self.target_caveat.as_deref(),
        );
        self
    }

    pub fn with_default_value(mut self, default_value: Option<SampleValue>) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_skip_if_null(mut self, skip_if_null: bool) -> Self {
        self.skip_if_null = skip_if_null;
        self
    }

    pub fn key(&self) -> MappingKey {
        MappingKey::new(&self.source_path, &self.target_name)
    }

    pub fn matches(&self, key: &MappingKey) -> bool {
        self.source_path == key.source_path && self.target_name == key.target_name
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn source_type(&self) -> CanonicalType {
        self.source_type
    }

    pub fn target_type(&self) -> CanonicalType {
        self.target_type
    }

    pub fn target_caveat(&self) -> Option<&str> {
        self.target_caveat.as_deref()
    }

    pub fn transformations(&self) -> &[String] {
        &self.transformations
    }

    pub fn default_value(&self) -> Option<&SampleValue> {
        self.default_value.as_ref()
    }

    pub fn skip_if_null(&self) -> bool {
        self.skip_if_null
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }
}

/// Ordered mappings with unique `(source_path, target_name)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MappingSet {
    mappings: Vec<FieldMapping>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMapping> {
        self.mappings.iter()
    }

    pub fn as_slice(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn position(&self, key: &MappingKey) -> Option<usize> {
        self.mappings.iter().position(|mapping| mapping.matches(key))
    }

    pub fn get(&self, key: &MappingKey) -> Option<&FieldMapping> {
        self.position(key).map(|idx| &self.mappings[idx])
    }

    pub fn contains(&self, key: &MappingKey) -> bool {
        self.position(key).is_some()
    }

    /// Append a mapping; an existing pair is a caller error.
    pub fn insert(&mut self, mapping: FieldMapping) -> Result<()> {
        let key = mapping.key();
        if self.contains(&key) {
            return Err(MappingError::DuplicateMapping(key));
        }
        self.mappings.push(mapping);
        Ok(())
    }

    /// Swap the mapping at `key` for `mapping`, keeping its position.
    pub fn replace(&mut self, key: &MappingKey, mapping: FieldMapping) -> Result<FieldMapping> {
        let idx = self
            .position(key)
            .ok_or_else(|| MappingError::UnknownMapping(key.clone()))?;
        let new_key = mapping.key();
        if &new_key != key && self.contains(&new_key) {
            return Err(MappingError::DuplicateMapping(new_key));
        }
        Ok(std::mem::replace(&mut self.mappings[idx], mapping))
    }

    pub fn remove(&mut self, key: &MappingKey) -> Result<FieldMapping> {
        let idx = self
            .position(key)
            .ok_or_else(|| MappingError::UnknownMapping(key.clone()))?;
        Ok(self.mappings.remove(idx))
    }

    /// Distinct target names that have at least one mapping.
    pub fn target_names(&self) -> BTreeSet<&str> {
        self.mappings
            .iter()
            .map(|mapping| mapping.target_name())
            .collect()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a FieldMapping;
    type IntoIter = std::slice::Iter<'a, FieldMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counts shown next to the mapping canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub total: usize,
    pub compatible: usize,
    pub conversion_needed: usize,
    pub incompatible: usize,
    pub with_transforms: usize,
    pub required_mapped: usize,
    pub required_total: usize,
}

impl MappingSummary {
    pub fn of(mappings: &[FieldMapping], schema: &TargetSchema) -> Self {
        let mut summary = MappingSummary {
            total: mappings.len(),
            ..MappingSummary::default()
        };
        for mapping in mappings {
            let validation = mapping.validation();
            if !validation.compatible {
                summary.incompatible += 1;
            } else if validation.conversion_needed {
                summary.conversion_needed += 1;
            } else {
                summary.compatible += 1;
            }
            if !mapping.transformations().is_empty() {
                summary.with_transforms += 1;
            }
        }

        let mapped: BTreeSet<&str> = mappings.iter().map(FieldMapping::target_name).collect();
        for field in schema.required_fields() {
            summary.required_total += 1;
            if mapped.contains(field.name.as_str()) {
                summary.required_mapped += 1;
            }
        }
        summary
    }
}
