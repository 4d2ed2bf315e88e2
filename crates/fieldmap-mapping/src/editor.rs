use fieldmap_core::{SampleValue, SourceField, TargetSchema, flatten_sample};
use fieldmap_transform::{Preview, TransformCatalog};
use tracing::{debug, info};

use crate::automap::{AutoMapOptions, AutoMapOutcome, Suggestion, apply_suggestions};
use crate::document::MappingDocument;
use crate::errors::{MappingError, Result, ValidationReport};
use crate::history::{EditCommand, EditHistory, HistorySnapshot};
use crate::model::{FieldMapping, MappingKey, MappingSet, MappingSummary};
use crate::validate::{SetIssue, incompatible_mappings, set_report, validate_set};

/// Field changes applied by [`MappingEditor::update_mapping`].
///
/// `None` leaves the corresponding field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingUpdate {
    pub transformations: Option<Vec<String>>,
    pub default_value: Option<Option<SampleValue>>,
    pub skip_if_null: Option<bool>,
    pub target_name: Option<String>,
}

impl MappingUpdate {
    pub fn transformations(mut self, transformations: Vec<String>) -> Self {
        self.transformations = Some(transformations);
        self
    }

    pub fn default_value(mut self, default_value: Option<SampleValue>) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn skip_if_null(mut self, skip_if_null: bool) -> Self {
        self.skip_if_null = Some(skip_if_null);
        self
    }

    pub fn retarget(mut self, target_name: impl Into<String>) -> Self {
        self.target_name = Some(target_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &MappingUpdate::default()
    }
}

/// Editing session over one source sample and one target schema.
///
/// Every successful command pushes exactly one history snapshot. A command
/// that fails returns the error and leaves the mappings and history as they
/// were.
#[derive(Debug)]
pub struct MappingEditor<'c> {
    catalog: &'c TransformCatalog,
    schema: TargetSchema,
    sources: Vec<SourceField>,
    options: AutoMapOptions,
    history: EditHistory,
}

impl<'c> MappingEditor<'c> {
    pub fn new(
        catalog: &'c TransformCatalog,
        schema: TargetSchema,
        sources: Vec<SourceField>,
    ) -> Result<Self> {
        schema.check()?;
        Ok(Self {
            catalog,
            schema,
            sources,
            options: AutoMapOptions::default(),
            history: EditHistory::new(),
        })
    }

    pub fn with_options(mut self, options: AutoMapOptions) -> Self {
        self.options = options;
        self
    }

    /// Build an editor from a parsed mapping document.
    ///
    /// Suggestions are applied as one auto-map command, then each explicit
    /// mapping as one create (or update, when auto-map already produced the pair).
    pub fn from_document(
        catalog: &'c TransformCatalog,
        document: MappingDocument,
        options: AutoMapOptions,
    ) -> Result<Self> {
        let sample = SampleValue::from(document.sample);
        let mut editor =
            Self::new(catalog, document.target, flatten_sample(&sample))?.with_options(options);

        if !document.suggestions.is_empty() {
            editor.auto_map(&document.suggestions);
        }

        for explicit in document.mappings {
            let key = MappingKey::new(explicit.source_path, explicit.target_name);
            let update = MappingUpdate {
                transformations: Some(explicit.transformations),
                default_value: Some(explicit.default_value.map(SampleValue::from)),
                skip_if_null: Some(explicit.skip_if_null),
                target_name: None,
            };
            if editor.current().contains(&key) {
                editor.update_mapping(&key, update)?;
            } else {
                editor.create_with(key, update)?;
            }
        }

        Ok(editor)
    }

    pub fn create_mapping(
        &mut self,
        source_path: &str,
        target_name: &str,
    ) -> Result<MappingKey> {
        let key = MappingKey::new(source_path, target_name);
        self.create_with(key.clone(), MappingUpdate::default())?;
        Ok(key)
    }

    pub fn update_mapping(&mut self, key: &MappingKey, update: MappingUpdate) -> Result<()> {
        let current = self
            .current()
            .get(key)
            .cloned()
            .ok_or_else(|| MappingError::UnknownMapping(key.clone()))?;
        let updated = self.apply_update(current, update)?;
        let mut mappings = self.current().clone();
        mappings.replace(key, updated)?;
        self.commit(EditCommand::UpdateMapping, mappings);
        Ok(())
    }

    /// Append a transform to a mapping's chain.
    ///
    /// Returns `false`, without recording a command, when the chain already
    /// contains it.
    pub fn add_transform(&mut self, key: &MappingKey, name: &str) -> Result<bool> {
        self.catalog.require(name)?;
        let mapping = self.mapping_for(key)?;
        if mapping.transformations().iter().any(|existing| existing == name) {
            debug!(mapping = %key, transform = name, "transform already in chain");
            return Ok(false);
        }
        let mut chain = mapping.transformations().to_vec();
        chain.push(name.to_string());
        self.update_mapping(key, MappingUpdate::default().transformations(chain))?;
        Ok(true)
    }

    /// Remove the transform at `position` and return its name.
    pub fn remove_transform(&mut self, key: &MappingKey, position: usize) -> Result<String> {
        let mapping = self.mapping_for(key)?;
        let len = mapping.transformations().len();
        if position >= len {
            return Err(MappingError::TransformPosition { position, len });
        }
        let mut chain = mapping.transformations().to_vec();
        let removed = chain.remove(position);
        self.update_mapping(key, MappingUpdate::default().transformations(chain))?;
        Ok(removed)
    }

    pub fn delete_mapping(&mut self, key: &MappingKey) -> Result<FieldMapping> {
        let mut mappings = self.current().clone();
        let removed = mappings.remove(key)?;
        self.commit(EditCommand::DeleteMapping, mappings);
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.commit(EditCommand::ClearAll, MappingSet::new());
    }

    /// Replace the mapping set with the suggestions that clear the threshold.
    pub fn auto_map(&mut self, suggestions: &[Suggestion]) -> AutoMapOutcome {
        let (mappings, outcome) =
            apply_suggestions(&self.sources, &self.schema, suggestions, &self.options);
        self.commit(EditCommand::AutoMap, mappings);
        outcome
    }

    pub fn undo(&mut self) -> Option<MappingSet> {
        let snapshot = self.history.undo()?;
        info!(command = snapshot.command.as_str(), "undo");
        Some(snapshot.mappings.clone())
    }

    pub fn redo(&mut self) -> Option<MappingSet> {
        let snapshot = self.history.redo()?;
        info!(command = snapshot.command.as_str(), "redo");
        Some(snapshot.mappings.clone())
    }

    /// Owned copy of the current mapping set.
    pub fn mappings(&self) -> MappingSet {
        self.current().clone()
    }

    pub fn mapping(&self, key: &MappingKey) -> Option<FieldMapping> {
        self.current().get(key).cloned()
    }

    pub fn set_issues(&self) -> Vec<SetIssue> {
        validate_set(self.current().as_slice(), &self.schema)
    }

    /// Owned copies of the mappings whose result cannot land in the target.
    pub fn incompatible_mappings(&self) -> Vec<FieldMapping> {
        incompatible_mappings(self.current().as_slice())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn report(&self) -> ValidationReport {
        set_report(self.current().as_slice(), &self.schema)
    }

    pub fn summary(&self) -> MappingSummary {
        MappingSummary::of(self.current().as_slice(), &self.schema)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &[HistorySnapshot] {
        self.history.snapshots()
    }

    /// Simulate the mapping's chain on its source sample.
    pub fn preview(&self, key: &MappingKey) -> Result<Preview> {
        let mapping = self.mapping_for(key)?;
        let source = self.source(mapping.source_path())?;
        Ok(self.catalog.preview(
            mapping.source_type(),
            mapping.transformations(),
            &source.sample_value,
        ))
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    pub fn sources(&self) -> &[SourceField] {
        &self.sources
    }

    pub fn catalog(&self) -> &'c TransformCatalog {
        self.catalog
    }

    fn current(&self) -> &MappingSet {
        &self.history.current().mappings
    }

    fn mapping_for(&self, key: &MappingKey) -> Result<&FieldMapping> {
        self.current()
            .get(key)
            .ok_or_else(|| MappingError::UnknownMapping(key.clone()))
    }

    fn source(&self, path: &str) -> Result<&SourceField> {
        self.sources
            .iter()
            .find(|source| source.path == path)
            .ok_or_else(|| MappingError::UnknownSource(path.to_string()))
    }

    fn create_with(&mut self, key: MappingKey, update: MappingUpdate) -> Result<()> {
        if self.current().contains(&key) {
            return Err(MappingError::DuplicateMapping(key));
        }
        let source_type = self.source(&key.source_path)?.canonical_type();
        let target = self
            .schema
            .field(&key.target_name)
            .ok_or_else(|| MappingError::UnknownTarget(key.target_name.clone()))?
            .resolve_type(self.schema.kind);

        let mapping = FieldMapping::new(key, source_type, target);
        let mapping = self.apply_update(mapping, update)?;
        let mut mappings = self.current().clone();
        mappings.insert(mapping)?;
        self.commit(EditCommand::CreateMapping, mappings);
        Ok(())
    }

    fn apply_update(
        &self,
        mut mapping: FieldMapping,
        update: MappingUpdate,
    ) -> Result<FieldMapping> {
        if let Some(target_name) = update.target_name {
            let target = self
                .schema
                .field(&target_name)
                .ok_or_else(|| MappingError::UnknownTarget(target_name.clone()))?
                .resolve_type(self.schema.kind);
            mapping = mapping.with_target(target_name, target);
        }
        if let Some(transformations) = update.transformations {
            mapping = mapping.with_transformations(self.catalog, transformations)?;
        }
        if let Some(default_value) = update.default_value {
            mapping = mapping.with_default_value(default_value);
        }
        if let Some(skip_if_null) = update.skip_if_null {
            mapping = mapping.with_skip_if_null(skip_if_null);
        }
        Ok(mapping)
    }

    fn commit(&mut self, command: EditCommand, mappings: MappingSet) {
        info!(
            command = command.as_str(),
            mappings = mappings.len(),
            "mapping command applied"
        );
        self.history.push(command, mappings);
    }
}
