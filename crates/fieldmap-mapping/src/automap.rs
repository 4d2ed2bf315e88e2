use fieldmap_core::{SourceField, TargetSchema};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{FieldMapping, MappingKey, MappingSet};

/// Externally computed mapping suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub source_path: String,
    pub target_name: String,
    /// Suggestion quality in percent (0-100).
    pub confidence_percent: f64,
}

impl Suggestion {
    pub fn key(&self) -> MappingKey {
        MappingKey::new(&self.source_path, &self.target_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoMapOptions {
    /// Suggestions must score strictly above this.
    pub min_confidence: f64,
}

impl Default for AutoMapOptions {
    fn default() -> Self {
        Self {
            min_confidence: 80.0,
        }
    }
}

impl AutoMapOptions {
    pub fn accepts(&self, suggestion: &Suggestion) -> bool {
        suggestion.confidence_percent > self.min_confidence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    LowConfidence,
    UnknownSource,
    UnknownTarget,
    AlreadyMapped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSuggestion {
    pub suggestion: Suggestion,
    pub reason: SkipReason,
}

/// What happened to each suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoMapOutcome {
    pub accepted: Vec<MappingKey>,
    pub skipped: Vec<SkippedSuggestion>,
}

/// Build a fresh mapping set from the suggestions that clear the threshold.
///
/// Accepted suggestions become mappings with empty chains, validated on
/// creation. Suggestions naming fields that do not exist are skipped rather
/// than failing the whole batch, since they come from an external scorer.
pub fn apply_suggestions(
    sources: &[SourceField],
    schema: &TargetSchema,
    suggestions: &[Suggestion],
    options: &AutoMapOptions,
) -> (MappingSet, AutoMapOutcome) {
    let mut set = MappingSet::new();
    let mut outcome = AutoMapOutcome::default();

    for suggestion in suggestions {
        let resolved = if options.accepts(suggestion) {
            let source = sources
                .iter()
                .find(|source| source.path == suggestion.source_path);
            match (source, schema.field(&suggestion.target_name)) {
                (None, _) => Err(SkipReason::UnknownSource),
                (_, None) => Err(SkipReason::UnknownTarget),
                (Some(source), Some(target)) => Ok((source, target)),
            }
        } else {
            Err(SkipReason::LowConfidence)
        };

        let result = resolved.and_then(|(source, target)| {
            let mapping = FieldMapping::new(
                suggestion.key(),
                source.canonical_type(),
                target.resolve_type(schema.kind),
            );
            set.insert(mapping).map_err(|_| SkipReason::AlreadyMapped)
        });

        match result {
            Ok(()) => outcome.accepted.push(suggestion.key()),
            Err(reason) => {
                debug!(
                    source = %suggestion.source_path,
                    target = %suggestion.target_name,
                    confidence = suggestion.confidence_percent,
                    reason = ?reason,
                    "suggestion skipped"
                );
                outcome.skipped.push(SkippedSuggestion {
                    suggestion: suggestion.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        accepted = outcome.accepted.len(),
        skipped = outcome.skipped.len(),
        threshold = options.min_confidence,
        "auto-map applied"
    );
    (set, outcome)
}
