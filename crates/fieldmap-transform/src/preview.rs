use fieldmap_core::{CanonicalType, SampleValue};

use crate::errors::SimulationError;

/// Result of previewing a transform chain on a sample value.
///
/// `declared_type` is the optimistic static type and is reported even when the
/// runtime `outcome` failed; callers decide how to reconcile the two.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub input: SampleValue,
    pub chain: Vec<String>,
    /// `None` when the chain names a transform the catalog does not know.
    pub declared_type: Option<CanonicalType>,
    pub outcome: Result<SampleValue, SimulationError>,
}

impl Preview {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The simulated value, or the `Error: ...` marker when evaluation failed.
    pub fn display(&self) -> String {
        match &self.outcome {
            Ok(value) => value.to_string(),
            Err(err) => err.marker(),
        }
    }

    /// Canonical category of the value actually produced, when there is one.
    pub fn observed_type(&self) -> Option<CanonicalType> {
        self.outcome.as_ref().ok().map(SampleValue::canonical_type)
    }
}
