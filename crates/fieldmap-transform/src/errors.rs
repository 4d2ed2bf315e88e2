use thiserror::Error;

/// Failure of a single transform while evaluating a concrete value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("cannot parse '{0}' as a date")]
    InvalidDate(String),
    #[error("cannot parse '{0}' as a datetime")]
    InvalidDatetime(String),
    #[error("value '{0}' is out of range")]
    OutOfRange(String),
    #[error("{0} values are not supported")]
    Unsupported(&'static str),
}

/// Failure of a transform chain during preview simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("unknown transform '{0}'")]
    UnknownTransform(String),
    #[error("{transform} (step {step}): {source}")]
    Step {
        step: usize,
        transform: String,
        #[source]
        source: EvaluationError,
    },
}

impl SimulationError {
    /// Displayable marker shown in place of a preview value.
    pub fn marker(&self) -> String {
        format!("Error: {self}")
    }
}

/// Catalog lookups and registrations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown transform '{0}'")]
    UnknownTransform(String),
    #[error("transform '{0}' is already registered")]
    DuplicateTransform(String),
}
