use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use fieldmap_core::{CanonicalType, SampleValue};
use serde::{Deserialize, Serialize};

use crate::builtins;
use crate::errors::{CatalogError, EvaluationError, SimulationError};
use crate::preview::Preview;

/// Static output type a transform declares, independent of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum TransformOutput {
    Fixed(CanonicalType),
    PassThrough,
}

impl TransformOutput {
    pub fn apply_to(self, input: CanonicalType) -> CanonicalType {
        match self {
            TransformOutput::Fixed(output) => output,
            TransformOutput::PassThrough => input,
        }
    }
}

impl fmt::Display for TransformOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOutput::Fixed(output) => write!(f, "{output}"),
            TransformOutput::PassThrough => f.write_str("(unchanged)"),
        }
    }
}

/// Grouping used when presenting the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformCategory {
    String,
    Conversion,
    Numeric,
    Datetime,
    Database,
    Validation,
}

impl TransformCategory {
    pub const ALL: [TransformCategory; 6] = [
        TransformCategory::String,
        TransformCategory::Conversion,
        TransformCategory::Numeric,
        TransformCategory::Datetime,
        TransformCategory::Database,
        TransformCategory::Validation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransformCategory::String => "string",
            TransformCategory::Conversion => "conversion",
            TransformCategory::Numeric => "numeric",
            TransformCategory::Datetime => "datetime",
            TransformCategory::Database => "database",
            TransformCategory::Validation => "validation",
        }
    }
}

impl std::str::FromStr for TransformCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TransformCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown transform category '{value}'"))
    }
}

/// A stateless, named operator.
pub trait Transform: Send + Sync {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> TransformCategory;
    fn output(&self) -> TransformOutput;
    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError>;
}

/// Registry of transforms, looked up by name from mappings.
pub struct TransformCatalog {
    transforms: HashMap<String, Box<dyn Transform>>,
    order: Vec<String>,
}

impl fmt::Debug for TransformCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCatalog")
            .field("transforms", &self.order)
            .finish()
    }
}

impl Default for TransformCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TransformCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// A catalog holding every built-in transform.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::empty();
        builtins::register(&mut catalog);
        catalog
    }

    /// Process-wide built-in catalog.
    pub fn builtin() -> &'static TransformCatalog {
        static CATALOG: OnceLock<TransformCatalog> = OnceLock::new();
        CATALOG.get_or_init(TransformCatalog::with_builtins)
    }

    pub fn register(&mut self, transform: Box<dyn Transform>) -> Result<(), CatalogError> {
        let id = transform.id().to_string();
        if self.transforms.contains_key(&id) {
            return Err(CatalogError::DuplicateTransform(id));
        }
        self.order.push(id.clone());
        self.transforms.insert(id, transform);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.transforms.get(name).map(|transform| transform.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn require(&self, name: &str) -> Result<&dyn Transform, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownTransform(name.to_string()))
    }

    /// Transforms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Transform> + '_ {
        self.order.iter().filter_map(|id| self.get(id))
    }

    pub fn by_category(
        &self,
        category: TransformCategory,
    ) -> impl Iterator<Item = &dyn Transform> + '_ {
        self.iter()
            .filter(move |transform| transform.category() == category)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fold a chain left to right over declared output types.
    ///
    /// An empty chain returns `source` unchanged; the right-most fixed output wins.
    pub fn compose_type<S: AsRef<str>>(
        &self,
        source: CanonicalType,
        chain: &[S],
    ) -> Result<CanonicalType, CatalogError> {
        chain.iter().try_fold(source, |current, name| {
            Ok(self.require(name.as_ref())?.output().apply_to(current))
        })
    }

    /// Run each transform's evaluation function over a concrete value, in order.
    pub fn simulate<S: AsRef<str>>(
        &self,
        chain: &[S],
        sample: &SampleValue,
    ) -> Result<SampleValue, SimulationError> {
        let mut current = sample.clone();
        for (step, name) in chain.iter().enumerate() {
            let name = name.as_ref();
            let transform = self
                .get(name)
                .ok_or_else(|| SimulationError::UnknownTransform(name.to_string()))?;
            current = transform.apply(current).map_err(|source| {
                tracing::debug!(
                    transform = name,
                    step,
                    error = %source,
                    "transform evaluation failed"
                );
                SimulationError::Step {
                    step,
                    transform: name.to_string(),
                    source,
                }
            })?;
        }
        Ok(current)
    }

    /// Static type and simulated value side by side.
    pub fn preview<S: AsRef<str>>(
        &self,
        source_type: CanonicalType,
        chain: &[S],
        sample: &SampleValue,
    ) -> Preview {
        Preview {
            input: sample.clone(),
            chain: chain.iter().map(|name| name.as_ref().to_string()).collect(),
            declared_type: self.compose_type(source_type, chain).ok(),
            outcome: self.simulate(chain, sample),
        }
    }
}
