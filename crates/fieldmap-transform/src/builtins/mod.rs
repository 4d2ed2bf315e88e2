//! Built-in transforms.

mod convert;
mod database;
mod numeric;
mod temporal;
mod text;

use fieldmap_core::SampleValue;

use crate::catalog::{Transform, TransformCatalog, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

pub use database::DefaultIfEmpty;
pub use numeric::{ArithmeticOp, ArithmeticTransform};
pub use text::{CaseMode, CaseTransform, TruncateTransform};

type ApplyFn = fn(SampleValue) -> Result<SampleValue, EvaluationError>;

/// A transform described by static metadata and a plain evaluation function.
pub struct Builtin {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    category: TransformCategory,
    output: TransformOutput,
    apply: ApplyFn,
}

impl Builtin {
    pub const fn new(
        id: &'static str,
        label: &'static str,
        description: &'static str,
        category: TransformCategory,
        output: TransformOutput,
        apply: ApplyFn,
    ) -> Self {
        Self {
            id,
            label,
            description,
            category,
            output,
            apply,
        }
    }
}

impl Transform for Builtin {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn description(&self) -> &str {
        self.description
    }

    fn category(&self) -> TransformCategory {
        self.category
    }

    fn output(&self) -> TransformOutput {
        self.output
    }

    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError> {
        (self.apply)(input)
    }
}

pub fn register(catalog: &mut TransformCatalog) {
    let transforms = text::transforms()
        .into_iter()
        .chain(convert::transforms())
        .chain(numeric::transforms())
        .chain(temporal::transforms())
        .chain(database::transforms());

    for transform in transforms {
        let id = transform.id().to_string();
        if let Err(err) = catalog.register(transform) {
            tracing::warn!(transform = %id, error = %err, "skipping built-in transform");
        }
    }
}

/// Text rendering used by string-producing transforms; `null` renders empty.
pub(crate) fn text_of(value: &SampleValue) -> String {
    match value {
        SampleValue::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn map_text(
    value: SampleValue,
    f: impl FnOnce(&str) -> String,
) -> Result<SampleValue, EvaluationError> {
    Ok(SampleValue::String(f(&text_of(&value))))
}

/// Falsy in the sense of the original runtime: null, empty or blank string.
pub(crate) fn is_blank(value: &SampleValue) -> bool {
    match value {
        SampleValue::Null => true,
        SampleValue::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

pub(crate) fn truthy_text(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

pub(crate) const STRING: TransformOutput =
    TransformOutput::Fixed(fieldmap_core::CanonicalType::String);
