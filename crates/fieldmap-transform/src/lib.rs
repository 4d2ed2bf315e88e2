//! Named transform operators for fieldmap.
//!
//! Each operator declares a static output type (used by [`TransformCatalog::compose_type`])
//! and a runtime evaluation function (used by [`TransformCatalog::simulate`]). The static
//! type is a fixed lookup that never inspects the input; simulation runs against a
//! concrete sample and may fail.

pub mod builtins;
pub mod catalog;
pub mod errors;
pub mod preview;

pub use builtins::{
    ArithmeticOp, ArithmeticTransform, Builtin, CaseMode, CaseTransform, DefaultIfEmpty,
    TruncateTransform,
};
pub use catalog::{Transform, TransformCatalog, TransformCategory, TransformOutput};
pub use errors::{CatalogError, EvaluationError, SimulationError};
pub use preview::Preview;
