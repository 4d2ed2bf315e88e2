//! Core contracts for fieldmap.
//!
//! This crate defines the canonical type taxonomy, the per-origin type
//! vocabularies, the source/target field model, and the compatibility rules
//! shared by the transform catalog, the mapping validator, and the CLI.

pub mod canonical;
pub mod compat;
pub mod error;
pub mod sample;
pub mod schema;
pub mod types;

pub use canonical::{Canonicalized, OBJECT_ID_CAVEAT, canonicalize, canonicalize_detailed};
pub use compat::{Compatibility, resolve};
pub use error::{Error, Result};
pub use sample::{SampleValue, StringSubtype, detect_string_subtype, flatten_sample};
pub use schema::{FieldConstraint, SchemaKind, SourceField, TargetField, TargetSchema};
pub use types::{CanonicalType, OriginSystem};

/// Identity field names recognised for document collections.
pub const IDENTITY_FIELDS: [&str; 2] = ["_id", "id"];
