use thiserror::Error;

/// Core error type shared across fieldmap crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A label could not be parsed into a known enumeration.
    #[error("invalid label: {0}")]
    InvalidLabel(String),
    /// A field path is malformed.
    #[error("invalid field path: {0}")]
    InvalidPath(String),
    /// The target schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

/// Convenience alias for results returned by fieldmap crates.
pub type Result<T> = std::result::Result<T, Error>;
