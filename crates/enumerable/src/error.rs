//! Error types for the enumerable crate.

use enumerable_path::PathError;
use thiserror::Error;

/// Errors that can occur when building sequences or running query operators.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No resolver in the chain accepted the selector.
    #[error("selector {selector} cannot be resolved")]
    UnresolvableSelector { selector: String },

    /// An aggregate that needs at least one element ran on an empty sequence.
    #[error("sequence has no elements")]
    EmptySequence,

    /// `to_dictionary` produced the same key twice.
    #[error("key selection produces duplicated elements \"{key}\"")]
    DuplicateKey { key: String },

    /// A constructor was given a value it cannot build a container from.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Positional access outside `0..len`.
    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Dictionary lookup for a key that is not stored.
    #[error("key \"{0}\" was not found in the dictionary")]
    KeyNotFound(String),

    /// A selector produced a value of the wrong kind for the operator.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A property path failed to parse or to read.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An expression failed to compile or evaluate.
    #[error("expression error: {0}")]
    Expression(#[from] minijinja::Error),

    /// Converting to or from serde data failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

/// Result type for enumerable operations.
pub type Result<T> = std::result::Result<T, QueryError>;
