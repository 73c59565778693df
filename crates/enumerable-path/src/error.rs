//! Error types for the path crate.

use thiserror::Error;

/// Errors raised while parsing a property path or reading it from a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path string was empty.
    #[error("the property path should not be empty")]
    Empty,

    /// The path contains a token that is not a property or an index.
    #[error("could not parse property path \"{path}\": unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        path: String,
        token: char,
        position: usize,
    },

    /// A property segment was read from a value that has no properties.
    #[error("cannot read property \"{property}\" from a {type_name} value")]
    PropertyNotReadable {
        property: String,
        type_name: &'static str,
    },

    /// A property segment was read from an index-only container.
    #[error("cannot read property \"{property}\" from a {type_name}; write the path as \"[{property}]\" instead")]
    PropertyOnIndexed {
        property: String,
        type_name: &'static str,
    },

    /// The property does not exist on the value.
    #[error("property \"{property}\" does not exist on {type_name}")]
    NoSuchProperty {
        property: String,
        type_name: &'static str,
    },

    /// An index segment was read from a value that cannot be indexed.
    #[error("index \"{index}\" cannot be read from a {type_name} value")]
    NotIndexable {
        index: String,
        type_name: &'static str,
    },
}

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
