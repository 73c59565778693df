//! Traversal trait implemented by value types that property paths can read.

use serde_json::Value as JsonValue;

/// Outcome of reading one path segment from a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The segment exists.
    Found(T),
    /// The value supports this kind of access but has no such entry.
    Missing,
    /// The value does not support this kind of access at all.
    Unsupported,
}

/// Trait for values that a [`PropertyPath`](crate::PropertyPath) can walk.
///
/// # Example
///
/// ```
/// use enumerable_path::{Lookup, PropertyPath, Traverse};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Node {
///     Leaf(i64),
///     Pair(Box<Node>, Box<Node>),
///     Nil,
/// }
///
/// impl Traverse for Node {
///     fn read_property(&self, name: &str) -> Lookup<Self> {
///         match (self, name) {
///             (Node::Pair(left, _), "left") => Lookup::Found((**left).clone()),
///             (Node::Pair(_, right), "right") => Lookup::Found((**right).clone()),
///             (Node::Pair(..), _) => Lookup::Missing,
///             _ => Lookup::Unsupported,
///         }
///     }
///
///     fn read_index(&self, _index: &str) -> Lookup<Self> {
///         Lookup::Unsupported
///     }
///
///     fn null() -> Self {
///         Node::Nil
///     }
///
///     fn type_name(&self) -> &'static str {
///         "node"
///     }
/// }
///
/// let tree = Node::Pair(Box::new(Node::Leaf(1)), Box::new(Node::Leaf(2)));
/// let path = PropertyPath::parse("right").unwrap();
/// assert_eq!(path.get_value(&tree).unwrap(), Node::Leaf(2));
/// ```
pub trait Traverse: Sized {
    /// Reads a named property (`.name` segments).
    fn read_property(&self, name: &str) -> Lookup<Self>;

    /// Reads a bracketed index (`[index]` segments).
    fn read_index(&self, index: &str) -> Lookup<Self>;

    /// The value produced for absent index segments.
    fn null() -> Self;

    /// Short type description used in error messages.
    fn type_name(&self) -> &'static str;

    /// Whether the value is an index-addressed container.
    ///
    /// Used only to pick a more helpful error when a property segment is
    /// read from a container that must be indexed instead.
    fn is_indexable(&self) -> bool {
        false
    }
}

impl Traverse for JsonValue {
    fn read_property(&self, name: &str) -> Lookup<Self> {
        match self {
            JsonValue::Object(map) => match map.get(name) {
                Some(value) => Lookup::Found(value.clone()),
                None => Lookup::Missing,
            },
            _ => Lookup::Unsupported,
        }
    }

    fn read_index(&self, index: &str) -> Lookup<Self> {
        match self {
            JsonValue::Array(items) => match index.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(value) => Lookup::Found(value.clone()),
                None => Lookup::Missing,
            },
            JsonValue::Object(map) => match map.get(index) {
                Some(value) => Lookup::Found(value.clone()),
                None => Lookup::Missing,
            },
            _ => Lookup::Unsupported,
        }
    }

    fn null() -> Self {
        JsonValue::Null
    }

    fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    fn is_indexable(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }
}
