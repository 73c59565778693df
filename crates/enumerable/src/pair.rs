//! Dictionary entries.

use std::fmt;

use crate::value::Value;

/// Immutable `(key, value)` entry stored by a [`Dictionary`](crate::Dictionary).
///
/// Property paths and expressions see a pair as a record with `key` and
/// `value` fields, so `"value"`, `"key.name"` and `p.value * 2` are valid
/// selectors on dictionary items.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValuePair {
    key: Box<Value>,
    value: Box<Value>,
}

impl KeyValuePair {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        KeyValuePair {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
        }
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Splits the pair into its key and value.
    pub fn into_parts(self) -> (Value, Value) {
        (*self.key, *self.value)
    }

    /// Returns a pair with the same key and a new value.
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        KeyValuePair {
            key: self.key.clone(),
            value: Box::new(value.into()),
        }
    }
}

impl<K: Into<Value>, V: Into<Value>> From<(K, V)> for KeyValuePair {
    fn from((key, value): (K, V)) -> Self {
        KeyValuePair::new(key, value)
    }
}

impl fmt::Display for KeyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.key, self.value)
    }
}
