//! Key normalization for grouping, distinct and dictionary storage.
//!
//! Two values fall into the same bucket when their [`Key`]s are equal.
//! Plain values are keyed by content; an [`Object`](crate::Object) is keyed
//! by its identity token, so two distinct objects with equal fields stay
//! apart.

use crate::value::{Number, Value};

/// Hashable normal form of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Non-integral float, stored by bit pattern.
    Float(u64),
    Str(String),
    List(Vec<Key>),
    /// Entries sorted by name; map equality ignores insertion order.
    Map(Vec<(String, Key)>),
    /// Identity token of a shared object.
    Ref(u64),
    Pair(Box<Key>, Box<Key>),
    Group(Box<Key>, Vec<Key>),
}

impl Key {
    /// Normalizes a value.
    pub fn of(value: &Value) -> Key {
        match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(*b),
            Value::Number(n) => number_key(*n),
            Value::String(s) => Key::Str(s.clone()),
            Value::List(items) => Key::List(items.iter().map(Key::of).collect()),
            Value::Map(map) => {
                let mut entries: Vec<(String, Key)> =
                    map.iter().map(|(k, v)| (k.clone(), Key::of(v))).collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                Key::Map(entries)
            }
            Value::Object(object) => Key::Ref(object.id()),
            Value::Pair(pair) => Key::Pair(
                Box::new(Key::of(pair.key())),
                Box::new(Key::of(pair.value())),
            ),
            Value::Group(group) => Key::Group(
                Box::new(Key::of(group.key())),
                group.items().iter().map(Key::of).collect(),
            ),
        }
    }
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        Key::of(value)
    }
}

// 1, 1u8 and 1.0 must share a bucket.
fn number_key(n: Number) -> Key {
    match n {
        Number::I64(i) => Key::Int(i),
        Number::U64(u) => i64::try_from(u).map_or(Key::UInt(u), Key::Int),
        Number::F64(f) => {
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Key::Int(f as i64)
            } else {
                Key::Float(f.to_bits())
            }
        }
    }
}
