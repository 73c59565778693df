//! Runtime values carried by sequences.
//!
//! The [`Value`] enum is the element type of every container in this crate.
//! Scalars, lists and maps have value semantics; an [`Object`] is a shared
//! record whose identity survives cloning, which is what key normalization
//! relies on to tell two equal-looking objects apart.

use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use enumerable_path::{Lookup, Traverse};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::grouping::Grouping;
use crate::pair::KeyValuePair;

/// Insertion-ordered string-keyed map used by [`Value::Map`] and [`Object`].
pub type Map = IndexMap<String, Value>;

/// Dynamic item value.
///
/// # Example
///
/// ```
/// use enumerable::{Number, Value};
///
/// let row = Value::map([("name", Value::from("Ada")), ("age", Value::from(36))]);
/// assert_eq!(row.type_name(), "map");
/// assert!(Value::from(1) == Value::from(1.0));
/// assert!(!Value::from("").is_truthy());
/// assert_eq!(Value::from(7u8).as_number(), Some(Number::U64(7)));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Ordered list, compared and hashed by content.
    List(Vec<Value>),
    /// Ordered map, compared and hashed by content.
    Map(Map),
    /// Shared record, keyed by identity.
    Object(Object),
    /// Dictionary entry.
    Pair(KeyValuePair),
    /// Group-by result.
    Group(Grouping),
}

impl Value {
    /// Builds a list value from anything convertible.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map value from key-value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Converts any serializable value through its JSON data model.
    ///
    /// JSON objects become [`Value::Map`], never [`Value::Object`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// Converts this value to JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used by predicates.
    ///
    /// `Null`, `false`, zero, `""`, `"0"` and empty lists or maps are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.to_f64() != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Object(_) | Value::Pair(_) | Value::Group(_) => true,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Pair(_) => "pair",
            Value::Group(_) => "grouping",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list items, if present.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the map, if present.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Extracts the object handle, if present.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Extracts the dictionary entry, if present.
    pub fn as_pair(&self) -> Option<&KeyValuePair> {
        match self {
            Value::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Extracts the grouping, if present.
    pub fn as_group(&self) -> Option<&Grouping> {
        match self {
            Value::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Numeric view used by `sum` and `average`.
    ///
    /// Null counts as zero, booleans as zero or one, and numeric strings are
    /// parsed. Everything else has no numeric view.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Null => Some(Number::I64(0)),
            Value::Bool(b) => Some(Number::I64(*b as i64)),
            Value::Number(n) => Some(*n),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Number::I64)
                    .or_else(|_| s.parse::<f64>().map(Number::F64))
                    .ok()
            }
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Loose structural equality: numbers compare across representations and
    /// objects compare by content.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.compare(*b) == Some(Ordering::Equal),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            other => {
                let rendered = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::I64(n)) => serializer.serialize_i64(*n),
            Value::Number(Number::U64(n)) => serializer.serialize_u64(*n),
            Value::Number(Number::F64(n)) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            Value::Object(object) => serializer.collect_map(object.fields().iter()),
            Value::Pair(pair) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("key", pair.key())?;
                map.serialize_entry("value", pair.value())?;
                map.end()
            }
            Value::Group(group) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("key", group.key())?;
                map.serialize_entry("items", group.items())?;
                map.end()
            }
        }
    }
}

impl Traverse for Value {
    fn read_property(&self, name: &str) -> Lookup<Self> {
        let found = match self {
            Value::Object(object) => object.get(name),
            Value::Map(map) => map.get(name).cloned(),
            Value::Pair(pair) => match name {
                "key" => Some(pair.key().clone()),
                "value" => Some(pair.value().clone()),
                _ => None,
            },
            Value::Group(group) => match name {
                "key" => Some(group.key().clone()),
                _ => None,
            },
            _ => return Lookup::Unsupported,
        };
        found.map_or(Lookup::Missing, Lookup::Found)
    }

    fn read_index(&self, index: &str) -> Lookup<Self> {
        let found = match self {
            Value::List(items) => index.parse::<usize>().ok().and_then(|i| items.get(i)).cloned(),
            Value::Group(group) => index
                .parse::<usize>()
                .ok()
                .and_then(|i| group.items().get(i))
                .cloned(),
            Value::Map(map) => map.get(index).cloned(),
            _ => return Lookup::Unsupported,
        };
        found.map_or(Lookup::Missing, Lookup::Found)
    }

    fn null() -> Self {
        Value::Null
    }

    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }

    fn is_indexable(&self) -> bool {
        matches!(self, Value::List(_) | Value::Group(_))
    }
}

// Conversions from primitive and container types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<KeyValuePair> for Value {
    fn from(pair: KeyValuePair) -> Self {
        Value::Pair(pair)
    }
}

impl From<Grouping> for Value {
    fn from(group: Grouping) -> Self {
        Value::Group(group)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    n.as_f64().map_or(Value::Null, |f| Value::Number(Number::F64(f)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A number that remembers whether it came in as a signed integer, an
/// unsigned integer or a float.
///
/// Integers stay exact through comparison and addition; floats only enter
/// when one side is a float or a sum overflows both integer ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Lossy conversion to `f64`.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Orders two numbers. Integer pairs compare exactly, even across
    /// signedness; `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some((a as i128).cmp(&(b as i128))),
            (Number::U64(a), Number::I64(b)) => Some((a as i128).cmp(&(b as i128))),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Adds two numbers.
    ///
    /// Integer addition stays integral while the result fits in `i64` or
    /// `u64`; anything else is computed in floating point.
    pub fn add(self, other: Number) -> Number {
        match (self.to_i128(), other.to_i128()) {
            (Some(a), Some(b)) => {
                let sum = a + b;
                i64::try_from(sum)
                    .map(Number::I64)
                    .or_else(|_| u64::try_from(sum).map(Number::U64))
                    .unwrap_or(Number::F64(sum as f64))
            }
            _ => Number::F64(self.to_f64() + other.to_f64()),
        }
    }

    /// Returns the integer value when this number holds one.
    pub fn to_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(n as i128),
            Number::U64(n) => Some(n as i128),
            Number::F64(_) => None,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty, $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64, i8, i16, i32, i64, isize);
number_from!(U64, u64, u8, u16, u32, u64, usize);
number_from!(F64, f64, f32, f64);

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Shared, interior-mutable record with a stable identity.
///
/// Cloning an `Object` yields another handle to the same record: changes
/// made through one handle are visible through all of them, and all of
/// them report the same [`id`](Object::id). Two objects built separately
/// never share an id, even when their fields are equal.
///
/// An object may hold a handle to itself. Key normalization, identity
/// checks and comparing a handle with itself stay finite, but comparing
/// two different cyclic objects, displaying or serializing one recurses
/// without bound. Cyclic graphs are not supported there.
///
/// # Example
///
/// ```
/// use enumerable::{Object, Value};
///
/// let a = Object::from_fields([("x", 1)]);
/// let b = Object::from_fields([("x", 1)]);
/// let alias = a.clone();
///
/// alias.set("x", 2);
/// assert_eq!(a.get("x"), Some(Value::from(2)));
/// assert!(a.same(&alias));
/// assert!(!a.same(&b));
/// ```
#[derive(Clone)]
pub struct Object {
    id: u64,
    fields: Rc<RefCell<Map>>,
}

impl Object {
    /// Creates an empty object with a fresh identity.
    pub fn new() -> Self {
        Object::from_map(Map::new())
    }

    /// Creates an object owning the given fields.
    pub fn from_map(fields: Map) -> Self {
        Object {
            id: NEXT_OBJECT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            fields: Rc::new(RefCell::new(fields)),
        }
    }

    /// Creates an object from field name/value pairs.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Object::from_map(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The identity token shared by all handles to this record.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns `true` if both handles point at the same record.
    pub fn same(&self, other: &Object) -> bool {
        self.id == other.id
    }

    /// Returns a copy of a field value.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Sets a field, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.borrow_mut().insert(name.into(), value.into())
    }

    /// Returns `true` if the field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    /// Returns `true` if the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// Borrows the fields.
    pub fn fields(&self) -> Ref<'_, Map> {
        self.fields.borrow()
    }

    /// Mutably borrows the fields.
    pub fn fields_mut(&self) -> RefMut<'_, Map> {
        self.fields.borrow_mut()
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::new()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        self.same(other) || *self.fields.borrow() == *other.fields.borrow()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("fields", &*self.fields.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::list([1, 2]).type_name(), "list");
        assert_eq!(Value::from(Object::new()).type_name(), "object");
    }

    #[test]
    fn value_extractors() {
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(42).as_number(), Some(Number::I64(42)));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_number(), None);
        assert_eq!(Value::from(1).as_str(), None);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from("a").is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from(Object::new()).is_truthy());
    }

    #[test]
    fn loose_number_equality() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(3u8), Value::from(3i64));
        assert_ne!(Value::from(1), Value::from("1"));
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(Number::I64(5).compare(Number::U64(10)), Some(Ordering::Less));
        assert_eq!(Number::I64(-1).compare(Number::U64(u64::MAX)), Some(Ordering::Less));
        assert_eq!(Number::I64(5).compare(Number::F64(5.0)), Some(Ordering::Equal));
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn number_addition() {
        assert_eq!(Number::I64(2).add(Number::I64(3)), Number::I64(5));
        assert_eq!(Number::I64(2).add(Number::F64(0.5)), Number::F64(2.5));
        assert_eq!(Number::I64(i64::MAX).add(Number::I64(1)), Number::U64(i64::MAX as u64 + 1));
        assert_eq!(Number::U64(u64::MAX).add(Number::U64(1)), Number::F64(u64::MAX as f64 + 1.0));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Null.to_number(), Some(Number::I64(0)));
        assert_eq!(Value::from(true).to_number(), Some(Number::I64(1)));
        assert_eq!(Value::from(" 12 ").to_number(), Some(Number::I64(12)));
        assert_eq!(Value::from("1.5").to_number(), Some(Number::F64(1.5)));
        assert_eq!(Value::from("abc").to_number(), None);
        assert_eq!(Value::list([1]).to_number(), None);
    }

    #[test]
    fn object_identity_survives_clone() {
        let a = Object::from_fields([("x", 1)]);
        let b = a.clone();
        b.set("x", 5);
        assert_eq!(a.get("x"), Some(Value::from(5)));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn distinct_objects_have_distinct_ids() {
        let a = Object::from_fields([("x", 1)]);
        let b = Object::from_fields([("x", 1)]);
        assert_ne!(a.id(), b.id());
        // structurally equal even though not the same record
        assert_eq!(a, b);
    }

    #[test]
    fn self_referencing_object_compares_by_identity() {
        use crate::key::Key;

        let node = Object::from_fields([("n", 1)]);
        node.set("me", node.clone());

        let value = Value::from(node.clone());
        assert_eq!(value, Value::from(node.clone()));
        assert_eq!(Key::of(&value), Key::of(&Value::from(node.clone())));
        assert!(node.get("me").and_then(|me| me.as_object().map(|o| o.same(&node))).unwrap());
    }

    #[test]
    fn json_round_trip() {
        let json = serde_json::json!({"a": [1, 2.5, "x"], "b": null, "c": true});
        let value = Value::from(json.clone());
        assert_eq!(value.to_json().unwrap(), json);
    }

    #[test]
    fn from_serialize_struct() {
        #[derive(serde::Serialize)]
        struct Row {
            id: u32,
            name: &'static str,
        }

        let value = Value::from_serialize(&Row { id: 3, name: "c" }).unwrap();
        assert_eq!(value, Value::map([("id", Value::from(3)), ("name", Value::from("c"))]));
    }

    #[test]
    fn pairs_and_groups_serialize_as_records() {
        let pair = Value::from(KeyValuePair::new("a", 1));
        assert_eq!(
            pair.to_json().unwrap(),
            serde_json::json!({"key": "a", "value": 1})
        );

        let group = Value::from(Grouping::new(true, vec![Value::from(2)]));
        assert_eq!(
            group.to_json().unwrap(),
            serde_json::json!({"key": true, "items": [2]})
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::from(12).to_string(), "12");
        assert_eq!(Value::list([1, 2]).to_string(), "[1,2]");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn traverse_object_and_map() {
        use enumerable_path::PropertyPath;

        let inner = Object::from_fields([("a", 9)]);
        let item = Value::map([("b", Value::from(inner))]);
        let path = PropertyPath::parse("b.a").unwrap();
        assert_eq!(path.get_value(&item).unwrap(), Value::from(9));

        let listed = Value::list([Value::map([("b", 1)])]);
        let path = PropertyPath::parse("[0].b").unwrap();
        assert_eq!(path.get_value(&listed).unwrap(), Value::from(1));
    }
}
