//! Insertion-ordered key/value container.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::collection::Collection;
use crate::error::{QueryError, Result};
use crate::key::Key;
use crate::ordering::OrderKey;
use crate::pair::KeyValuePair;
use crate::resolver::ResolverChain;
use crate::selector::{Accessor, Selector};
use crate::sequence::Sequence;
use crate::value::Value;

/// Ordered map whose elements are [`KeyValuePair`]s.
///
/// Keys are stored under their normalized [`Key`], so `1` and `1.0` name
/// the same entry while two distinct [`Object`](crate::Object)s never do.
/// The original key value is kept and returned by [`keys`](Self::keys).
///
/// As a sequence, a dictionary yields its pairs in insertion order. Query
/// operators read an absent selector as "the pair's value"; explicit
/// selectors see the pair itself, which exposes `key` and `value`
/// properties. Operator results are [`Collection`]s.
///
/// # Example
///
/// ```
/// use enumerable::{Dictionary, Enumerable, Selector, Value};
///
/// let mut scores = Dictionary::new();
/// scores.add("ada", 3);
/// scores.add("alan", 5);
/// scores.add("ada", 4); // overwrites
///
/// assert_eq!(scores.get(&Value::from("ada"))?, Value::from(4));
/// assert_eq!(scores.sum(Selector::Absent)?.to_f64(), 9.0);
///
/// let names = scores.filter(Selector::func(|pair: &Value| {
///     pair.as_pair().map_or(false, |p| p.value() == &Value::from(5))
/// }))?.select("key")?;
/// assert_eq!(names.to_vec(), vec![Value::from("alan")]);
/// # Ok::<(), enumerable::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: IndexMap<Key, KeyValuePair>,
    resolvers: ResolverChain,
}

impl Dictionary {
    /// Creates an empty dictionary with the default resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from a value.
    ///
    /// Accepts `Null` (empty), a map or a list. Map entries are keyed by
    /// their name and list items by their position. An item that is
    /// itself a [`KeyValuePair`] is stored under the pair's own key
    /// instead. Anything else is an [`QueryError::InvalidArgument`].
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Map(map) => Ok(map
                .into_iter()
                .map(|(name, item)| entry(Value::from(name), item))
                .collect()),
            Value::List(items) => Ok(items
                .into_iter()
                .enumerate()
                .map(|(position, item)| entry(Value::from(position), item))
                .collect()),
            other => Err(QueryError::invalid_argument(format!(
                "cannot build a dictionary from a {}",
                other.type_name()
            ))),
        }
    }

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// A replaced entry keeps its position.
    pub fn add(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        self.insert_pair(KeyValuePair::new(key, value));
    }

    /// Same as [`add`](Self::add).
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        self.add(key, value);
    }

    fn insert_pair(&mut self, pair: KeyValuePair) {
        self.entries.insert(Key::of(pair.key()), pair);
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries
            .shift_remove(&Key::of(key))
            .map(|pair| pair.into_parts().1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.values().map(|pair| pair.key().clone()).collect()
    }

    /// Values in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.entries
            .values()
            .map(|pair| pair.value().clone())
            .collect()
    }

    /// Entries in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = &KeyValuePair> + '_ {
        self.entries.values()
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(&Key::of(key))
    }

    /// Returns `true` if some entry's value equals `value` under key
    /// normalization.
    pub fn contains_value(&self, value: &Value) -> bool {
        let needle = Key::of(value);
        self.entries
            .values()
            .any(|pair| Key::of(pair.value()) == needle)
    }

    /// Returns the value stored under `key`, if any.
    pub fn try_get_value(&self, key: &Value) -> Option<Value> {
        self.entries
            .get(&Key::of(key))
            .map(|pair| pair.value().clone())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &Value) -> Result<Value> {
        self.try_get_value(key)
            .ok_or_else(|| QueryError::KeyNotFound(key.to_string()))
    }

    /// Returns the pair stored under `key`, if any.
    pub fn get_pair(&self, key: &Value) -> Option<&KeyValuePair> {
        self.entries.get(&Key::of(key))
    }
}

fn entry(key: Value, item: Value) -> KeyValuePair {
    match item {
        Value::Pair(pair) => pair,
        value => KeyValuePair::new(key, value),
    }
}

impl Sequence for Dictionary {
    type Output = Collection;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn elements(&self) -> Cow<'_, [Value]> {
        Cow::Owned(self.entries.values().cloned().map(Value::Pair).collect())
    }

    fn get(&self, index: usize) -> Result<Value> {
        self.entries
            .get_index(index)
            .map(|(_, pair)| Value::Pair(pair.clone()))
            .ok_or(QueryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Replaces the entry at `index`.
    ///
    /// A [`Value::Pair`] replaces the whole entry; any other entry that
    /// already used the new key is dropped. A bare value replaces only the
    /// value and keeps the key.
    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.entries.len();
        if index >= len {
            return Err(QueryError::IndexOutOfRange { index, len });
        }

        match value {
            Value::Pair(pair) => {
                let key = Key::of(pair.key());
                let mut entries: Vec<(Key, KeyValuePair)> =
                    std::mem::take(&mut self.entries).into_iter().collect();
                entries[index] = (key.clone(), pair);
                self.entries = entries
                    .into_iter()
                    .enumerate()
                    .filter(|(position, (k, _))| *position == index || *k != key)
                    .map(|(_, entry)| entry)
                    .collect();
            }
            value => {
                if let Some((_, pair)) = self.entries.get_index_mut(index) {
                    *pair = pair.with_value(value);
                }
            }
        }
        Ok(())
    }

    fn resolvers(&self) -> &ResolverChain {
        &self.resolvers
    }

    fn resolvers_mut(&mut self) -> &mut ResolverChain {
        &mut self.resolvers
    }

    fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<Collection> {
        let mut collection = Collection::from(items).with_order(order);
        *collection.resolvers_mut() = self.resolvers.clone();
        Ok(collection)
    }

    fn resolve(&self, selector: &Selector) -> Result<Accessor> {
        if selector.is_absent() {
            return Ok(Accessor::new(|item: &Value| match item {
                Value::Pair(pair) => Ok(pair.value().clone()),
                other => Ok(other.clone()),
            }));
        }
        self.resolvers.resolve(selector)
    }
}

impl FromIterator<KeyValuePair> for Dictionary {
    fn from_iter<I: IntoIterator<Item = KeyValuePair>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        for pair in iter {
            dictionary.insert_pair(pair);
        }
        dictionary
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().map(KeyValuePair::from).collect()
    }
}

impl From<Dictionary> for Value {
    fn from(dictionary: Dictionary) -> Self {
        Value::List(dictionary.entries.into_values().map(Value::Pair).collect())
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Dictionary) -> bool {
        self.entries == other.entries
    }
}
