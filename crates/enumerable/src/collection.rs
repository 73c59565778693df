//! Ordered list container.

use std::borrow::Cow;

use crate::error::{QueryError, Result};
use crate::key::Key;
use crate::ordering::OrderKey;
use crate::resolver::ResolverChain;
use crate::sequence::Sequence;
use crate::value::Value;

/// Ordered, densely indexed list of values.
///
/// All query operators on a `Collection` return a `Collection`. After a
/// sort the result remembers its order sequence, so `then_by` can refine
/// it.
///
/// # Example
///
/// ```
/// use enumerable::{Collection, Enumerable, Sequence, Value};
///
/// let mut list = Collection::new();
/// list.add(1);
/// list.add_range([2, 3]);
/// list.insert(0, 0)?;
/// assert_eq!(list.len(), 4);
///
/// assert!(list.remove(&Value::from(2)));
/// assert_eq!(list.index_of(&Value::from(3)), Some(2));
///
/// let removed = list.remove_at(0)?;
/// assert_eq!(removed, Value::from(0));
/// assert_eq!(list.to_vec(), vec![Value::from(1), Value::from(3)]);
/// # Ok::<(), enumerable::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<Value>,
    resolvers: ResolverChain,
    order: Vec<OrderKey>,
}

impl Collection {
    /// Creates an empty collection with the default resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a list value.
    ///
    /// `Null` gives an empty collection; any other non-list value is an
    /// [`QueryError::InvalidArgument`].
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::List(items) => Ok(Self::from(items)),
            Value::Group(group) => Ok(Self::from(group.items().to_vec())),
            other => Err(QueryError::invalid_argument(format!(
                "cannot build a collection from a {}",
                other.type_name()
            ))),
        }
    }

    /// Attaches an order sequence, as a sort would.
    ///
    /// Used by custom [`Sequence`] implementations whose output is a
    /// `Collection`.
    pub fn with_order(mut self, order: Vec<OrderKey>) -> Self {
        self.order = order;
        self
    }

    /// Appends an item.
    pub fn add(&mut self, item: impl Into<Value>) {
        self.items.push(item.into());
    }

    /// Appends every item.
    pub fn add_range<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.items.extend(items.into_iter().map(Into::into));
    }

    /// Inserts an item before position `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, item: impl Into<Value>) -> Result<()> {
        if index > self.items.len() {
            return Err(QueryError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item.into());
        Ok(())
    }

    /// Removes the first item equal to `item` under key normalization.
    ///
    /// Returns whether an item was removed.
    pub fn remove(&mut self, item: &Value) -> bool {
        match self.index_of(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(QueryError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Position of the first item equal to `item` under key normalization.
    pub fn index_of(&self, item: &Value) -> Option<usize> {
        let needle = Key::of(item);
        self.items.iter().position(|candidate| Key::of(candidate) == needle)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Returns the items as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Consumes the collection, returning its items.
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl Sequence for Collection {
    type Output = Collection;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn elements(&self) -> Cow<'_, [Value]> {
        Cow::Borrowed(&self.items)
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(QueryError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    fn resolvers(&self) -> &ResolverChain {
        &self.resolvers
    }

    fn resolvers_mut(&mut self) -> &mut ResolverChain {
        &mut self.resolvers
    }

    fn order_keys(&self) -> &[OrderKey] {
        &self.order
    }

    fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<Collection> {
        Ok(Collection {
            items,
            resolvers: self.resolvers.clone(),
            order,
        })
    }
}

impl From<Vec<Value>> for Collection {
    fn from(items: Vec<Value>) -> Self {
        Collection {
            items,
            ..Self::default()
        }
    }
}

impl<T: Into<Value>> FromIterator<T> for Collection {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Collection::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::List(collection.items)
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Collection) -> bool {
        self.items == other.items
    }
}
