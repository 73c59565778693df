//! Group-by results.

use std::borrow::Cow;

use crate::collection::Collection;
use crate::error::{QueryError, Result};
use crate::ordering::OrderKey;
use crate::resolver::ResolverChain;
use crate::sequence::Sequence;
use crate::value::Value;

/// A list of items that share a key.
///
/// Produced by [`group_by`](crate::Enumerable::group_by). The key is the
/// selector output of the first item in the group. A grouping is itself a
/// sequence; its operators return a [`Collection`].
///
/// ```
/// use enumerable::{Enumerable, Grouping, Selector, Sequence, Value};
///
/// let group = Grouping::new("odd", vec![Value::from(1), Value::from(3)]);
/// assert_eq!(group.key(), &Value::from("odd"));
/// assert_eq!(group.sum(Selector::Absent).unwrap().to_f64(), 4.0);
/// assert_eq!(group.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Grouping {
    key: Box<Value>,
    items: Vec<Value>,
    resolvers: ResolverChain,
}

impl Grouping {
    pub fn new(key: impl Into<Value>, items: Vec<Value>) -> Self {
        Grouping {
            key: Box::new(key.into()),
            items,
            resolvers: ResolverChain::default(),
        }
    }

    /// The shared key of this group.
    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl Sequence for Grouping {
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

    fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<Collection> {
        let mut collection = Collection::from(items).with_order(order);
        *collection.resolvers_mut() = self.resolvers.clone();
        Ok(collection)
    }
}

impl PartialEq for Grouping {
    fn eq(&self, other: &Grouping) -> bool {
        self.key == other.key && self.items == other.items
    }
}
