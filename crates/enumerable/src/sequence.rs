//! The capability every queryable container provides.
//!
//! This module defines [`Sequence`], the narrow interface the operator set
//! in [`Enumerable`](crate::Enumerable) is written against. The built-in
//! containers implement it, and so can any user container.

use std::borrow::Cow;

use crate::error::{QueryError, Result};
use crate::ordering::OrderKey;
use crate::resolver::ResolverChain;
use crate::selector::{Accessor, Selector};
use crate::value::Value;

/// An ordered, densely indexed, mutable container of values.
///
/// # Manual Implementation
///
/// ```
/// use std::borrow::Cow;
/// use enumerable::{Collection, Enumerable, OrderKey, ResolverChain, Result, Sequence, Value};
///
/// /// Scores kept in a plain vector.
/// struct Scores {
///     items: Vec<Value>,
///     resolvers: ResolverChain,
/// }
///
/// impl Sequence for Scores {
///     type Output = Collection;
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
///
///     fn elements(&self) -> Cow<'_, [Value]> {
///         Cow::Borrowed(&self.items)
///     }
///
///     fn set(&mut self, index: usize, value: Value) -> Result<()> {
///         let len = self.items.len();
///         let slot = self
///             .items
///             .get_mut(index)
///             .ok_or(enumerable::QueryError::IndexOutOfRange { index, len })?;
///         *slot = value;
///         Ok(())
///     }
///
///     fn resolvers(&self) -> &ResolverChain {
///         &self.resolvers
///     }
///
///     fn resolvers_mut(&mut self) -> &mut ResolverChain {
///         &mut self.resolvers
///     }
///
///     fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<Collection> {
///         Ok(Collection::from(items)
///             .with_resolvers(self.resolvers.clone())
///             .with_order(order))
///     }
/// }
///
/// let scores = Scores {
///     items: vec![Value::from(3), Value::from(9), Value::from(4)],
///     resolvers: ResolverChain::new(),
/// };
/// let high = scores.order_by_descending(enumerable::Selector::Absent).unwrap();
/// assert_eq!(high.first(enumerable::Selector::Absent).unwrap(), Some(Value::from(9)));
/// ```
pub trait Sequence {
    /// Container kind returned by operators that produce a new sequence.
    type Output: Sequence;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements in order.
    ///
    /// Containers that store their items as values borrow them; the others
    /// materialize a fresh list.
    fn elements(&self) -> Cow<'_, [Value]>;

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Result<Value> {
        let len = self.len();
        self.elements()
            .get(index)
            .cloned()
            .ok_or(QueryError::IndexOutOfRange { index, len })
    }

    /// Replaces the element at `index`.
    fn set(&mut self, index: usize, value: Value) -> Result<()>;

    /// The resolver chain used by this sequence's operators.
    fn resolvers(&self) -> &ResolverChain;

    /// Mutable access to the resolver chain.
    fn resolvers_mut(&mut self) -> &mut ResolverChain;

    /// The order sequence left by the last `order_by` / `then_by`, if any.
    fn order_keys(&self) -> &[OrderKey] {
        &[]
    }

    /// Builds the output container from `items`.
    ///
    /// Implementations pass their resolver chain on to the new container.
    /// `order` is the order sequence of a sort, and empty otherwise.
    fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<Self::Output>;

    /// Resolves a selector for this sequence.
    ///
    /// Override to give [`Selector::Absent`] a container-specific meaning;
    /// the default defers to [`resolvers`](Self::resolvers).
    fn resolve(&self, selector: &Selector) -> Result<Accessor> {
        self.resolvers().resolve(selector)
    }
}
