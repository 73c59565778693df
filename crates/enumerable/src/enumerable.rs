//! Query operators.
//!
//! [`Enumerable`] is implemented for every [`Sequence`]. Operators resolve
//! their selector once through the sequence's resolver chain, walk the
//! elements eagerly and return a fully built result. Operators that return
//! a sequence return the receiver's output kind; `group_by` and `join`
//! always return a [`Collection`], `to_dictionary` a [`Dictionary`].
//!
//! # Operators
//!
//! | Operator | Result | Absent selector means |
//! |----------|--------|-----------------------|
//! | `aggregate` | fold from `Null` | n/a |
//! | `all` / `any` / `count` | predicate checks | item truthiness / always true / always true |
//! | `average` / `sum` | numeric fold | the item itself |
//! | `distinct` / `group_by` | key-normalized buckets | the item itself |
//! | `first` / `last` | `Option<Value>` | always true |
//! | `max` / `min` | item with the extreme selected value | the item itself |
//! | `order_by` … `then_by_descending` | stable multi-key sort | the item itself |
//! | `select` / `select_many` | map / flat-map one level | identity / flatten |
//! | `skip` / `take` / `skip_while` / `take_while` | slices | n/a |
//! | `to_dictionary` | strict, fails on duplicate keys | identity values |
//! | `filter` | items passing the predicate | item truthiness |

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::collection::Collection;
use crate::dictionary::Dictionary;
use crate::error::{QueryError, Result};
use crate::grouping::Grouping;
use crate::key::Key;
use crate::ordering::{compare_values, sort_by_keys, Dir, OrderKey};
use crate::resolver::{Resolver, ResolverChain};
use crate::selector::{Accessor, Selector};
use crate::sequence::Sequence;
use crate::value::{Number, Value};

/// The query operator set.
///
/// # Example
///
/// ```
/// use enumerable::{Collection, Enumerable, Selector, Value};
///
/// let people = Collection::from(vec![
///     Value::map([("name", Value::from("Ada")), ("age", Value::from(36))]),
///     Value::map([("name", Value::from("Alan")), ("age", Value::from(41))]),
///     Value::map([("name", Value::from("Grace")), ("age", Value::from(36))]),
/// ]);
///
/// let names = people
///     .order_by_descending("age")?
///     .then_by("name")?
///     .select("name")?;
/// assert_eq!(
///     names.to_vec(),
///     vec![Value::from("Alan"), Value::from("Ada"), Value::from("Grace")]
/// );
///
/// assert_eq!(people.average("age")?, 113.0 / 3.0);
/// assert!(!people.any(Selector::func(|p: &Value| p.is_null()))?);
/// # Ok::<(), enumerable::QueryError>(())
/// ```
pub trait Enumerable: Sequence {
    /// Copies the elements into a vector.
    fn to_vec(&self) -> Vec<Value> {
        self.elements().into_owned()
    }

    /// Left fold starting from `Null`.
    fn aggregate<F>(&self, mut func: F) -> Value
    where
        F: FnMut(Value, &Value) -> Value,
    {
        self.elements()
            .iter()
            .fold(Value::Null, |acc, item| func(acc, item))
    }

    /// Returns `true` if every item satisfies the predicate.
    fn all(&self, predicate: impl Into<Selector>) -> Result<bool> {
        let accessor = self.resolve(&predicate.into())?;
        for item in self.elements().iter() {
            if !accessor.test(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns `true` if any item satisfies the predicate, or, without a
    /// predicate, if the sequence has any item.
    fn any(&self, predicate: impl Into<Selector>) -> Result<bool> {
        let accessor = predicate_accessor(self, predicate.into())?;
        for item in self.elements().iter() {
            if accessor.test(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Arithmetic mean of the selected values.
    ///
    /// Fails with [`QueryError::EmptySequence`] on an empty sequence.
    fn average(&self, selector: impl Into<Selector>) -> Result<f64> {
        let accessor = self.resolve(&selector.into())?;
        let items = self.elements();
        if items.is_empty() {
            return Err(QueryError::EmptySequence);
        }
        let total = numeric_fold(&accessor, &items)?;
        Ok(total.to_f64() / items.len() as f64)
    }

    /// Returns `true` if an element equals `value` under key normalization.
    ///
    /// Elements are viewed through the absent selector, so a dictionary
    /// compares its values.
    fn contains(&self, value: &Value) -> Result<bool> {
        let accessor = self.resolve(&Selector::Absent)?;
        let needle = Key::of(value);
        for item in self.elements().iter() {
            if Key::of(&accessor.call(item)?) == needle {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of items satisfying the predicate; all items without one.
    fn count(&self, predicate: impl Into<Selector>) -> Result<usize> {
        let accessor = predicate_accessor(self, predicate.into())?;
        let mut count = 0;
        for item in self.elements().iter() {
            if accessor.test(item)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Keeps the first item for each distinct selected key.
    fn distinct(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for item in self.elements().iter() {
            if seen.insert(Key::of(&accessor.call(item)?)) {
                result.push(item.clone());
            }
        }
        self.rebuild(result, Vec::new())
    }

    /// Replaces every element with the selector's result for it, in order.
    fn each(&mut self, selector: impl Into<Selector>) -> Result<()> {
        let accessor = self.resolve(&selector.into())?;
        for (index, item) in self.to_vec().into_iter().enumerate() {
            let replacement = accessor.call(&item)?;
            self.set(index, replacement)?;
        }
        Ok(())
    }

    /// Returns the element at `index`.
    fn element_at(&self, index: usize) -> Result<Value> {
        self.get(index)
    }

    /// First item satisfying the predicate.
    fn first(&self, predicate: impl Into<Selector>) -> Result<Option<Value>> {
        let accessor = predicate_accessor(self, predicate.into())?;
        for item in self.elements().iter() {
            if accessor.test(item)? {
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }

    /// Last item satisfying the predicate.
    fn last(&self, predicate: impl Into<Selector>) -> Result<Option<Value>> {
        let accessor = predicate_accessor(self, predicate.into())?;
        for item in self.elements().iter().rev() {
            if accessor.test(item)? {
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }

    /// Buckets items by selected key.
    ///
    /// Groups appear in first-seen key order and keep the original relative
    /// order of their items. Each group reports the first key value seen
    /// for its bucket.
    fn group_by(&self, selector: impl Into<Selector>) -> Result<Collection> {
        let accessor = self.resolve(&selector.into())?;
        let mut buckets: IndexMap<Key, (Value, Vec<Value>)> = IndexMap::new();
        for item in self.elements().iter() {
            let key = accessor.call(item)?;
            let bucket = Key::of(&key);
            buckets
                .entry(bucket)
                .or_insert_with(|| (key, Vec::new()))
                .1
                .push(item.clone());
        }

        let chain = self.resolvers().clone();
        let groups = buckets
            .into_values()
            .map(|(key, items)| {
                Value::Group(Grouping::new(key, items).with_resolvers(chain.clone()))
            })
            .collect::<Vec<_>>();
        Ok(Collection::from(groups).with_resolvers(chain))
    }

    /// Inner join against `inner`.
    ///
    /// For each outer item, in order, and each inner item, in order, emits
    /// `result(outer, inner)` when the selected keys are equal. Keys are
    /// compared with loose value equality.
    fn join<S, F>(
        &self,
        inner: &S,
        outer_selector: impl Into<Selector>,
        inner_selector: impl Into<Selector>,
        result: F,
    ) -> Result<Collection>
    where
        S: Sequence + ?Sized,
        F: Fn(&Value, &Value) -> Value,
    {
        let outer_accessor = self.resolve(&outer_selector.into())?;
        let inner_accessor = self.resolve(&inner_selector.into())?;

        let inner_items = inner.elements();
        let inner_keys = inner_items
            .iter()
            .map(|item| inner_accessor.call(item))
            .collect::<Result<Vec<_>>>()?;

        let mut joined = Vec::new();
        for outer in self.elements().iter() {
            let outer_key = outer_accessor.call(outer)?;
            for (inner_item, inner_key) in inner_items.iter().zip(&inner_keys) {
                if &outer_key == inner_key {
                    joined.push(result(outer, inner_item));
                }
            }
        }
        Ok(Collection::from(joined).with_resolvers(self.resolvers().clone()))
    }

    /// Item with the greatest selected value; the first one on ties.
    ///
    /// Items whose selected value is `Null` or not comparable with the
    /// current best are skipped.
    fn max(&self, selector: impl Into<Selector>) -> Result<Option<Value>> {
        extreme(self, selector.into(), Ordering::Greater)
    }

    /// Item with the least selected value; the first one on ties.
    fn min(&self, selector: impl Into<Selector>) -> Result<Option<Value>> {
        extreme(self, selector.into(), Ordering::Less)
    }

    /// Sorts ascending by the selected value, starting a new order sequence.
    fn order_by(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        order(self, vec![OrderKey::new(Dir::Asc, accessor)])
    }

    /// Sorts descending by the selected value, starting a new order sequence.
    fn order_by_descending(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        order(self, vec![OrderKey::new(Dir::Desc, accessor)])
    }

    /// Adds an ascending tie-breaker to the current order sequence.
    fn then_by(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        let mut keys = self.order_keys().to_vec();
        keys.push(OrderKey::new(Dir::Asc, accessor));
        order(self, keys)
    }

    /// Adds a descending tie-breaker to the current order sequence.
    fn then_by_descending(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        let mut keys = self.order_keys().to_vec();
        keys.push(OrderKey::new(Dir::Desc, accessor));
        order(self, keys)
    }

    fn reverse(&self) -> Result<Self::Output> {
        let mut items = self.to_vec();
        items.reverse();
        self.rebuild(items, Vec::new())
    }

    /// Maps every item through the selector.
    fn select(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        let items = self
            .elements()
            .iter()
            .map(|item| accessor.call(item))
            .collect::<Result<Vec<_>>>()?;
        self.rebuild(items, Vec::new())
    }

    /// Maps every item to a list and flattens the lists one level.
    ///
    /// The selector must produce a list or a grouping.
    fn select_many(&self, selector: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&selector.into())?;
        let mut items = Vec::new();
        for item in self.elements().iter() {
            match accessor.call(item)? {
                Value::List(inner) => items.extend(inner),
                Value::Group(group) => items.extend(group.items().iter().cloned()),
                other => return Err(QueryError::type_mismatch("list", other.type_name())),
            }
        }
        self.rebuild(items, Vec::new())
    }

    /// Drops the first `count` items.
    fn skip(&self, count: usize) -> Result<Self::Output> {
        let items = self.elements().iter().skip(count).cloned().collect();
        self.rebuild(items, Vec::new())
    }

    /// Drops items while the predicate holds, then keeps the rest.
    fn skip_while(&self, predicate: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&predicate.into())?;
        let elements = self.elements();
        let mut start = elements.len();
        for (index, item) in elements.iter().enumerate() {
            if !accessor.test(item)? {
                start = index;
                break;
            }
        }
        self.rebuild(elements[start..].to_vec(), Vec::new())
    }

    /// Sum of the selected values.
    ///
    /// `Null` counts as zero, booleans as zero or one, and numeric strings
    /// are parsed; anything else is a [`QueryError::TypeMismatch`].
    fn sum(&self, selector: impl Into<Selector>) -> Result<Number> {
        let accessor = self.resolve(&selector.into())?;
        numeric_fold(&accessor, &self.elements())
    }

    /// Keeps the first `count` items.
    fn take(&self, count: usize) -> Result<Self::Output> {
        let items = self.elements().iter().take(count).cloned().collect();
        self.rebuild(items, Vec::new())
    }

    /// Keeps items up to, not including, the first one failing the
    /// predicate.
    fn take_while(&self, predicate: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&predicate.into())?;
        let mut items = Vec::new();
        for item in self.elements().iter() {
            if !accessor.test(item)? {
                break;
            }
            items.push(item.clone());
        }
        self.rebuild(items, Vec::new())
    }

    /// Builds a dictionary keyed by the key selector.
    ///
    /// Unlike [`Dictionary::add`], a repeated key is an error:
    /// [`QueryError::DuplicateKey`] names the first key produced twice.
    fn to_dictionary(
        &self,
        key_selector: impl Into<Selector>,
        value_selector: impl Into<Selector>,
    ) -> Result<Dictionary> {
        let key_accessor = self.resolve(&key_selector.into())?;
        let value_accessor = self.resolve(&value_selector.into())?;

        let mut dictionary = Dictionary::new().with_resolvers(self.resolvers().clone());
        for item in self.elements().iter() {
            let key = key_accessor.call(item)?;
            if dictionary.contains_key(&key) {
                log::debug!("to_dictionary rejected duplicate key {}", key);
                return Err(QueryError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            dictionary.add(key, value_accessor.call(item)?);
        }
        Ok(dictionary)
    }

    /// Keeps the items satisfying the predicate.
    fn filter(&self, predicate: impl Into<Selector>) -> Result<Self::Output> {
        let accessor = self.resolve(&predicate.into())?;
        let mut items = Vec::new();
        for item in self.elements().iter() {
            if accessor.test(item)? {
                items.push(item.clone());
            }
        }
        self.rebuild(items, Vec::new())
    }

    /// Runs `resolver` before every resolver already in the chain.
    fn prepend_resolver<R: Resolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.resolvers_mut().prepend(resolver);
        self
    }

    /// Runs `resolver` after every resolver already in the chain.
    fn append_resolver<R: Resolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.resolvers_mut().append(resolver);
        self
    }

    /// Restores the built-in resolvers.
    fn reset_resolvers(&mut self) -> &mut Self {
        self.resolvers_mut().reset();
        self
    }

    /// Replaces the resolver chain.
    fn with_resolvers(mut self, chain: ResolverChain) -> Self
    where
        Self: Sized,
    {
        *self.resolvers_mut() = chain;
        self
    }
}

impl<S: Sequence + ?Sized> Enumerable for S {}

fn predicate_accessor<S: Sequence + ?Sized>(seq: &S, predicate: Selector) -> Result<Accessor> {
    if predicate.is_absent() {
        return Ok(Accessor::constant(true));
    }
    seq.resolve(&predicate)
}

fn order<S: Sequence + ?Sized>(seq: &S, keys: Vec<OrderKey>) -> Result<S::Output> {
    let sorted = sort_by_keys(seq.elements().into_owned(), &keys)?;
    seq.rebuild(sorted, keys)
}

fn extreme<S: Sequence + ?Sized>(
    seq: &S,
    selector: Selector,
    wanted: Ordering,
) -> Result<Option<Value>> {
    let accessor = seq.resolve(&selector)?;
    let elements = seq.elements();
    let mut best: Option<(Value, &Value)> = None;
    for item in elements.iter() {
        let candidate = accessor.call(item)?;
        if candidate.is_null() {
            continue;
        }
        let replace = match &best {
            None => true,
            Some((current, _)) => compare_values(&candidate, current) == Some(wanted),
        };
        if replace {
            best = Some((candidate, item));
        }
    }
    Ok(best.map(|(_, item)| item.clone()))
}

fn numeric_fold(accessor: &Accessor, items: &[Value]) -> Result<Number> {
    let mut total = Number::I64(0);
    for item in items {
        let value = accessor.call(item)?;
        let number = value
            .to_number()
            .ok_or_else(|| QueryError::type_mismatch("number", value.type_name()))?;
        total = total.add(number);
    }
    Ok(total)
}
