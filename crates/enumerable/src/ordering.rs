//! Ordering types for sorting sequences.
//!
//! Provides [`Dir`] for sort direction and [`OrderKey`] for one
//! `(direction, accessor)` step of a multi-key sort. A sorted sequence
//! remembers its keys so `then_by` can extend them.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::selector::Accessor;
use crate::value::Value;

/// Direction of one sort step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Flips `ordering` for descending steps.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dir::Asc => "ascending",
            Dir::Desc => "descending",
        })
    }
}

/// One step of an order sequence.
#[derive(Clone)]
pub struct OrderKey {
    /// The sort direction.
    pub dir: Dir,
    /// Extracts the value compared by this step.
    pub accessor: Accessor,
}

impl OrderKey {
    pub fn new(dir: Dir, accessor: Accessor) -> Self {
        OrderKey { dir, accessor }
    }

    pub fn asc(accessor: Accessor) -> Self {
        OrderKey::new(Dir::Asc, accessor)
    }

    pub fn desc(accessor: Accessor) -> Self {
        OrderKey::new(Dir::Desc, accessor)
    }

    /// Compares two already-extracted values according to this step.
    ///
    /// Returns `None` if the values cannot be compared.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        compare_values(a, b).map(|ordering| self.dir.apply(ordering))
    }
}

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderKey").field("dir", &self.dir).finish()
    }
}

/// Compares two values of the same kind.
///
/// Returns `None` if the kinds don't match or comparison is not possible (NaN).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::List(a), Value::List(b)) => compare_lists(a, b),
        (Value::Pair(a), Value::Pair(b)) => match compare_values(a.key(), b.key())? {
            Ordering::Equal => compare_values(a.value(), b.value()),
            ordering => Some(ordering),
        },
        (Value::Group(a), Value::Group(b)) => compare_values(a.key(), b.key()),

        // Null values sort last
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Greater),
        (_, Value::Null) => Some(Ordering::Less),

        _ => None,
    }
}

fn compare_lists(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y)? {
            Ordering::Equal => continue,
            ordering => return Some(ordering),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Compares two rows of extracted sort values step by step.
///
/// The first step that tells the rows apart decides. Values that
/// [`compare_values`] cannot order fall back to a fixed rank by kind
/// (NaN after every other number), which keeps the comparison a total
/// order.
pub fn compare_rows(a: &[Value], b: &[Value], keys: &[OrderKey]) -> Ordering {
    for ((key, x), y) in keys.iter().zip(a).zip(b) {
        let ordering = key.dir.apply(total_order(x, y));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn total_order(a: &Value, b: &Value) -> Ordering {
    if let Some(ordering) = compare_values(a, b) {
        return ordering;
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.to_f64().total_cmp(&y.to_f64()),
        (Value::List(x), Value::List(y)) => x
            .iter()
            .zip(y)
            .map(|(p, q)| total_order(p, q))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::List(_) => 3,
        Value::Map(_) => 4,
        Value::Object(_) => 5,
        Value::Pair(_) => 6,
        Value::Group(_) => 7,
        Value::Null => 8,
    }
}

/// Stable sort of `items` by the given order sequence.
///
/// Every accessor runs exactly once per item before any comparison, so a
/// failing accessor aborts the sort without reordering anything.
pub fn sort_by_keys(items: Vec<Value>, keys: &[OrderKey]) -> Result<Vec<Value>> {
    let mut rows = items
        .into_iter()
        .map(|item| {
            let row = keys
                .iter()
                .map(|key| key.accessor.call(&item))
                .collect::<Result<Vec<_>>>()?;
            Ok((row, item))
        })
        .collect::<Result<Vec<_>>>()?;

    log::trace!("sorting {} items by {} key(s)", rows.len(), keys.len());
    rows.sort_by(|(a, _), (b, _)| compare_rows(a, b, keys));
    Ok(rows.into_iter().map(|(_, item)| item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn descending_flips_only_strict_orderings() {
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Asc.apply(Ordering::Greater), Ordering::Greater);
        assert_eq!(Dir::Desc.to_string(), "descending");
    }

    #[test]
    fn same_kind_values_compare_naturally() {
        assert_eq!(
            compare_values(&Value::from("ant"), &Value::from("bee")),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::from(2u8), &Value::from(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&Value::from(false), &Value::from(true)),
            Some(Ordering::Less)
        );
        let nan = Value::Number(Number::F64(f64::NAN));
        assert_eq!(compare_values(&nan, &Value::from(1.0)), None);
    }

    #[test]
    fn compare_null_values() {
        let null = Value::Null;
        let some = Value::from("test");

        assert_eq!(compare_values(&null, &some), Some(Ordering::Greater));
        assert_eq!(compare_values(&some, &null), Some(Ordering::Less));
        assert_eq!(compare_values(&null, &null), Some(Ordering::Equal));
    }

    #[test]
    fn compare_lists_lexicographically() {
        let a = Value::list([1, 2]);
        let b = Value::list([1, 3]);
        let c = Value::list([1]);

        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_values(&c, &a), Some(Ordering::Less));
    }

    #[test]
    fn compare_type_mismatch() {
        assert_eq!(compare_values(&Value::from("1"), &Value::from(1)), None);
    }

    #[test]
    fn rows_fall_through_to_next_key() {
        let keys = vec![
            OrderKey::asc(Accessor::identity()),
            OrderKey::desc(Accessor::identity()),
        ];
        let a = [Value::from(1), Value::from(5)];
        let b = [Value::from(1), Value::from(9)];

        assert_eq!(compare_rows(&a, &b, &keys), Ordering::Greater);
    }

    #[test]
    fn mixed_kinds_sort_by_kind() {
        let items = vec![
            Value::from("b"),
            Value::from(2),
            Value::Number(Number::F64(f64::NAN)),
            Value::Null,
            Value::from(1),
            Value::from("a"),
        ];
        let sorted = sort_by_keys(items, &[OrderKey::asc(Accessor::identity())]).unwrap();
        assert_eq!(sorted[0], Value::from(1));
        assert_eq!(sorted[1], Value::from(2));
        assert!(sorted[2].as_number().is_some_and(|n| n.to_f64().is_nan()));
        assert_eq!(sorted[3..], [Value::from("a"), Value::from("b"), Value::Null]);
    }

    #[test]
    fn sort_is_stable() {
        let items = vec![
            Value::list([1, 0]),
            Value::list([0, 1]),
            Value::list([1, 2]),
            Value::list([0, 3]),
        ];
        let first = Accessor::new(|item: &Value| {
            Ok(item.as_list().and_then(|l| l.first()).cloned().unwrap_or_default())
        });

        let sorted = sort_by_keys(items, &[OrderKey::asc(first)]).unwrap();
        assert_eq!(
            sorted,
            vec![
                Value::list([0, 1]),
                Value::list([0, 3]),
                Value::list([1, 0]),
                Value::list([1, 2]),
            ]
        );
    }
}
