//! End-to-end scenarios across containers and operators.

use enumerable::{
    CharSequence, Collection, Dictionary, Enumerable, Expression, KeyValuePair, Number, Object,
    QueryError, Selector, Sequence, Value,
};

// ============================================================================
// Helpers
// ============================================================================

fn ab(a: i64, b: i64) -> Value {
    Value::map([("a", a), ("b", b)])
}

fn ints(values: &[i64]) -> Collection {
    values.iter().copied().collect()
}

fn modulo(m: i64) -> Selector {
    Selector::func(move |v: &Value| {
        v.as_number()
            .and_then(|n| n.to_i128())
            .map(|n| (n as i64) % m)
    })
}

fn below(limit: i64) -> Selector {
    Selector::func(move |v: &Value| v.as_number().map_or(false, |n| n.to_f64() < limit as f64))
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn order_by_then_by_on_fixed_dataset() {
    let items = Collection::from(vec![ab(1, 2), ab(1, 1), ab(3, 1)]);
    let sorted = items.order_by("a").unwrap().then_by("b").unwrap();
    assert_eq!(sorted.to_vec(), vec![ab(1, 1), ab(1, 2), ab(3, 1)]);
}

#[test]
fn then_by_matches_single_composite_sort() {
    let items = Collection::from(vec![ab(2, 1), ab(1, 9), ab(2, 0), ab(1, 3)]);
    let chained = items.order_by("a").unwrap().then_by_descending("b").unwrap();
    let composite = items
        .order_by(Selector::func(|v: &Value| {
            let map = v.as_map().cloned().unwrap_or_default();
            let a = map.get("a").and_then(|v| v.as_number()).map_or(0.0, |n| n.to_f64());
            let b = map.get("b").and_then(|v| v.as_number()).map_or(0.0, |n| n.to_f64());
            Value::list([Value::from(a), Value::from(-b)])
        }))
        .unwrap();
    assert_eq!(chained.to_vec(), composite.to_vec());
}

#[test]
fn ordering_by_missing_values_puts_nulls_last() {
    let items = Collection::from(vec![
        Value::map([("n", Value::Null)]),
        Value::map([("n", Value::from(2))]),
        Value::map([("n", Value::from(1))]),
    ]);
    let sorted = items.order_by("n").unwrap().select("n").unwrap();
    assert_eq!(
        sorted.to_vec(),
        vec![Value::from(1), Value::from(2), Value::Null]
    );
}

#[test]
fn ordering_with_expressions() {
    let items = ints(&[3, -5, 1]);
    let sorted = items
        .order_by_descending(Expression::new("x", "x * x"))
        .unwrap();
    assert_eq!(
        sorted.to_vec(),
        vec![Value::from(-5), Value::from(3), Value::from(1)]
    );
}

// ============================================================================
// Grouping and keys
// ============================================================================

#[test]
fn group_by_distinct_objects_with_equal_fields() {
    let o1 = Object::from_fields([("x", 1)]);
    let o2 = Object::from_fields([("x", 1)]);
    let items = Collection::from(vec![
        Value::map([("key", Value::from(o1.clone()))]),
        Value::map([("key", Value::from(o2.clone()))]),
    ]);

    let groups = items.group_by("key").unwrap();
    assert_eq!(groups.len(), 2);
    for (group, object) in groups.iter().zip([&o1, &o2]) {
        let group = group.as_group().unwrap();
        assert_eq!(group.len(), 1);
        assert!(group.key().as_object().unwrap().same(object));
    }
}

#[test]
fn group_by_same_object_merges() {
    let shared = Object::from_fields([("x", 1)]);
    let items = Collection::from(vec![
        Value::map([("key", Value::from(shared.clone())), ("n", Value::from(1))]),
        Value::map([("key", Value::from(shared)), ("n", Value::from(2))]),
    ]);
    let groups = items.group_by("key").unwrap();
    assert_eq!(groups.len(), 1);
    let sums = groups
        .select(Selector::try_func(|g: &Value| match g.as_group() {
            Some(group) => Ok(Value::from(group.sum("n")?)),
            None => Ok(Value::Null),
        }))
        .unwrap();
    assert_eq!(sums.to_vec(), vec![Value::from(3)]);
}

#[test]
fn distinct_by_selector_keeps_first_items() {
    let items = Collection::from(vec![ab(1, 1), ab(2, 1), ab(1, 2), ab(3, 2)]);
    assert_eq!(
        items.distinct("b").unwrap().to_vec(),
        vec![ab(1, 1), ab(1, 2)]
    );
}

#[test]
fn to_dictionary_collision_names_key() {
    let err = ints(&[1, 2, 3])
        .to_dictionary(modulo(2), Selector::Absent)
        .unwrap_err();
    match err {
        QueryError::DuplicateKey { key } => assert_eq!(key, "1"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn to_dictionary_without_collisions() {
    let dictionary = ints(&[1, 2, 3]).to_dictionary(modulo(5), modulo(2)).unwrap();
    assert_eq!(dictionary.len(), 3);
    assert_eq!(dictionary.get(&Value::from(3)).unwrap(), Value::from(1));
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn average_on_empty_collection_fails() {
    let err = Collection::new().average(Selector::Absent).unwrap_err();
    assert!(matches!(err, QueryError::EmptySequence));
    assert_eq!(err.to_string(), "sequence has no elements");
}

#[test]
fn sum_of_mixed_numbers() {
    let items = Collection::from(vec![Value::from(1u8), Value::from(-3), Value::from(0.5)]);
    assert_eq!(items.sum(Selector::Absent).unwrap(), Number::F64(-1.5));
    assert_eq!(ints(&[]).sum(Selector::Absent).unwrap(), Number::I64(0));
}

#[test]
fn aggregate_builds_running_total() {
    let total = ints(&[1, 2, 3]).aggregate(|acc, item| {
        let acc = acc.as_number().unwrap_or(Number::I64(0));
        Value::from(acc.add(item.as_number().unwrap_or(Number::I64(0))))
    });
    assert_eq!(total, Value::from(6));
}

// ============================================================================
// Slicing
// ============================================================================

#[test]
fn take_while_halts_at_first_failure() {
    let taken = ints(&[1, 2, 3, 2]).take_while(below(3)).unwrap();
    assert_eq!(taken.to_vec(), vec![Value::from(1), Value::from(2)]);
}

#[test]
fn skip_while_keeps_later_matches() {
    let skipped = ints(&[1, 2, 3, 2]).skip_while(below(3)).unwrap();
    assert_eq!(skipped.to_vec(), vec![Value::from(3), Value::from(2)]);
}

// ============================================================================
// Join
// ============================================================================

#[test]
fn join_uppercase_keys() {
    let outer = Collection::from(vec![Value::from("a"), Value::from("b")]);
    let inner = Collection::from(vec![Value::from("A"), Value::from("B")]);
    let upper = || Selector::func(|v: &Value| v.as_str().map(str::to_uppercase));

    let joined = outer
        .join(&inner, upper(), upper(), |o, i| Value::from(format!("{o}{i}")))
        .unwrap();
    assert_eq!(joined.to_vec(), vec![Value::from("aA"), Value::from("bB")]);
}

#[test]
fn join_against_a_dictionary() {
    let people = Collection::from(vec![
        Value::map([("name", Value::from("ada")), ("team", Value::from(1))]),
        Value::map([("name", Value::from("alan")), ("team", Value::from(2))]),
    ]);
    let teams: Dictionary = [(1, "core"), (2, "web")].into_iter().collect();

    let joined = people
        .join(&teams, "team", "key", |person, team| {
            let name = person.as_map().and_then(|p| p.get("name")).cloned();
            let team = team.as_pair().map(|t| t.value().clone());
            Value::list([Value::from(name), Value::from(team)])
        })
        .unwrap();
    assert_eq!(
        joined.to_vec(),
        vec![Value::list(["ada", "core"]), Value::list(["alan", "web"])]
    );
}

// ============================================================================
// Dictionary
// ============================================================================

#[test]
fn dictionary_round_trip_preserves_order() {
    let dictionary = Dictionary::from_value(Value::map([("z", 1), ("a", 2), ("m", 3)])).unwrap();
    let rebuilt = Dictionary::from_value(Value::from(dictionary.clone())).unwrap();
    assert_eq!(rebuilt.keys(), dictionary.keys());
    assert_eq!(rebuilt.values(), dictionary.values());
    assert_eq!(
        rebuilt.keys(),
        vec![Value::from("z"), Value::from("a"), Value::from("m")]
    );
}

#[test]
fn dictionary_queries_return_collections() {
    let dictionary: Dictionary = [("a", 3), ("b", 1), ("c", 2)].into_iter().collect();
    let sorted: Collection = dictionary.order_by(Selector::Absent).unwrap();
    let keys = sorted.select("key").unwrap();
    assert_eq!(
        keys.to_vec(),
        vec![Value::from("b"), Value::from("c"), Value::from("a")]
    );
    assert_eq!(
        sorted.first(Selector::Absent).unwrap(),
        Some(Value::from(KeyValuePair::new("b", 1)))
    );
}

// ============================================================================
// CharSequence
// ============================================================================

#[test]
fn char_sequence_operators_stay_strings() {
    let text = CharSequence::from("hello");
    let result = text
        .filter(Selector::func(|c: &Value| c != &Value::from("l")))
        .unwrap()
        .reverse()
        .unwrap();
    assert_eq!(result.as_str(), "oeh");
}

#[test]
fn char_sequence_group_by_returns_collection() {
    let groups = CharSequence::from("abca").group_by(Selector::Absent).unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups.get(0).unwrap().as_group().unwrap().len(),
        2
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unresolvable_selector_message() {
    let err = ints(&[1]).select(Selector::Other(Value::from(true))).unwrap_err();
    assert_eq!(err.to_string(), "selector bool true cannot be resolved");
}

#[test]
fn missing_property_is_a_path_error() {
    let err = Collection::from(vec![Value::map([("a", 1)])])
        .select("b")
        .unwrap_err();
    assert!(matches!(err, QueryError::Path(_)));
}

#[test]
fn property_on_list_suggests_brackets() {
    let err = Collection::from(vec![Value::list([1])])
        .select("a")
        .unwrap_err();
    assert!(err.to_string().contains("[a]"), "{err}");
}

#[test]
fn missing_index_reads_null() {
    let items = Collection::from(vec![Value::list([1]), Value::list([1, 2])]);
    assert_eq!(
        items.select("[1]").unwrap().to_vec(),
        vec![Value::Null, Value::from(2)]
    );
}

#[test]
fn invalid_constructor_input() {
    for err in [
        Collection::from_value(Value::from("x")).unwrap_err(),
        Dictionary::from_value(Value::from(1)).unwrap_err(),
        CharSequence::from_value(Value::from(false)).unwrap_err(),
    ] {
        assert!(matches!(err, QueryError::InvalidArgument(_)), "{err}");
    }
}
