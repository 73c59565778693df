//! Property-based tests for property paths.

use enumerable_path::{PathElement, PropertyPath};
use proptest::prelude::*;
use serde_json::{json, Value};

fn element_strategy() -> impl Strategy<Value = PathElement> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(PathElement::Property),
        "[a-z0-9]{1,4}".prop_map(PathElement::Index),
    ]
}

fn render(elements: &[PathElement]) -> String {
    let mut out = String::new();
    for (i, element) in elements.iter().enumerate() {
        match element {
            PathElement::Index(index) => out.push_str(&format!("[{}]", index)),
            PathElement::Property(name) if i == 0 => out.push_str(name),
            PathElement::Property(name) => out.push_str(&format!(".{}", name)),
        }
    }
    out
}

proptest! {
    /// Rendering a segment list and parsing it back yields the same segments.
    #[test]
    fn parse_inverts_render(elements in prop::collection::vec(element_strategy(), 1..6)) {
        let raw = render(&elements);
        let path = PropertyPath::parse(&raw).unwrap();
        prop_assert_eq!(path.elements(), elements.as_slice());
        prop_assert_eq!(path.to_string(), raw);
    }

    /// A chain of nested objects is read back through the matching dotted path.
    #[test]
    fn nested_objects_read_back(
        keys in prop::collection::vec("[a-z]{1,5}", 1..5),
        leaf in any::<i64>(),
    ) {
        let mut value = json!(leaf);
        for key in keys.iter().rev() {
            let mut map = serde_json::Map::new();
            map.insert(key.clone(), value);
            value = Value::Object(map);
        }

        let path = PropertyPath::parse(&keys.join(".")).unwrap();
        prop_assert_eq!(path.get_value(&value).unwrap(), json!(leaf));
    }

    /// Index segments past the end of an array read as null.
    #[test]
    fn out_of_range_index_reads_null(
        items in prop::collection::vec(any::<i32>(), 0..10),
        extra in 0usize..10,
    ) {
        let value = Value::from(items.clone());
        let path = PropertyPath::parse(&format!("[{}]", items.len() + extra)).unwrap();
        prop_assert_eq!(path.get_value(&value).unwrap(), Value::Null);
    }
}
