//! Enumerable - LINQ-style query operators over in-memory sequences.
//!
//! Enumerable provides a chainable operator set (filter, map, sort, group,
//! join, aggregate) over three containers and any type implementing
//! [`Sequence`]:
//!
//! - [`Collection`]: an ordered list of [`Value`]s
//! - [`Dictionary`]: an insertion-ordered map of [`KeyValuePair`]s
//! - [`CharSequence`]: a string viewed as grapheme clusters
//!
//! Operators take a [`Selector`] describing what to extract from each item:
//! a property path such as `"author.name"`, an [`Expression`], a closure,
//! or nothing. A [`ResolverChain`] turns selectors into [`Accessor`]s and
//! can be extended with custom [`Resolver`]s.
//!
//! # Quick Start
//!
//! ```rust
//! use enumerable::{Collection, Enumerable, Expression, Selector, Sequence, Value};
//!
//! let books = Collection::from(vec![
//!     Value::map([("title", Value::from("Dune")), ("year", Value::from(1965))]),
//!     Value::map([("title", Value::from("Emma")), ("year", Value::from(1815))]),
//!     Value::map([("title", Value::from("Ubik")), ("year", Value::from(1969))]),
//! ]);
//!
//! // Property paths
//! let titles = books.order_by("year")?.select("title")?;
//! assert_eq!(titles.first(Selector::Absent)?, Some(Value::from("Emma")));
//!
//! // Expressions, with extra bindings
//! let modern = books.filter(Expression::new("book", "book.year > since").bind("since", 1900))?;
//! assert_eq!(modern.len(), 2);
//!
//! // Closures
//! let by_decade = books.group_by(Selector::func(|book: &Value| {
//!     book.as_map()
//!         .and_then(|b| b.get("year"))
//!         .and_then(|y| y.as_number())
//!         .map(|y| (y.to_f64() as i64 / 10) * 10)
//! }))?;
//! assert_eq!(by_decade.len(), 2);
//! # Ok::<(), enumerable::QueryError>(())
//! ```
//!
//! # Selector Resolution
//!
//! | Selector | Resolved by | Accessor |
//! |----------|-------------|----------|
//! | [`Selector::Absent`] | [`NullResolver`] | identity (a dictionary unwraps pair values) |
//! | [`Selector::Callable`] | returned as-is | the closure |
//! | [`Selector::PropertyPath`] | [`PropertyPathResolver`] | path lookup |
//! | [`Selector::Expression`] | [`ExpressionResolver`] | expression evaluation |
//! | [`Selector::Other`] | custom resolvers only | |
//!
//! Predicates treat `Null`, `false`, zero, `""`, `"0"` and empty lists or
//! maps as false.
//!
//! # Keys
//!
//! `distinct`, `group_by`, `to_dictionary`, `contains` and dictionary
//! storage compare keys by value, except for [`Object`]s, which compare by
//! identity: two separately built objects with equal fields are different
//! keys.

mod chars;
mod collection;
mod dictionary;
mod enumerable;
mod error;
mod grouping;
mod key;
mod ordering;
mod pair;
mod resolver;
mod selector;
mod sequence;
mod value;

pub use chars::CharSequence;
pub use collection::Collection;
pub use dictionary::Dictionary;
pub use enumerable::Enumerable;
pub use error::{QueryError, Result};
pub use grouping::Grouping;
pub use key::Key;
pub use ordering::{compare_values, Dir, OrderKey};
pub use pair::KeyValuePair;
pub use resolver::{
    CallbackResolver, ExpressionResolver, NullResolver, PropertyPathResolver, Resolver,
    ResolverChain,
};
pub use selector::{Accessor, Expression, Selector};
pub use sequence::Sequence;
pub use value::{Map, Number, Object, Value};

pub use enumerable_path::{PathError, PropertyPath};
