//! Selectors and the accessors they resolve to.
//!
//! A [`Selector`] describes how to pull a value out of an item: a property
//! path string, an [`Expression`], a closure, or nothing at all. Operators
//! hand selectors to a [`ResolverChain`](crate::ResolverChain), which turns
//! them into an [`Accessor`].

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::value::Value;

/// A resolved `item -> value` function.
///
/// Cloning is cheap; clones share the same closure.
#[derive(Clone)]
pub struct Accessor(Rc<dyn Fn(&Value) -> Result<Value>>);

impl Accessor {
    /// Wraps a fallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + 'static,
    {
        Accessor(Rc::new(f))
    }

    /// Wraps an infallible closure.
    pub fn infallible<F, T>(f: F) -> Self
    where
        F: Fn(&Value) -> T + 'static,
        T: Into<Value>,
    {
        Accessor::new(move |item| Ok(f(item).into()))
    }

    /// Returns the item unchanged.
    pub fn identity() -> Self {
        Accessor::new(|item| Ok(item.clone()))
    }

    /// Returns the same value for every item.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Accessor::new(move |_| Ok(value.clone()))
    }

    /// Applies the accessor to one item.
    pub fn call(&self, item: &Value) -> Result<Value> {
        (self.0)(item)
    }

    /// Applies the accessor and reads the result as a predicate outcome.
    pub fn test(&self, item: &Value) -> Result<bool> {
        Ok(self.call(item)?.is_truthy())
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// An expression evaluated against each item.
///
/// The item is bound to `variable`; every binding added with
/// [`bind`](Expression::bind) is visible to the expression as well.
///
/// ```
/// use enumerable::{Expression, Value};
///
/// let expr = Expression::new("item", "item.price * rate").bind("rate", 2);
/// assert_eq!(expr.variable(), "item");
/// assert_eq!(expr.bindings().get("rate"), Some(&Value::from(2)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    variable: String,
    source: String,
    bindings: IndexMap<String, Value>,
}

impl Expression {
    /// Creates an expression that sees the item as `variable`.
    pub fn new(variable: impl Into<String>, source: impl Into<String>) -> Self {
        Expression {
            variable: variable.into(),
            source: source.into(),
            bindings: IndexMap::new(),
        }
    }

    /// Adds a named value the expression can refer to.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bindings(&self) -> &IndexMap<String, Value> {
        &self.bindings
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.variable, self.source)
    }
}

/// Caller-supplied description of how to extract a value from an item.
#[derive(Debug, Clone, Default)]
pub enum Selector {
    /// No selector; operators pick their own default.
    #[default]
    Absent,
    /// A ready-made accessor. Never passed through the resolver chain.
    Callable(Accessor),
    /// A property path such as `"author.name"` or `"[0]"`.
    PropertyPath(String),
    /// An expression evaluated per item.
    Expression(Expression),
    /// Any other value; only custom resolvers can make sense of it.
    Other(Value),
}

impl Selector {
    /// Wraps an infallible closure.
    ///
    /// ```
    /// use enumerable::{Collection, Enumerable, Selector, Value};
    ///
    /// let doubled = Collection::from(vec![Value::from(1), Value::from(2)])
    ///     .select(Selector::func(|v: &Value| v.as_number().map(|n| n.to_f64() * 2.0)))
    ///     .unwrap();
    /// assert_eq!(doubled.to_vec(), vec![Value::from(2.0), Value::from(4.0)]);
    /// ```
    pub fn func<F, T>(f: F) -> Self
    where
        F: Fn(&Value) -> T + 'static,
        T: Into<Value>,
    {
        Selector::Callable(Accessor::infallible(f))
    }

    /// Wraps a fallible closure.
    pub fn try_func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + 'static,
    {
        Selector::Callable(Accessor::new(f))
    }

    /// Returns `true` if no selector was given.
    pub fn is_absent(&self) -> bool {
        matches!(self, Selector::Absent)
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Selector::Absent => "absent",
            Selector::Callable(_) => "callable",
            Selector::PropertyPath(_) => "property path",
            Selector::Expression(_) => "expression",
            Selector::Other(_) => "value",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Absent => f.write_str("<absent>"),
            Selector::Callable(_) => f.write_str("<callable>"),
            Selector::PropertyPath(path) => write!(f, "\"{}\"", path),
            Selector::Expression(expr) => write!(f, "{{{}}}", expr),
            Selector::Other(value) => write!(f, "{} {}", value.type_name(), value),
        }
    }
}

impl From<&str> for Selector {
    fn from(path: &str) -> Self {
        Selector::PropertyPath(path.to_string())
    }
}

impl From<String> for Selector {
    fn from(path: String) -> Self {
        Selector::PropertyPath(path)
    }
}

impl From<Expression> for Selector {
    fn from(expr: Expression) -> Self {
        Selector::Expression(expr)
    }
}

impl From<Accessor> for Selector {
    fn from(accessor: Accessor) -> Self {
        Selector::Callable(accessor)
    }
}

impl From<Value> for Selector {
    fn from(value: Value) -> Self {
        Selector::Other(value)
    }
}

impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(selector: Option<T>) -> Self {
        selector.map_or(Selector::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_helpers() {
        let item = Value::from(3);
        assert_eq!(Accessor::identity().call(&item).unwrap(), item);
        assert_eq!(Accessor::constant("x").call(&item).unwrap(), Value::from("x"));
        assert!(Accessor::identity().test(&item).unwrap());
        assert!(!Accessor::constant(0).test(&item).unwrap());
    }

    #[test]
    fn string_becomes_path() {
        assert!(matches!(Selector::from("a.b"), Selector::PropertyPath(p) if p == "a.b"));
    }

    #[test]
    fn none_becomes_absent() {
        assert!(Selector::from(None::<&str>).is_absent());
        assert!(matches!(Selector::from(Some("a")), Selector::PropertyPath(_)));
    }

    #[test]
    fn display_names_the_selector() {
        assert_eq!(Selector::from("a.b").to_string(), "\"a.b\"");
        assert_eq!(Selector::Other(Value::from(3)).to_string(), "number 3");
        assert_eq!(
            Selector::from(Expression::new("x", "x + 1")).to_string(),
            "{x => x + 1}"
        );
    }

    #[test]
    fn func_wraps_closure() {
        let selector = Selector::func(|v: &Value| v.as_str().map(str::len));
        match selector {
            Selector::Callable(accessor) => {
                assert_eq!(accessor.call(&Value::from("abc")).unwrap(), Value::from(3));
                assert_eq!(accessor.call(&Value::from(1)).unwrap(), Value::Null);
            }
            other => panic!("unexpected selector {:?}", other),
        }
    }
}
