//! Selector resolution.
//!
//! A [`ResolverChain`] holds an ordered list of [`Resolver`]s. Resolvers are
//! tried in order; the first one that returns an accessor wins. The default
//! chain holds three built-ins, in this order:
//!
//! | Resolver | Claims |
//! |----------|--------|
//! | [`NullResolver`] | [`Selector::Absent`], resolving to the identity accessor |
//! | [`PropertyPathResolver`] | [`Selector::PropertyPath`] |
//! | [`ExpressionResolver`] | [`Selector::Expression`] |
//!
//! Chains are plain values. Every sequence carries one and hands it on to
//! the sequences derived from it, so a resolver added to one sequence never
//! leaks into unrelated ones.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use enumerable_path::PropertyPath;
use minijinja::Environment;

use crate::error::{QueryError, Result};
use crate::selector::{Accessor, Expression, Selector};
use crate::value::Value;

/// A strategy that turns some selector shapes into accessors.
pub trait Resolver {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Attempts to resolve `selector`.
    ///
    /// Returns `Ok(None)` to decline, or an error when the selector is
    /// meant for this resolver but malformed.
    fn resolve(&self, selector: &Selector) -> Result<Option<Accessor>>;
}

/// Resolves an absent selector to the identity accessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl Resolver for NullResolver {
    fn name(&self) -> &str {
        "null"
    }

    fn resolve(&self, selector: &Selector) -> Result<Option<Accessor>> {
        Ok(selector.is_absent().then(Accessor::identity))
    }
}

/// Resolves path strings such as `"author.name"` through [`PropertyPath`].
///
/// The path is parsed once, when the selector is resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyPathResolver;

impl Resolver for PropertyPathResolver {
    fn name(&self) -> &str {
        "property-path"
    }

    fn resolve(&self, selector: &Selector) -> Result<Option<Accessor>> {
        let Selector::PropertyPath(raw) = selector else {
            return Ok(None);
        };
        let path = PropertyPath::parse(raw)?;
        Ok(Some(Accessor::new(move |item: &Value| {
            Ok(path.get_value(item)?)
        })))
    }
}

/// Resolves [`Expression`] selectors with minijinja's expression engine.
///
/// The item is serialized into the expression context under the
/// expression's variable name, next to its extra bindings. Results come
/// back through serde, so objects in the result lose their identity.
///
/// # Example
///
/// ```
/// use enumerable::{Expression, ExpressionResolver, Resolver, Selector, Value};
///
/// let resolver = ExpressionResolver::new();
/// let accessor = resolver
///     .resolve(&Selector::from(Expression::new("n", "n * k").bind("k", 3)))
///     .unwrap()
///     .unwrap();
/// assert_eq!(accessor.call(&Value::from(2)).unwrap(), Value::from(6));
/// ```
#[derive(Clone)]
pub struct ExpressionResolver {
    env: Rc<Environment<'static>>,
}

impl ExpressionResolver {
    /// Creates a resolver with a default minijinja environment.
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    /// Creates a resolver around a preconfigured environment, for example
    /// one with custom filters or functions registered.
    pub fn with_environment(env: Environment<'static>) -> Self {
        ExpressionResolver { env: Rc::new(env) }
    }

    /// Returns a reference to the environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the environment.
    ///
    /// Accessors resolved earlier keep the environment they were built with.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        Rc::make_mut(&mut self.env)
    }

    fn accessor(&self, expr: &Expression) -> Result<Accessor> {
        // Syntax errors surface here, before any item is read. A compiled
        // expression borrows its environment, so each call compiles again
        // from source.
        self.env.compile_expression(expr.source())?;

        let mut context = BTreeMap::new();
        for (name, value) in expr.bindings() {
            context.insert(name.clone(), minijinja::Value::from_serialize(value));
        }

        let env = Rc::clone(&self.env);
        let variable = expr.variable().to_string();
        let source = expr.source().to_string();
        Ok(Accessor::new(move |item: &Value| {
            let mut context = context.clone();
            context.insert(variable.clone(), minijinja::Value::from_serialize(item));
            let compiled = env.compile_expression(&source)?;
            let result = compiled.eval(&context)?;
            Ok(Value::from(serde_json::to_value(&result)?))
        }))
    }
}

impl Default for ExpressionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpressionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionResolver").finish_non_exhaustive()
    }
}

impl Resolver for ExpressionResolver {
    fn name(&self) -> &str {
        "expression"
    }

    fn resolve(&self, selector: &Selector) -> Result<Option<Accessor>> {
        match selector {
            Selector::Expression(expr) => self.accessor(expr).map(Some),
            _ => Ok(None),
        }
    }
}

type ResolveFn = Box<dyn Fn(&Selector) -> Option<Accessor>>;

/// Resolver backed by a closure.
///
/// # Example
///
/// ```
/// use enumerable::{Accessor, CallbackResolver, Resolver, Selector, Value};
///
/// // Resolve `Selector::Other(n)` to "multiply by n".
/// let resolver = CallbackResolver::new("scale", |selector| match selector {
///     Selector::Other(Value::Number(n)) => {
///         let factor = n.to_f64();
///         Some(Accessor::infallible(move |item: &Value| {
///             item.as_number().map(|v| v.to_f64() * factor)
///         }))
///     }
///     _ => None,
/// });
///
/// let accessor = resolver.resolve(&Selector::Other(Value::from(3))).unwrap().unwrap();
/// assert_eq!(accessor.call(&Value::from(2)).unwrap(), Value::from(6.0));
/// assert!(resolver.resolve(&Selector::from("a")).unwrap().is_none());
/// ```
pub struct CallbackResolver {
    name: String,
    callback: ResolveFn,
}

impl CallbackResolver {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Selector) -> Option<Accessor> + 'static,
    {
        CallbackResolver {
            name: name.into(),
            callback: Box::new(callback),
        }
    }
}

impl fmt::Debug for CallbackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackResolver")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Resolver for CallbackResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, selector: &Selector) -> Result<Option<Accessor>> {
        Ok((self.callback)(selector))
    }
}

thread_local! {
    static DEFAULT_CHAIN: ResolverChain = ResolverChain::builtin();
}

/// Ordered list of resolvers with first-match-wins semantics.
///
/// Cloning is cheap; clones share the resolver instances but not the list,
/// so modifying a clone leaves the original untouched.
///
/// # Example
///
/// ```
/// use enumerable::{Accessor, CallbackResolver, ResolverChain, Selector, Value};
///
/// let mut chain = ResolverChain::new();
/// assert_eq!(chain.names(), vec!["null", "property-path", "expression"]);
///
/// chain.prepend(CallbackResolver::new("always", |_| Some(Accessor::constant("hit"))));
/// let accessor = chain.resolve(&Selector::from("name")).unwrap();
/// assert_eq!(accessor.call(&Value::Null).unwrap(), Value::from("hit"));
///
/// chain.reset();
/// assert_eq!(chain.len(), 3);
/// ```
#[derive(Clone)]
pub struct ResolverChain {
    resolvers: Vec<Rc<dyn Resolver>>,
}

impl ResolverChain {
    /// Returns the default chain of built-in resolvers.
    pub fn new() -> Self {
        DEFAULT_CHAIN.with(Clone::clone)
    }

    /// Creates a chain with no resolvers. Only callables resolve.
    pub fn empty() -> Self {
        ResolverChain {
            resolvers: Vec::new(),
        }
    }

    fn builtin() -> Self {
        ResolverChain {
            resolvers: vec![
                Rc::new(NullResolver),
                Rc::new(PropertyPathResolver),
                Rc::new(ExpressionResolver::new()),
            ],
        }
    }

    /// Adds a resolver that runs before all others.
    pub fn prepend<R: Resolver + 'static>(&mut self, resolver: R) -> &mut Self {
        log::debug!("prepending resolver {}", resolver.name());
        self.resolvers.insert(0, Rc::new(resolver));
        self
    }

    /// Adds a resolver that runs after all others.
    pub fn append<R: Resolver + 'static>(&mut self, resolver: R) -> &mut Self {
        log::debug!("appending resolver {}", resolver.name());
        self.resolvers.push(Rc::new(resolver));
        self
    }

    /// Restores the built-in resolvers, dropping custom ones.
    pub fn reset(&mut self) -> &mut Self {
        log::debug!("resetting resolver chain ({} resolvers)", self.resolvers.len());
        *self = ResolverChain::new();
        self
    }

    /// Builder form of [`prepend`](Self::prepend).
    pub fn with_prepended<R: Resolver + 'static>(mut self, resolver: R) -> Self {
        self.prepend(resolver);
        self
    }

    /// Builder form of [`append`](Self::append).
    pub fn with_appended<R: Resolver + 'static>(mut self, resolver: R) -> Self {
        self.append(resolver);
        self
    }

    /// Number of resolvers in the chain.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns `true` if the chain has no resolvers.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolver names, in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Turns a selector into an accessor.
    ///
    /// Callables are returned as-is. Everything else goes through the
    /// resolvers in order; if all of them decline the selector is
    /// unresolvable.
    pub fn resolve(&self, selector: &Selector) -> Result<Accessor> {
        if let Selector::Callable(accessor) = selector {
            return Ok(accessor.clone());
        }

        for resolver in &self.resolvers {
            if let Some(accessor) = resolver.resolve(selector)? {
                log::trace!("resolver {} claimed {} selector", resolver.name(), selector.kind());
                return Ok(accessor);
            }
        }

        Err(QueryError::UnresolvableSelector {
            selector: selector.to_string(),
        })
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
