//! Property paths for nested dynamic values.
//!
//! This crate turns strings like `"author.name"`, `"[0].title"` or
//! `"[a][b]"` into a [`PropertyPath`] and reads the addressed value out of
//! anything implementing [`Traverse`].
//!
//! # Syntax
//!
//! | Segment | Meaning |
//! |---------|---------|
//! | `name` / `.name` | Named property; must exist |
//! | `[key]` | Index into a list or map; absent entries read as null |
//! | `items\|item` | Plural/singular spelling; only `items` is used |
//!
//! # Quick Start
//!
//! ```rust
//! use enumerable_path::PropertyPath;
//! use serde_json::json;
//!
//! let data = json!({"author": {"books": ["Dune", "Emma"]}});
//! let path = PropertyPath::parse("author.books[1]").unwrap();
//!
//! assert_eq!(path.get_value(&data).unwrap(), json!("Emma"));
//! ```

mod error;
mod path;
mod traverse;

pub use error::{PathError, Result};
pub use path::{PathElement, PropertyPath};
pub use traverse::{Lookup, Traverse};
