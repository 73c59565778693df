//! Property path parsing and evaluation.
//!
//! A [`PropertyPath`] is a sequence of [`PathElement`]s parsed from strings
//! such as `"child.name"`, `"[0].name"`, `"tags[0]"` or `"[a][b]"`.

use std::fmt;
use std::str::FromStr;

use crate::error::{PathError, Result};
use crate::traverse::{Lookup, Traverse};

/// Separates the plural and singular spelling of an element (`items|item`).
/// Only the plural part takes part in traversal.
const SINGULAR_SEPARATOR: char = '|';

/// One segment of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Named property: `name` or `.name`.
    Property(String),
    /// Bracketed index: `[0]` or `[key]`.
    Index(String),
}

impl PathElement {
    /// Returns the raw segment text without brackets or dots.
    pub fn as_str(&self) -> &str {
        match self {
            PathElement::Property(name) | PathElement::Index(name) => name,
        }
    }

    /// Returns `true` if this is a bracketed index segment.
    pub fn is_index(&self) -> bool {
        matches!(self, PathElement::Index(_))
    }
}

/// A parsed property path.
///
/// # Example
///
/// ```
/// use enumerable_path::{PathElement, PropertyPath};
///
/// let path = PropertyPath::parse("author.books[0]").unwrap();
/// assert_eq!(
///     path.elements(),
///     &[
///         PathElement::Property("author".into()),
///         PathElement::Property("books".into()),
///         PathElement::Index("0".into()),
///     ]
/// );
/// assert_eq!(path.to_string(), "author.books[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    elements: Vec<PathElement>,
}

impl PropertyPath {
    /// Parses a property path.
    ///
    /// The first segment may be any run of characters other than `.` and `[`;
    /// later property segments must follow a `.` and consist of word
    /// characters. Bracketed segments may appear anywhere and must not be
    /// empty.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut elements = Vec::new();
        let mut pos = 0;

        while pos < path.len() {
            let rest = &path[pos..];

            if let Some(inner) = rest.strip_prefix('[') {
                match inner.find(']') {
                    Some(end) if end > 0 => {
                        elements.push(PathElement::Index(strip_singular(&inner[..end])));
                        pos += end + 2;
                    }
                    _ => return Err(unexpected(path, pos)),
                }
            } else if elements.is_empty() {
                let end = rest.find(|c: char| c == '.' || c == '[').unwrap_or(rest.len());
                if end == 0 {
                    return Err(unexpected(path, pos));
                }
                elements.push(PathElement::Property(strip_singular(&rest[..end])));
                pos += end;
            } else if let Some(inner) = rest.strip_prefix('.') {
                let end = inner
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(inner.len());
                if end == 0 {
                    return Err(unexpected(path, pos));
                }
                elements.push(PathElement::Property(inner[..end].to_string()));
                pos += end + 1;
            } else {
                return Err(unexpected(path, pos));
            }
        }

        Ok(PropertyPath { elements })
    }

    /// Returns the parsed segments.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of segments. A parsed path always has at least one.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`; parsing rejects empty paths.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Reads the value at the end of this path.
    ///
    /// Property segments must exist on the value they are read from.
    /// Index segments that are absent yield the null value; when more index
    /// segments follow an absent one they are absent too, but a property
    /// segment after an absent index is an error.
    pub fn get_value<T: Traverse>(&self, target: &T) -> Result<T> {
        let mut owned: Option<T> = None;
        let mut vacant = false;

        for element in &self.elements {
            if vacant {
                match element {
                    PathElement::Index(_) => continue,
                    PathElement::Property(property) => {
                        return Err(PathError::PropertyOnIndexed {
                            property: property.clone(),
                            type_name: "missing entry",
                        })
                    }
                }
            }

            let current = owned.as_ref().unwrap_or(target);
            match read_element(current, element)? {
                Some(next) => owned = Some(next),
                None => vacant = true,
            }
        }

        if vacant {
            return Ok(T::null());
        }
        Ok(owned.unwrap_or_else(T::null))
    }
}

fn read_element<T: Traverse>(target: &T, element: &PathElement) -> Result<Option<T>> {
    match element {
        PathElement::Index(index) => match target.read_index(index) {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Missing => Ok(None),
            Lookup::Unsupported => Err(PathError::NotIndexable {
                index: index.clone(),
                type_name: target.type_name(),
            }),
        },
        PathElement::Property(property) => match target.read_property(property) {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Missing => Err(PathError::NoSuchProperty {
                property: property.clone(),
                type_name: target.type_name(),
            }),
            Lookup::Unsupported if target.is_indexable() => Err(PathError::PropertyOnIndexed {
                property: property.clone(),
                type_name: target.type_name(),
            }),
            Lookup::Unsupported => Err(PathError::PropertyNotReadable {
                property: property.clone(),
                type_name: target.type_name(),
            }),
        },
    }
}

fn strip_singular(element: &str) -> String {
    match element.find(SINGULAR_SEPARATOR) {
        Some(pos) => element[..pos].to_string(),
        None => element.to_string(),
    }
}

fn unexpected(path: &str, position: usize) -> PathError {
    PathError::UnexpectedToken {
        path: path.to_string(),
        token: path[position..].chars().next().unwrap_or_default(),
        position,
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        PropertyPath::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Index(index) => write!(f, "[{}]", index)?,
                PathElement::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathElement::Property(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str) -> PathElement {
        PathElement::Property(name.to_string())
    }

    fn index(name: &str) -> PathElement {
        PathElement::Index(name.to_string())
    }

    mod parsing {
        use super::*;

        #[test]
        fn single_property() {
            let path = PropertyPath::parse("name").unwrap();
            assert_eq!(path.elements(), &[prop("name")]);
        }

        #[test]
        fn dotted_properties() {
            let path = PropertyPath::parse("b.a").unwrap();
            assert_eq!(path.elements(), &[prop("b"), prop("a")]);
        }

        #[test]
        fn leading_index() {
            let path = PropertyPath::parse("[0].b").unwrap();
            assert_eq!(path.elements(), &[index("0"), prop("b")]);
        }

        #[test]
        fn trailing_index() {
            let path = PropertyPath::parse("b[0]").unwrap();
            assert_eq!(path.elements(), &[prop("b"), index("0")]);
        }

        #[test]
        fn chained_indexes() {
            let path = PropertyPath::parse("[a][b]").unwrap();
            assert_eq!(path.elements(), &[index("a"), index("b")]);
        }

        #[test]
        fn singular_suffix_is_dropped() {
            let path = PropertyPath::parse("children|child[items|item]").unwrap();
            assert_eq!(path.elements(), &[prop("children"), index("items")]);
        }

        #[test]
        fn empty_path_rejected() {
            assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        }

        #[test]
        fn leading_dot_rejected() {
            let err = PropertyPath::parse(".a").unwrap_err();
            assert_eq!(
                err,
                PathError::UnexpectedToken {
                    path: ".a".into(),
                    token: '.',
                    position: 0
                }
            );
        }

        #[test]
        fn empty_brackets_rejected() {
            let err = PropertyPath::parse("a[]").unwrap_err();
            assert!(matches!(
                err,
                PathError::UnexpectedToken {
                    token: '[',
                    position: 1,
                    ..
                }
            ));
        }

        #[test]
        fn unclosed_bracket_rejected() {
            assert!(PropertyPath::parse("a[0").is_err());
        }

        #[test]
        fn double_dot_rejected() {
            let err = PropertyPath::parse("a..b").unwrap_err();
            assert!(matches!(err, PathError::UnexpectedToken { position: 1, .. }));
        }

        #[test]
        fn non_word_after_dot_rejected() {
            let err = PropertyPath::parse("a.b-c").unwrap_err();
            assert!(matches!(
                err,
                PathError::UnexpectedToken {
                    token: '-',
                    position: 3,
                    ..
                }
            ));
        }

        #[test]
        fn display_round_trips_canonical_paths() {
            for raw in ["a", "a.b", "[0].b", "b[0]", "[a][b]", "a.b[3].c"] {
                assert_eq!(PropertyPath::parse(raw).unwrap().to_string(), raw);
            }
        }

        #[test]
        fn from_str() {
            let path: PropertyPath = "x.y".parse().unwrap();
            assert_eq!(path.len(), 2);
            assert!(!path.is_empty());
        }
    }
}
