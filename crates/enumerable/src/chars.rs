//! Strings as sequences of grapheme clusters.
//!
//! [`CharSequence`] treats a string as a list of user-perceived characters
//! (extended grapheme clusters), so `"e\u{301}"` is one element, not two.
//! All positions taken or returned by its methods count graphemes.
//!
//! Case-insensitive variants compare grapheme by grapheme after Unicode
//! lowercasing. They never depend on a locale.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{QueryError, Result};
use crate::ordering::OrderKey;
use crate::resolver::ResolverChain;
use crate::sequence::Sequence;
use crate::value::Value;

/// Immutable string viewed as a sequence of graphemes.
///
/// Query operators return a `CharSequence` again, so every element they
/// produce must be a single grapheme.
///
/// # Example
///
/// ```
/// use enumerable::{CharSequence, Enumerable, Selector, Sequence, Value};
///
/// let text = CharSequence::from("Crème brûlée");
/// assert_eq!(text.len(), 12);
/// assert!(text.starts_with("CRÈME", true));
/// assert_eq!(text.index_of("brûlée", false), Some(6));
///
/// let vowels = text.filter(Selector::func(|c: &Value| {
///     c.as_str().map_or(false, |c| "aeiouèûé".contains(c))
/// }))?;
/// assert_eq!(vowels.as_str(), "èeûée");
/// assert_eq!(text.to_upper().as_str(), "CRÈME BRÛLÉE");
/// # Ok::<(), enumerable::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CharSequence {
    text: String,
    resolvers: ResolverChain,
    order: Vec<OrderKey>,
}

impl CharSequence {
    pub fn new(text: impl Into<String>) -> Self {
        CharSequence {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Builds a sequence from a string value or a list of single-grapheme
    /// strings. `Null` gives an empty sequence.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(text) => Ok(Self::new(text)),
            Value::List(items) => Ok(Self::new(join_graphemes(&items)?)),
            other => Err(QueryError::invalid_argument(format!(
                "expected a string or a list of characters, got a {}",
                other.type_name()
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// The graphemes of this string.
    pub fn to_char_array(&self) -> Vec<String> {
        self.text.graphemes(true).map(str::to_string).collect()
    }

    fn derive(&self, text: impl Into<String>) -> Self {
        CharSequence {
            text: text.into(),
            resolvers: self.resolvers.clone(),
            order: Vec::new(),
        }
    }

    fn grapheme_vec(&self) -> Vec<&str> {
        self.text.graphemes(true).collect()
    }

    pub fn contains(&self, needle: &str, ignore_case: bool) -> bool {
        self.index_of(needle, ignore_case).is_some()
    }

    pub fn starts_with(&self, prefix: &str, ignore_case: bool) -> bool {
        let haystack = fold(&self.text, ignore_case);
        let prefix = fold(prefix, ignore_case);
        haystack.len() >= prefix.len() && haystack[..prefix.len()] == prefix[..]
    }

    pub fn ends_with(&self, suffix: &str, ignore_case: bool) -> bool {
        let haystack = fold(&self.text, ignore_case);
        let suffix = fold(suffix, ignore_case);
        haystack.len() >= suffix.len() && haystack[haystack.len() - suffix.len()..] == suffix[..]
    }

    pub fn equals(&self, other: &str, ignore_case: bool) -> bool {
        fold(&self.text, ignore_case) == fold(other, ignore_case)
    }

    /// Grapheme position of the first occurrence of `needle`.
    pub fn index_of(&self, needle: &str, ignore_case: bool) -> Option<usize> {
        let haystack = fold(&self.text, ignore_case);
        let needle = fold(needle, ignore_case);
        let first = find_positions(&haystack, &needle).next();
        first
    }

    /// Grapheme position of the last occurrence of `needle`.
    pub fn last_index_of(&self, needle: &str, ignore_case: bool) -> Option<usize> {
        let haystack = fold(&self.text, ignore_case);
        let needle = fold(needle, ignore_case);
        let last = find_positions(&haystack, &needle).last();
        last
    }

    /// Left-pads with `padding` up to `total_width` graphemes.
    pub fn pad_left(&self, total_width: usize, padding: char) -> Self {
        let missing = total_width.saturating_sub(self.grapheme_vec().len());
        let mut text: String = std::iter::repeat(padding).take(missing).collect();
        text.push_str(&self.text);
        self.derive(text)
    }

    /// Right-pads with `padding` up to `total_width` graphemes.
    pub fn pad_right(&self, total_width: usize, padding: char) -> Self {
        let missing = total_width.saturating_sub(self.grapheme_vec().len());
        let mut text = self.text.clone();
        text.extend(std::iter::repeat(padding).take(missing));
        self.derive(text)
    }

    /// Removes `count` graphemes starting at `start`, or everything from
    /// `start` when `count` is `None`.
    pub fn remove(&self, start: usize, count: Option<usize>) -> Result<Self> {
        let graphemes = self.grapheme_vec();
        check_position(start, graphemes.len())?;
        let end = count.map_or(graphemes.len(), |count| {
            start.saturating_add(count).min(graphemes.len())
        });
        let mut text = graphemes[..start].concat();
        text.push_str(&graphemes[end..].concat());
        Ok(self.derive(text))
    }

    /// Inserts `value` before grapheme position `start`.
    pub fn insert(&self, start: usize, value: &str) -> Result<Self> {
        let graphemes = self.grapheme_vec();
        check_position(start, graphemes.len())?;
        let mut text = graphemes[..start].concat();
        text.push_str(value);
        text.push_str(&graphemes[start..].concat());
        Ok(self.derive(text))
    }

    /// Replaces every occurrence of `old` with `new`.
    pub fn replace(&self, old: &str, new: &str, ignore_case: bool) -> Self {
        if old.is_empty() {
            return self.derive(self.text.clone());
        }
        if !ignore_case {
            return self.derive(self.text.replace(old, new));
        }

        let graphemes = self.grapheme_vec();
        let haystack = fold(&self.text, true);
        let needle = fold(old, true);
        let mut text = String::new();
        let mut position = 0;
        while position < graphemes.len() {
            if haystack[position..].starts_with(&needle) {
                text.push_str(new);
                position += needle.len();
            } else {
                text.push_str(graphemes[position]);
                position += 1;
            }
        }
        self.derive(text)
    }

    /// Splits on `separator`, returning plain strings.
    pub fn split(&self, separator: &str) -> Vec<String> {
        if separator.is_empty() {
            return vec![self.text.clone()];
        }
        self.text.split(separator).map(str::to_string).collect()
    }

    /// Up to `length` graphemes starting at `start`; everything from
    /// `start` when `length` is `None`.
    pub fn sub_string(&self, start: usize, length: Option<usize>) -> Result<Self> {
        let graphemes = self.grapheme_vec();
        check_position(start, graphemes.len())?;
        let end = length.map_or(graphemes.len(), |length| {
            start.saturating_add(length).min(graphemes.len())
        });
        Ok(self.derive(graphemes[start..end].concat()))
    }

    pub fn to_lower(&self) -> Self {
        self.derive(self.text.to_lowercase())
    }

    pub fn to_upper(&self) -> Self {
        self.derive(self.text.to_uppercase())
    }

    /// Trims whitespace, or the given characters, from both ends.
    pub fn trim(&self, chars: Option<&str>) -> Self {
        match chars {
            None => self.derive(self.text.trim()),
            Some(chars) => self.derive(self.text.trim_matches(|c: char| chars.contains(c))),
        }
    }

    pub fn trim_start(&self, chars: Option<&str>) -> Self {
        match chars {
            None => self.derive(self.text.trim_start()),
            Some(chars) => self.derive(self.text.trim_start_matches(|c: char| chars.contains(c))),
        }
    }

    pub fn trim_end(&self, chars: Option<&str>) -> Self {
        match chars {
            None => self.derive(self.text.trim_end()),
            Some(chars) => self.derive(self.text.trim_end_matches(|c: char| chars.contains(c))),
        }
    }

    pub fn is_null_or_empty(text: Option<&str>) -> bool {
        text.map_or(true, str::is_empty)
    }

    pub fn is_null_or_white_space(text: Option<&str>) -> bool {
        text.map_or(true, |text| text.trim().is_empty())
    }

    /// Joins `parts` with `separator`.
    pub fn concatenate<I, S>(separator: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                text.push_str(separator);
            }
            text.push_str(part.as_ref());
        }
        Self::new(text)
    }
}

// Graphemes of `text`, lowercased when `ignore_case` is set.
fn fold(text: &str, ignore_case: bool) -> Vec<String> {
    text.graphemes(true)
        .map(|g| {
            if ignore_case {
                g.to_lowercase()
            } else {
                g.to_string()
            }
        })
        .collect()
}

fn find_positions<'a>(
    haystack: &'a [String],
    needle: &'a [String],
) -> impl Iterator<Item = usize> + 'a {
    let last_start = haystack.len().checked_sub(needle.len());
    (0..=last_start.unwrap_or(0))
        .filter(move |_| last_start.is_some())
        .filter(move |&start| haystack[start..start + needle.len()] == needle[..])
}

fn check_position(position: usize, len: usize) -> Result<()> {
    if position > len {
        return Err(QueryError::IndexOutOfRange {
            index: position,
            len,
        });
    }
    Ok(())
}

fn single_grapheme(value: &Value) -> Result<&str> {
    match value {
        Value::String(s) if s.graphemes(true).count() == 1 => Ok(s),
        Value::String(s) => Err(QueryError::invalid_argument(format!(
            "expected a single character, got \"{}\"",
            s
        ))),
        other => Err(QueryError::type_mismatch("string", other.type_name())),
    }
}

fn join_graphemes(items: &[Value]) -> Result<String> {
    let mut text = String::new();
    for item in items {
        text.push_str(single_grapheme(item)?);
    }
    Ok(text)
}

impl Sequence for CharSequence {
    type Output = CharSequence;

    fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn elements(&self) -> Cow<'_, [Value]> {
        Cow::Owned(self.text.graphemes(true).map(Value::from).collect())
    }

    fn get(&self, index: usize) -> Result<Value> {
        self.text
            .graphemes(true)
            .nth(index)
            .map(Value::from)
            .ok_or_else(|| QueryError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Replaces one grapheme. `value` must be a single grapheme.
    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let replacement = single_grapheme(&value)?;
        let mut graphemes = self.grapheme_vec();
        let len = graphemes.len();
        let slot = graphemes
            .get_mut(index)
            .ok_or(QueryError::IndexOutOfRange { index, len })?;
        *slot = replacement;
        self.text = graphemes.concat();
        Ok(())
    }

    fn resolvers(&self) -> &ResolverChain {
        &self.resolvers
    }

    fn resolvers_mut(&mut self) -> &mut ResolverChain {
        &mut self.resolvers
    }

    fn order_keys(&self) -> &[OrderKey] {
        &self.order
    }

    fn rebuild(&self, items: Vec<Value>, order: Vec<OrderKey>) -> Result<CharSequence> {
        Ok(CharSequence {
            text: join_graphemes(&items)?,
            resolvers: self.resolvers.clone(),
            order,
        })
    }
}

impl From<&str> for CharSequence {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for CharSequence {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl FromStr for CharSequence {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::new(s))
    }
}

impl From<CharSequence> for Value {
    fn from(chars: CharSequence) -> Self {
        Value::String(chars.text)
    }
}

impl fmt::Display for CharSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for CharSequence {
    fn eq(&self, other: &CharSequence) -> bool {
        self.text == other.text
    }
}

impl PartialEq<str> for CharSequence {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for CharSequence {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
