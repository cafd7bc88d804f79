//! Quoted/unquoted Sass strings (spec §3, §4.5).
//!
//! Code-point length is cached lazily the same way the Color module
//! caches its derived representation — via `once_cell::sync::OnceCell` —
//! since both are the two mutable fields spec §5 calls out as the
//! benign-race caches in the whole value system.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use codemap::Span;

use crate::error::SassResult;

/// The case-insensitive ASCII prefixes that make an unquoted string a
/// "special number" the serializer must not touch further (spec §4.5,
/// glossary "Special number").
const SPECIAL_NUMBER_PREFIXES: &[&str] = &["calc(", "clamp(", "var(", "env(", "max(", "min("];

#[derive(Debug, Clone)]
pub struct SassString {
    text: Arc<str>,
    has_quotes: bool,
    length_cache: Arc<OnceCell<usize>>,
}

static EMPTY_QUOTED: Lazy<SassString> = Lazy::new(|| SassString::new_uncached("", true));
static EMPTY_UNQUOTED: Lazy<SassString> = Lazy::new(|| SassString::new_uncached("", false));

impl SassString {
    fn new_uncached(text: impl Into<Arc<str>>, has_quotes: bool) -> Self {
        Self {
            text: text.into(),
            has_quotes,
            length_cache: Arc::new(OnceCell::new()),
        }
    }

    pub fn new(text: impl Into<Arc<str>>, has_quotes: bool) -> Self {
        let text = text.into();
        if text.is_empty() {
            return if has_quotes {
                EMPTY_QUOTED.clone()
            } else {
                EMPTY_UNQUOTED.clone()
            };
        }
        Self::new_uncached(text, has_quotes)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_quotes(&self) -> bool {
        self.has_quotes
    }

    /// Unicode scalar value count of `text`, computed on first access.
    pub fn sass_length(&self) -> usize {
        *self.length_cache.get_or_init(|| self.text.chars().count())
    }

    /// Converts a 1-based, negative-from-end Sass index into a 0-based
    /// code-point index. `0` and magnitudes beyond `sass_length` raise.
    pub fn sass_index_to_code_point_index(&self, sass_index: i64, span: Span) -> SassResult<usize> {
        let length = self.sass_length() as i64;

        if sass_index == 0 {
            return Err((
                format!("{} is not a valid index for a string with no characters.", sass_index),
                span,
            )
                .into());
        }

        let zero_based = if sass_index > 0 {
            sass_index - 1
        } else {
            length + sass_index
        };

        if zero_based < 0 || zero_based >= length {
            return Err((
                format!(
                    "Invalid index {} for a string with {} characters.",
                    sass_index, length
                ),
                span,
            )
                .into());
        }

        Ok(zero_based as usize)
    }

    pub fn is_var(&self) -> bool {
        if self.has_quotes {
            return false;
        }
        let lower = self.text.to_ascii_lowercase();
        lower.starts_with("var(") && lower.len() >= "var(--_)".len()
    }

    pub fn is_special_number(&self) -> bool {
        if self.has_quotes {
            return false;
        }
        let lower = self.text.to_ascii_lowercase();
        if lower.len() < "min(_)".len() {
            return false;
        }
        SPECIAL_NUMBER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
    }

    pub fn is_blank(&self) -> bool {
        !self.has_quotes && self.text.is_empty()
    }

    /// Concatenates `text` with `other`'s CSS rendering (or its raw text,
    /// if `other` is itself a string); result keeps `self`'s quoting.
    pub fn plus(&self, other_text: &str) -> SassString {
        let mut combined = String::with_capacity(self.text.len() + other_text.len());
        combined.push_str(&self.text);
        combined.push_str(other_text);
        SassString::new(combined, self.has_quotes)
    }

    pub fn to_css_string(&self) -> String {
        if self.has_quotes {
            quote(&self.text)
        } else {
            self.text.to_string()
        }
    }
}

fn quote(text: &str) -> String {
    let quote_char = if text.contains('"') && !text.contains('\'') {
        '\''
    } else {
        '"'
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote_char);
    for c in text.chars() {
        if c == quote_char || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote_char);
    out
}

impl PartialEq for SassString {
    /// Ignores `has_quotes`: `"foo"` equals `foo` (spec §4.5).
    fn eq(&self, other: &Self) -> bool {
        *self.text == *other.text
    }
}

impl Eq for SassString {}

impl Hash for SassString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for SassString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap::CodeMap;

    fn span() -> Span {
        let mut map = CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn equality_ignores_quotes() {
        assert_eq!(SassString::new("foo", true), SassString::new("foo", false));
    }

    #[test]
    fn hash_matches_quote_ignoring_equality() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut h1 = DefaultHasher::new();
        SassString::new("foo", true).hash(&mut h1);
        let mut h2 = DefaultHasher::new();
        SassString::new("foo", false).hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn special_number_prefixes() {
        assert!(SassString::new("var(--x)", false).is_special_number());
        assert!(SassString::new("min(1px, 2px)", false).is_special_number());
        assert!(!SassString::new("var(--x)", true).is_special_number());
        assert!(!SassString::new("hello", false).is_special_number());
    }

    #[test]
    fn is_var_requires_enough_length() {
        assert!(SassString::new("var(--_)", false).is_var());
        assert!(!SassString::new("var()", false).is_var());
    }

    #[test]
    fn index_zero_is_invalid() {
        let s = SassString::new("hello", true);
        assert!(s.sass_index_to_code_point_index(0, span()).is_err());
    }

    #[test]
    fn index_extrema_are_valid() {
        let s = SassString::new("hello", true);
        assert_eq!(s.sass_index_to_code_point_index(1, span()).unwrap(), 0);
        assert_eq!(s.sass_index_to_code_point_index(5, span()).unwrap(), 4);
        assert_eq!(s.sass_index_to_code_point_index(-1, span()).unwrap(), 4);
        assert!(s.sass_index_to_code_point_index(6, span()).is_err());
        assert!(s.sass_index_to_code_point_index(-6, span()).is_err());
    }

    #[test]
    fn blank_is_unquoted_empty() {
        assert!(SassString::new("", false).is_blank());
        assert!(!SassString::new("", true).is_blank());
    }
}
