//! Ordered Sass lists (spec §3, §4.6).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use codemap::Span;

use crate::error::SassResult;

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Space,
    Comma,
    Slash,
    /// Only permitted when the list has at most one element (spec §3).
    Undecided,
}

#[derive(Debug, Clone)]
pub struct SassList {
    contents: Arc<Vec<Value>>,
    separator: ListSeparator,
    has_brackets: bool,
}

impl SassList {
    pub fn new(contents: Vec<Value>, separator: ListSeparator, has_brackets: bool) -> Self {
        // A multi-element list can't stay undecided; space is the least
        // marked default (spec §3: "undecided is permitted only when
        // length <= 1").
        let separator = if contents.len() > 1 && separator == ListSeparator::Undecided {
            ListSeparator::Space
        } else {
            separator
        };

        Self {
            contents: Arc::new(contents),
            separator,
            has_brackets,
        }
    }

    pub fn contents(&self) -> &[Value] {
        &self.contents
    }

    pub fn separator(&self) -> ListSeparator {
        self.separator
    }

    pub fn has_brackets(&self) -> bool {
        self.has_brackets
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Validates a 1-based, negative-from-end Sass index against this
    /// list's length.
    pub fn sass_index_for(&self, sass_index: i64, span: Span) -> SassResult<usize> {
        let length = self.contents.len() as i64;

        if sass_index == 0 || length == 0 {
            return Err((
                format!("Invalid index {} for a list with {} elements.", sass_index, length),
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
                format!("Invalid index {} for a list with {} elements.", sass_index, length),
                span,
            )
                .into());
        }

        Ok(zero_based as usize)
    }
}

impl PartialEq for SassList {
    fn eq(&self, other: &Self) -> bool {
        if self.has_brackets != other.has_brackets {
            return false;
        }
        // A single-element list's separator is irrelevant (spec §8
        // scenario 6); only multi-element lists compare separators.
        if self.contents.len() > 1 && other.contents.len() > 1 && self.separator != other.separator
        {
            return false;
        }
        *self.contents == *other.contents
    }
}

impl Eq for SassList {}

impl Hash for SassList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for item in self.contents.iter() {
            item.hash(state);
        }
        self.has_brackets.hash(state);
    }
}

impl fmt::Display for SassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_brackets {
            f.write_str("[")?;
        }
        let sep = match self.separator {
            ListSeparator::Comma => ", ",
            ListSeparator::Slash => " / ",
            ListSeparator::Space | ListSeparator::Undecided => " ",
        };
        for (i, item) in self.contents.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", item)?;
        }
        if self.has_brackets {
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::number::SassNumber;

    #[test]
    fn single_element_separator_is_irrelevant() {
        let a = SassList::new(
            vec![Value::Number(SassNumber::unitless(1.0))],
            ListSeparator::Comma,
            false,
        );
        let b = SassList::new(
            vec![Value::Number(SassNumber::unitless(1.0))],
            ListSeparator::Space,
            false,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn bracket_mismatch_is_unequal() {
        let a = SassList::new(vec![], ListSeparator::Undecided, true);
        let b = SassList::new(vec![], ListSeparator::Undecided, false);
        assert_ne!(a, b);
    }

    #[test]
    fn multi_element_list_cannot_stay_undecided() {
        let list = SassList::new(
            vec![
                Value::Number(SassNumber::unitless(1.0)),
                Value::Number(SassNumber::unitless(2.0)),
            ],
            ListSeparator::Undecided,
            false,
        );
        assert_ne!(list.separator(), ListSeparator::Undecided);
    }
}
