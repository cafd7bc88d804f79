//! `ArgumentList` — a `List` plus a keyword bag with one-shot access
//! tracking (spec §3, §4.6).
//!
//! The `keywords_accessed` flag is the one other mutable field in the
//! whole value system besides Color's/String's lazy caches (spec §5, §9)
//! — but unlike those it is genuinely state, not a memoized pure
//! computation, so it lives behind a plain `AtomicBool` rather than a
//! `OnceCell`: spec §9 explicitly sanctions "an interior atomic boolean
//! without breaking immutability semantics."

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use super::list::{ListSeparator, SassList};
use super::Value;

/// Folds a keyword name the way the teacher's `Identifier` type compares
/// names everywhere: hyphens and underscores are interchangeable
/// (`saolof-grass/tests/misc.rs::variable_interchangable_hypen_dash`).
pub fn normalize_keyword_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '_' { '-' } else { c })
        .collect()
}

#[derive(Debug)]
pub struct ArgList {
    list: SassList,
    keywords: Arc<IndexMap<String, Value>>,
    keywords_accessed: AtomicBool,
}

impl ArgList {
    pub fn new(contents: Vec<Value>, keywords: IndexMap<String, Value>, separator: ListSeparator) -> Self {
        let normalized = keywords
            .into_iter()
            .map(|(k, v)| (normalize_keyword_name(&k), v))
            .collect();
        Self {
            list: SassList::new(contents, separator, false),
            keywords: Arc::new(normalized),
            keywords_accessed: AtomicBool::new(false),
        }
    }

    pub fn as_list(&self) -> &SassList {
        &self.list
    }

    /// Marks `keywords_accessed` and returns the keyword map. This is
    /// the accessor the evaluator calls before deciding whether leftover
    /// keywords should raise "no argument named" (spec §4.6).
    pub fn keywords(&self) -> &IndexMap<String, Value> {
        self.keywords_accessed.store(true, Ordering::Relaxed);
        &self.keywords
    }

    /// Reads the keyword map without marking it accessed.
    pub fn keywords_without_marking(&self) -> &IndexMap<String, Value> {
        &self.keywords
    }

    pub fn keywords_accessed(&self) -> bool {
        self.keywords_accessed.load(Ordering::Relaxed)
    }

    pub fn get_keyword(&self, name: &str) -> Option<&Value> {
        self.keywords_without_marking().get(&normalize_keyword_name(name))
    }
}

impl Clone for ArgList {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            keywords: Arc::clone(&self.keywords),
            keywords_accessed: AtomicBool::new(self.keywords_accessed.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for ArgList {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list && *self.keywords == *other.keywords
    }
}

impl Eq for ArgList {}

impl Hash for ArgList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.list.hash(state);
        for (k, v) in self.keywords.iter() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl fmt::Display for ArgList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_names_fold_hyphen_and_underscore() {
        let mut keywords = IndexMap::new();
        keywords.insert("foo_bar".to_owned(), Value::Null);
        let args = ArgList::new(vec![], keywords, ListSeparator::Comma);
        assert!(args.get_keyword("foo-bar").is_some());
    }

    #[test]
    fn keywords_accessed_is_one_shot_and_monotonic() {
        let args = ArgList::new(vec![], IndexMap::new(), ListSeparator::Comma);
        assert!(!args.keywords_accessed());
        let _ = args.keywords();
        assert!(args.keywords_accessed());
        let _ = args.keywords_without_marking();
        assert!(args.keywords_accessed());
    }
}
