//! Ordered Sass maps (spec §3, §4.6).
//!
//! Backed by `indexmap::IndexMap`, the teacher's own choice for
//! order-preserving key lookup (`saolof-grass`'s `Scope`/`Environment`
//! types use the same crate for name tables) — generalized here to
//! Value-keyed maps.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use super::list::{ListSeparator, SassList};
use super::Value;

/// A `Value` that implements `Eq`/`Hash` via fuzzy-aware rules (Number's
/// canonical-quantity hash, String's quote-ignoring hash, etc.) is a
/// valid map key; `IndexMap` needs exactly that contract.
#[derive(Debug, Clone)]
pub struct SassMap {
    entries: Arc<IndexMap<Value, Value>>,
}

impl SassMap {
    pub fn new(entries: IndexMap<Value, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Builds a fresh list of space-separated two-element lists, one per
    /// entry, on every call (spec §4.6: "on each call", i.e. not cached).
    pub fn as_list(&self) -> SassList {
        let pairs = self
            .entries
            .iter()
            .map(|(k, v)| {
                Value::List(SassList::new(
                    vec![k.clone(), v.clone()],
                    ListSeparator::Space,
                    false,
                ))
            })
            .collect();
        SassList::new(pairs, ListSeparator::Comma, false)
    }
}

impl PartialEq for SassMap {
    /// Same entries, in the same order and multiplicity (spec §4.6).
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl Eq for SassMap {}

impl Hash for SassMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (k, v) in self.entries.iter() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl fmt::Display for SassMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::number::SassNumber;
    use crate::value::list::ListSeparator;

    #[test]
    fn empty_map_equals_empty_list() {
        let map = SassMap::new(IndexMap::new());
        let list = SassList::new(vec![], ListSeparator::Undecided, false);
        // Equality across variants is established at the Value facade
        // level; here we confirm the map's own empty-list view matches.
        assert_eq!(map.as_list().len(), list.len());
    }

    #[test]
    fn as_list_is_insertion_ordered() {
        let mut entries = IndexMap::new();
        entries.insert(
            Value::Number(SassNumber::unitless(2.0)),
            Value::Number(SassNumber::unitless(20.0)),
        );
        entries.insert(
            Value::Number(SassNumber::unitless(1.0)),
            Value::Number(SassNumber::unitless(10.0)),
        );
        let map = SassMap::new(entries);
        let list = map.as_list();
        match &list.contents()[0] {
            Value::List(pair) => {
                assert_eq!(pair.contents()[0], Value::Number(SassNumber::unitless(2.0)));
            }
            _ => panic!("expected pair list"),
        }
    }
}
