//! Ordering of mapping entries by the priority of their paths.
//!
//! Patterns are either rooted, `$[*].changes[*].type`, and match the
//! lookup path of an entry exactly, or unrooted, `*.type`, and match the
//! longest trailing part of it. Entries with a non-negative priority come
//! first, then entries without a priority, then entries with a negative
//! priority. Ties are broken by the path of the entry.

use super::edits::Edits;
use crate::dom::{path_of, Keys, Mapping};
use crate::syntax::SyntaxNode;

use indexmap::IndexMap;
use std::cmp::Ordering;

/// Priorities of path patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PriorityTable(IndexMap<String, i64>);

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: impl Into<String>, priority: i64) {
        self.0.insert(pattern.into(), priority);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The priority of a lookup path, `None` when no pattern matches.
    pub fn lookup(&self, path: &Keys) -> Option<i64> {
        self.0
            .get(path.dotted())
            .or_else(|| path.suffixes().find_map(|suffix| self.0.get(&suffix)))
            .copied()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for PriorityTable {
    fn from_iter<T: IntoIterator<Item = (S, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

pub(crate) fn canonical_order(root: &SyntaxNode, table: &PriorityTable) -> Edits {
    let mut edits = Edits::default();
    for mapping in root.descendants().filter_map(Mapping::cast) {
        let mut keyed: Vec<(usize, Option<i64>, String)> = mapping
            .entries()
            .enumerate()
            .map(|(i, entry)| {
                let path = path_of(entry.syntax());
                (i, table.lookup(&path.lookup()), path.to_string())
            })
            .collect();
        keyed.sort_by(|a, b| compare((a.1, a.2.as_str()), (b.1, b.2.as_str())));
        edits.permute(mapping.syntax(), keyed.into_iter().map(|(i, ..)| i).collect());
    }
    edits
}

fn compare(a: (Option<i64>, &str), b: (Option<i64>, &str)) -> Ordering {
    match (a.0, b.0) {
        (Some(pa), Some(pb)) if (pa < 0) == (pb < 0) => pa.cmp(&pb).then_with(|| a.1.cmp(b.1)),
        (Some(pa), _) if pa >= 0 => Ordering::Less,
        (Some(_), _) => Ordering::Greater,
        (None, Some(pb)) if pb >= 0 => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.1.cmp(b.1),
    }
}
