//! Conditional sorting of sequences.
//!
//! The order of a sequence may carry meaning, so a sequence is only sorted
//! when the predicate of the pass accepts its position in the tree.

use super::edits::Edits;
use crate::dom::{ancestor, query, Keys, Mapping, Node, Sequence};
use crate::syntax::{SyntaxKind::*, SyntaxNode};
use crate::util::mapper::{Mapper, Position};

use once_cell::sync::Lazy;
use std::cmp::Ordering;

static NAME: Lazy<Keys> = Lazy::new(|| Keys::root().join("name"));

/// Sorting of the sequences of a document.
///
/// Nothing is sorted unless both the predicate and the order are set.
#[derive(Debug, Clone, Default)]
pub struct ListSort {
    pub predicate: Option<SortPredicate>,
    pub order: Option<ListOrder>,
}

impl ListSort {
    pub fn new(predicate: SortPredicate, order: ListOrder) -> Self {
        Self {
            predicate: Some(predicate),
            order: Some(order),
        }
    }
}

/// Decides whether a sequence may be sorted.
#[derive(Clone, Copy)]
pub enum SortPredicate {
    /// Lists of field definitions: the top level list of a document and
    /// the lists held by a mapping with `type: group`.
    FieldGroup,
    Always,
    Custom(fn(&Sequence) -> bool),
}

impl SortPredicate {
    pub fn can_sort(&self, seq: &Sequence) -> bool {
        match self {
            SortPredicate::FieldGroup => is_field_group(seq),
            SortPredicate::Always => true,
            SortPredicate::Custom(f) => f(seq),
        }
    }
}

impl core::fmt::Debug for SortPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortPredicate::FieldGroup => f.write_str("FieldGroup"),
            SortPredicate::Always => f.write_str("Always"),
            SortPredicate::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Order of the elements of a sorted sequence. Elements the order does not
/// tell apart keep their source order.
#[derive(Clone, Copy)]
pub enum ListOrder {
    /// By the `name` field of mapping elements, elements without a name last.
    ByName,
    Custom(fn(&Node, &Node) -> Ordering),
}

impl ListOrder {
    pub fn compare(&self, a: Option<&Node>, b: Option<&Node>) -> Ordering {
        match self {
            ListOrder::ByName => match (a.and_then(name_of), b.and_then(name_of)) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ListOrder::Custom(f) => match (a, b) {
                (Some(a), Some(b)) => f(a, b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl core::fmt::Debug for ListOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOrder::ByName => f.write_str("ByName"),
            ListOrder::Custom(_) => f.write_str("Custom"),
        }
    }
}

fn name_of(node: &Node) -> Option<String> {
    query(node, &NAME).ok().map(|name| name.text_value())
}

fn is_field_group(seq: &Sequence) -> bool {
    match ancestor(seq.syntax(), 2) {
        None => ancestor(seq.syntax(), 1).map_or(false, |parent| parent.kind() == DOCUMENT),
        Some(owner) => Mapping::cast(owner)
            .and_then(|m| m.get("type"))
            .map_or(false, |t| t.text_value() == "group"),
    }
}

pub(crate) fn sort_lists(root: &SyntaxNode, sort: &ListSort) -> Edits {
    let mut edits = Edits::default();
    let (predicate, order) = match (&sort.predicate, &sort.order) {
        (Some(predicate), Some(order)) => (predicate, order),
        _ => return edits,
    };
    let text = root.to_string();
    let mapper = Mapper::new(&text);

    for seq in root.descendants().filter_map(Sequence::cast) {
        if !predicate.can_sort(&seq) {
            continue;
        }
        let mut elements: Vec<(usize, Option<Node>, Option<Position>)> = seq
            .elements()
            .enumerate()
            .map(|(i, element)| {
                let position = mapper.position(element.text_range().start());
                let value = match element.kind() {
                    ITEM => element.children().find_map(Node::cast),
                    _ => Node::cast(element),
                };
                (i, value, position)
            })
            .collect();
        elements.sort_by(|a, b| {
            order
                .compare(a.1.as_ref(), b.1.as_ref())
                .then_with(|| a.2.cmp(&b.2))
        });
        edits.permute(seq.syntax(), elements.into_iter().map(|(i, ..)| i).collect());
    }
    edits
}
