//! Changes computed by a pass against one tree, applied by rebuilding
//! the green tree in a single walk.

use crate::syntax::{SyntaxKind, SyntaxKind::*, SyntaxNode};
use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct Edits {
    /// New text of tokens.
    replace: HashMap<TextRange, String>,
    /// Whitespace inserted in front of tokens.
    prefix: HashMap<TextRange, String>,
    /// New order of the child nodes of collections, the child at slot `i`
    /// becomes the child found at slot `order[i]`.
    permute: HashMap<(SyntaxKind, TextRange), Vec<usize>>,
}

impl Edits {
    pub(crate) fn replace(&mut self, range: TextRange, text: String) {
        self.replace.insert(range, text);
    }

    pub(crate) fn prefix(&mut self, range: TextRange, text: String) {
        self.prefix.insert(range, text);
    }

    pub(crate) fn permute(&mut self, node: &SyntaxNode, order: Vec<usize>) {
        if order.iter().enumerate().any(|(i, &o)| i != o) {
            self.permute.insert((node.kind(), node.text_range()), order);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.replace.len() + self.prefix.len() + self.permute.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds a new green tree for `node` with the edits applied.
pub(crate) fn rebuild(node: &SyntaxNode, edits: &Edits) -> GreenNode {
    let elements: Vec<_> = node.children_with_tokens().collect();
    let slots: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.as_node().is_some())
        .map(|(i, _)| i)
        .collect();
    let order = edits.permute.get(&(node.kind(), node.text_range()));

    let mut children = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let element = match order {
            Some(order) => slots
                .iter()
                .position(|&s| s == i)
                .and_then(|slot| order.get(slot))
                .and_then(|&from| slots.get(from))
                .map_or(element, |&from| &elements[from]),
            None => element,
        };
        match element {
            NodeOrToken::Node(n) => children.push(NodeOrToken::Node(rebuild(n, edits))),
            NodeOrToken::Token(t) => {
                let range = t.text_range();
                if let Some(prefix) = edits.prefix.get(&range) {
                    children.push(NodeOrToken::Token(GreenToken::new(
                        WHITESPACE.into(),
                        prefix,
                    )));
                }
                let text = edits.replace.get(&range).map_or(t.text(), String::as_str);
                children.push(NodeOrToken::Token(GreenToken::new(t.kind().into(), text)));
            }
        }
    }
    GreenNode::new(node.kind().into(), children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use rowan::TextSize;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn test_rebuild_unchanged() {
        let src = "a: 1\n# c\nb: [x, y]\n";
        let root = parse(src).into_syntax();
        let green = rebuild(&root, &Edits::default());
        assert_eq!(SyntaxNode::new_root(green).to_string(), src);
    }

    #[test]
    fn test_rebuild_edits() {
        let root = parse("b: \"x\"\na: 1\n").into_syntax();
        let mapping = root.descendants().find(|n| n.kind() == MAPPING).unwrap();

        let mut edits = Edits::default();
        edits.replace(range(3, 6), "x".into());
        edits.prefix(range(7, 8), "  ".into());
        edits.permute(&mapping, vec![0, 1]);
        assert_eq!(edits.len(), 2);
        let out = SyntaxNode::new_root(rebuild(&root, &edits)).to_string();
        assert_eq!(out, "b: x\n  a: 1\n");

        let mut edits = Edits::default();
        edits.permute(&mapping, vec![1, 0]);
        let out = SyntaxNode::new_root(rebuild(&root, &edits)).to_string();
        assert_eq!(out, "a: 1\nb: \"x\"\n");
    }
}
