use super::{Entry, KeyOrIndex, Keys, Node, QueryError};
use crate::syntax::{SyntaxKind::*, SyntaxNode};

/// The `hops`-th parent of `node`, `None` when the root is reached first.
pub fn ancestor(node: &SyntaxNode, hops: usize) -> Option<SyntaxNode> {
    let mut current = node.clone();
    for _ in 0..hops {
        current = current.parent()?;
    }
    Some(current)
}

/// The path of `node` from the root of its tree.
///
/// Keys are the decoded key strings and indices are literal,
/// use [`Keys::lookup`] for the wildcard form.
pub fn path_of(node: &SyntaxNode) -> Keys {
    let mut segments = Vec::new();
    for n in node.ancestors() {
        match n.kind() {
            ENTRY => {
                let key = Entry::cast(n).and_then(|e| e.key_text()).unwrap_or_default();
                segments.push(KeyOrIndex::Key(key));
            }
            ITEM => segments.push(KeyOrIndex::Index(index_in_parent(&n))),
            _ if n.parent().map_or(false, |p| p.kind() == FLOW_SEQUENCE) => {
                segments.push(KeyOrIndex::Index(index_in_parent(&n)))
            }
            _ => {}
        }
    }
    Keys::new(segments.into_iter().rev())
}

fn index_in_parent(node: &SyntaxNode) -> usize {
    node.parent()
        .and_then(|p| p.children().position(|c| &c == node))
        .unwrap_or_default()
}

/// Finds the node at `keys` below `node`, the root `$` being `node` itself.
pub fn query(node: &Node, keys: &Keys) -> Result<Node, QueryError> {
    let mut current = node.clone();
    for key in keys.iter() {
        let next = match (key, &current) {
            (KeyOrIndex::Key(k), Node::Mapping(m)) => m.get(k),
            (KeyOrIndex::Index(i), Node::Sequence(s)) => s.values().nth(*i),
            _ => None,
        };
        current = next.ok_or_else(|| QueryError::NotFound(keys.clone()))?;
    }
    Ok(current)
}

/// Parses `expr` and [queries](query) it below `node`.
pub fn query_path(node: &Node, expr: &str) -> Result<Node, QueryError> {
    query(node, &expr.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::parser::parse;
    use crate::syntax::SyntaxKind;
    use pretty_assertions::assert_eq;

    const SRC: &str = r#"- version: "1.0.0"
  changes:
    - description: First
      type: enhancement
    - description: Second
      links: [a, b]
"#;

    /// The document of `SRC` as a root of its own, the way passes see it.
    fn tree() -> SyntaxNode {
        let syntax = parse(SRC).into_syntax();
        let doc = syntax.children().find(|n| n.kind() == DOCUMENT).unwrap();
        SyntaxNode::new_root(doc.green().into_owned())
    }

    fn scalar(root: &SyntaxNode, text: &str) -> SyntaxNode {
        root.descendants()
            .find(|n| n.kind() == SCALAR && n.to_string() == text)
            .unwrap()
    }

    #[test]
    fn test_ancestor() {
        let root = tree();
        let seq = root
            .descendants()
            .filter(|n| n.kind() == SEQUENCE)
            .nth(1)
            .unwrap();
        assert_eq!(ancestor(&seq, 0), Some(seq.clone()));
        assert_eq!(ancestor(&seq, 1).map(|n| n.kind()), Some(SyntaxKind::ENTRY));
        assert_eq!(ancestor(&seq, 2).map(|n| n.kind()), Some(SyntaxKind::MAPPING));

        let top = root.children().find(|n| n.kind() == SEQUENCE).unwrap();
        assert_eq!(ancestor(&top, 1), Some(root.clone()));
        assert_eq!(ancestor(&top, 2), None);
        assert_eq!(ancestor(&seq, 5).map(|n| n.kind()), Some(SyntaxKind::DOCUMENT));
        assert_eq!(ancestor(&seq, 6), None);

        let stream = parse(SRC).into_syntax();
        let doc = stream.children().find(|n| n.kind() == DOCUMENT).unwrap();
        let top = doc.children().find(|n| n.kind() == SEQUENCE).unwrap();
        assert_eq!(ancestor(&top, 2).map(|n| n.kind()), Some(SyntaxKind::STREAM));
        assert_eq!(ancestor(&top, 3), None);
    }

    #[test]
    fn test_path_of() {
        let root = tree();
        let second = scalar(&root, "Second");
        assert_eq!(path_of(&second).dotted(), "$[0].changes[1].description");
        assert_eq!(path_of(&second).lookup().dotted(), "$[*].changes[*].description");

        let key = scalar(&root, "type");
        assert_eq!(path_of(&key).dotted(), "$[0].changes[0].type");

        let link = scalar(&root, "b");
        assert_eq!(path_of(&link).dotted(), "$[0].changes[1].links[1]");

        assert_eq!(path_of(&root).dotted(), "$");
    }

    #[test]
    fn test_query_path() {
        let root = Document::cast(tree()).unwrap().body().unwrap();
        let version = query_path(&root, "$[0].version").unwrap();
        assert_eq!(version.text_value(), "1.0.0");
        let change = query_path(&root, "$[0].changes[1]").unwrap();
        assert_eq!(query_path(&change, "$.description").unwrap().text_value(), "Second");
        assert!(matches!(
            query_path(&change, "$.name"),
            Err(QueryError::NotFound(_))
        ));
        assert!(matches!(
            query_path(&root, "name"),
            Err(QueryError::InvalidPath { .. })
        ));
    }
}
