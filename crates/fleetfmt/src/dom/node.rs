use crate::syntax::{SyntaxKind::*, SyntaxNode, SyntaxToken};
use crate::util::quote::{decode, ScalarStyle};

use yaml_rust2::Yaml;

macro_rules! wrap_node {
    (
    $(#[$attrs:meta])*
    $vis:vis struct $name:ident => $($kind:ident)|+
    ) => {
        $(#[$attrs])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            syntax: SyntaxNode,
        }

        impl $name {
            pub fn cast(syntax: SyntaxNode) -> Option<Self> {
                match syntax.kind() {
                    $($kind)|+ => Some(Self { syntax }),
                    _ => None,
                }
            }

            pub fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

wrap_node! {
    /// One document of a stream, the root of every tree the passes work on.
    pub struct Document => DOCUMENT
}

wrap_node! {
    /// A block or flow mapping.
    pub struct Mapping => MAPPING | FLOW_MAPPING
}

wrap_node! {
    /// A key with its value, including the comment lines directly above it.
    pub struct Entry => ENTRY
}

wrap_node! {
    /// A block or flow sequence.
    pub struct Sequence => SEQUENCE | FLOW_SEQUENCE
}

wrap_node! {
    /// A `- value` element of a block sequence.
    pub struct Item => ITEM
}

wrap_node! {
    pub struct Scalar => SCALAR
}

/// A value node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Sequence),
}

impl Node {
    pub fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SCALAR => Scalar::cast(syntax).map(Node::Scalar),
            MAPPING | FLOW_MAPPING => Mapping::cast(syntax).map(Node::Mapping),
            SEQUENCE | FLOW_SEQUENCE => Sequence::cast(syntax).map(Node::Sequence),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Node::Scalar(v) => v.syntax(),
            Node::Mapping(v) => v.syntax(),
            Node::Sequence(v) => v.syntax(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        if let Self::Scalar(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        if let Self::Mapping(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        if let Self::Sequence(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// The string value of a scalar, or the source text of a collection.
    pub fn text_value(&self) -> String {
        match self {
            Node::Scalar(v) => v.text_value().unwrap_or_default(),
            _ => self.syntax().to_string(),
        }
    }
}

impl Document {
    pub fn body(&self) -> Option<Node> {
        self.syntax.children().find_map(Node::cast)
    }
}

impl Mapping {
    pub fn is_flow(&self) -> bool {
        self.syntax.kind() == FLOW_MAPPING
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry> {
        self.syntax.children().filter_map(Entry::cast)
    }

    /// The value of the first entry with the given key.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.entries()
            .find(|entry| entry.key_text().as_deref() == Some(key))
            .and_then(|entry| entry.value())
    }
}

impl Entry {
    pub fn key(&self) -> Option<Scalar> {
        self.syntax
            .children()
            .find(|n| n.kind() == KEY)?
            .children()
            .find_map(Scalar::cast)
    }

    pub fn key_text(&self) -> Option<String> {
        self.key()?.text_value()
    }

    pub fn value(&self) -> Option<Node> {
        self.syntax
            .children()
            .filter(|n| n.kind() != KEY)
            .find_map(Node::cast)
    }
}

impl Sequence {
    pub fn is_flow(&self) -> bool {
        self.syntax.kind() == FLOW_SEQUENCE
    }

    /// The nodes that make up the elements of the sequence: items of a block
    /// sequence, values of a flow sequence.
    pub fn elements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children()
    }

    pub fn values(&self) -> impl Iterator<Item = Node> {
        self.elements().filter_map(|element| match Item::cast(element.clone()) {
            Some(item) => item.value(),
            None => Node::cast(element),
        })
    }
}

impl Item {
    pub fn value(&self) -> Option<Node> {
        self.syntax.children().find_map(Node::cast)
    }
}

impl Scalar {
    /// The token holding the scalar text, `None` for an empty node.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_scalar_token())
    }

    pub fn style(&self) -> Option<ScalarStyle> {
        ScalarStyle::of(&self.token()?)
    }

    /// Whether the scalar carries a tag or an anchor.
    pub fn has_properties(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .any(|e| matches!(e.kind(), TAG | ANCHOR))
    }

    pub fn is_alias(&self) -> bool {
        self.token().map_or(false, |t| t.kind() == ALIAS)
    }

    pub fn is_key(&self) -> bool {
        self.syntax.parent().map_or(false, |p| p.kind() == KEY)
    }

    pub fn in_flow(&self) -> bool {
        self.syntax
            .ancestors()
            .any(|n| matches!(n.kind(), FLOW_MAPPING | FLOW_SEQUENCE))
    }

    /// The entry this scalar is the value of.
    pub fn entry(&self) -> Option<Entry> {
        Entry::cast(self.syntax.parent()?)
    }

    /// The decoded value, `None` for aliases, tagged or anchored scalars
    /// and empty nodes.
    pub fn value(&self) -> Option<Yaml> {
        if self.has_properties() || self.is_alias() {
            return None;
        }
        decode(self.token()?.text())
    }

    /// The decoded string, or the source text for scalars that are not strings.
    pub fn text_value(&self) -> Option<String> {
        let token = self.token()?;
        match self.value() {
            Some(Yaml::String(s)) => Some(s),
            _ => Some(token.text().to_string()),
        }
    }
}
