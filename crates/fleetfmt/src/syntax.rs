//! Declaration of the syntax tokens and nodes of the YAML tree.

#![allow(non_camel_case_types)]

/// Enum containing all the tokens and nodes in a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    WHITESPACE = 0,
    NEWLINE,
    COMMENT,
    /// `%YAML 1.2`, `%TAG ...`
    DIRECTIVE,
    /// `---`
    DOCUMENT_START,
    /// `...`
    DOCUMENT_END,
    /// `-` of a block sequence item.
    DASH,
    COLON,
    COMMA,
    BRACKET_START,
    BRACKET_END,
    BRACE_START,
    BRACE_END,
    /// `&anchor`
    ANCHOR,
    /// `!tag`, `!!str`, `!<verbatim>`
    TAG,
    /// `*anchor`
    ALIAS,
    PLAIN,
    SINGLE_QUOTED,
    DOUBLE_QUOTED,
    /// Header and body of a `|` or `>` scalar.
    BLOCK_SCALAR,
    ERROR,

    // composite types
    STREAM,
    DOCUMENT,
    MAPPING,
    ENTRY,
    KEY,
    SEQUENCE,
    ITEM,
    FLOW_MAPPING,
    FLOW_SEQUENCE,
    SCALAR,
}

impl SyntaxKind {
    /// Tokens that carry no data.
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | COMMENT)
    }

    /// Tokens holding the text of a scalar.
    pub fn is_scalar_token(self) -> bool {
        matches!(
            self,
            PLAIN | SINGLE_QUOTED | DOUBLE_QUOTED | BLOCK_SCALAR | ALIAS
        )
    }

    /// Nodes whose children are reorderable elements.
    pub fn is_collection(self) -> bool {
        matches!(self, MAPPING | SEQUENCE | FLOW_MAPPING | FLOW_SEQUENCE)
    }
}

use SyntaxKind::*;

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lang {}
impl rowan::Language for Lang {
    type Kind = SyntaxKind;
    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::SCALAR as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<Lang>;
pub type SyntaxToken = rowan::SyntaxToken<Lang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

pub fn stringify_syntax(
    indent: usize,
    element: SyntaxElement,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut buf: Vec<u8> = vec![];
    write_syntax(&mut buf, indent, element)?;
    Ok(std::str::from_utf8(&buf)?.to_string())
}

pub fn write_syntax<T: std::io::Write>(
    w: &mut T,
    indent: usize,
    element: SyntaxElement,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: SyntaxKind = element.kind();
    write!(w, "{:indent$}", "", indent = indent)?;
    match element {
        rowan::NodeOrToken::Node(node) => {
            writeln!(w, "{:?}@{:?}", kind, node.text_range())?;
            for child in node.children_with_tokens() {
                write_syntax(w, indent + 2, child)?;
            }
        }

        rowan::NodeOrToken::Token(token) => {
            writeln!(w, "{:?}@{:?} {:?}", kind, token.text_range(), token.text())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn test_kind_raw_roundtrip() {
        for kind in [WHITESPACE, PLAIN, ERROR, STREAM, ENTRY, SCALAR] {
            assert_eq!(Lang::kind_from_raw(Lang::kind_to_raw(kind)), kind);
        }
    }

    #[test]
    fn test_kind_classes() {
        assert!(COMMENT.is_trivia());
        assert!(!DASH.is_trivia());
        assert!(DOUBLE_QUOTED.is_scalar_token());
        assert!(!TAG.is_scalar_token());
        assert!(FLOW_SEQUENCE.is_collection());
        assert!(!ENTRY.is_collection());
    }
}
