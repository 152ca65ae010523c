//! Raises the lines of a block mapping value that are not indented deeper
//! than the key of the value, such as indentless sequences and flow
//! collections spread over several lines.

use super::{edits::Edits, Options};
use crate::dom::Entry;
use crate::syntax::{SyntaxKind::*, SyntaxNode, SyntaxToken};
use crate::util::mapper::{Mapper, Position};

use rowan::{TextRange, TextSize};
use std::collections::HashMap;

#[derive(Debug)]
struct Line {
    start: usize,
    len: usize,
    indent: usize,
    blank: bool,
    /// Counts for the indentation of a value, comments do not.
    content: bool,
    /// The multi-line token the line starts inside of.
    inner: Option<SyntaxToken>,
}

fn lines(root: &SyntaxNode, text: &str, mapper: &Mapper) -> Vec<Line> {
    let at = |offset: usize| root.token_at_offset(TextSize::from(offset as u32)).right_biased();
    (0..mapper.line_count())
        .map(|line| {
            let start = mapper
                .offset(Position::new(line as u64, 0))
                .map_or(text.len(), |o| u32::from(o) as usize);
            let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
            let body = text[start..end].trim_end_matches('\r');
            let indent = body.len() - body.trim_start_matches(' ').len();
            let blank = body.trim().is_empty();
            Line {
                start,
                len: body.len(),
                indent,
                blank,
                content: !blank && at(start + indent).map_or(false, |t| t.kind() != COMMENT),
                inner: at(start).filter(|t| (u32::from(t.text_range().start()) as usize) < start),
            }
        })
        .collect()
}

pub(crate) fn normalize_indent(root: &SyntaxNode, options: &Options) -> Edits {
    let text = root.to_string();
    let mapper = Mapper::new(&text);
    let lines = lines(root, &text, &mapper);
    let mut shift = vec![0usize; lines.len()];

    for entry in root.descendants().filter_map(Entry::cast) {
        if entry.syntax().parent().map_or(true, |p| p.kind() != MAPPING) {
            continue;
        }
        let (key, end) = match (
            entry.key().and_then(|k| mapper.position(k.syntax().text_range().start())),
            mapper.position(entry.syntax().text_range().end()),
        ) {
            (Some(key), Some(end)) => (key, end),
            _ => continue,
        };
        let key_line = key.line as usize;
        let key_col = key.character as usize + shift[key_line];
        let value_lines = key_line + 1..end.line as usize + 1;

        let min = value_lines
            .clone()
            .filter(|&l| lines[l].content)
            .map(|l| lines[l].indent + shift[l])
            .min();
        if let Some(min) = min.filter(|&min| min <= key_col) {
            let delta = key_col + options.indent_width - min;
            tracing::trace!(line = key_line + 1, delta, "raising value indentation");
            for l in value_lines {
                shift[l] += delta;
            }
        }
    }

    let mut edits = Edits::default();
    let mut inner: HashMap<TextRange, (SyntaxToken, Vec<(usize, usize)>)> = HashMap::new();
    for (line, &by) in lines.iter().zip(&shift) {
        if by == 0 {
            continue;
        }
        match &line.inner {
            Some(token) => {
                let shifted = if token.kind() == BLOCK_SCALAR {
                    line.len > 0
                } else {
                    line.content
                };
                if shifted {
                    let at = line.start - u32::from(token.text_range().start()) as usize;
                    inner
                        .entry(token.text_range())
                        .or_insert_with(|| (token.clone(), Vec::new()))
                        .1
                        .push((at, by));
                }
            }
            None if line.blank => {}
            None => match root
                .token_at_offset(TextSize::from(line.start as u32))
                .right_biased()
            {
                Some(t) if t.kind() == WHITESPACE => {
                    edits.replace(t.text_range(), " ".repeat(by) + t.text())
                }
                Some(t) => edits.prefix(t.text_range(), " ".repeat(by)),
                None => {}
            },
        }
    }
    for (range, (token, inserts)) in inner {
        let mut text = token.text().to_string();
        for (at, by) in inserts.into_iter().rev() {
            text.insert_str(at, &" ".repeat(by));
        }
        edits.replace(range, text);
    }
    edits
}

#[cfg(test)]
mod tests {
    use crate::formatter::{format, Options};
    use pretty_assertions::assert_eq;

    fn indent(src: &str) -> String {
        let out = format(src, &[], &Options::default()).unwrap();
        assert_eq!(format(&out, &[], &Options::default()).unwrap(), out);
        out
    }

    #[test]
    fn test_flow_collections() {
        assert_eq!(
            indent("e:\n  s: [\n  \"key\",\n  \"value\"\n  ]\n"),
            "e:\n  s: [\n    \"key\",\n    \"value\"\n    ]\n"
        );
    }

    #[test]
    fn test_indentless_sequences() {
        assert_eq!(indent("key:\n- a\n- b\nother: c\n"), "key:\n  - a\n  - b\nother: c\n");
        assert_eq!(indent("a:\n- b:\n  - c\n"), "a:\n  - b:\n      - c\n");
    }

    #[test]
    fn test_comments_blank_lines_and_block_scalars() {
        assert_eq!(
            indent("k:\n# note\n- |\n  text\n\n   more\n"),
            "k:\n  # note\n  - |\n    text\n\n     more\n"
        );
    }

    #[test]
    fn test_indented_values_unchanged() {
        let src = "a:\n  b: [1,\n    2]\n  c:\n    - d\nlist:\n  - x\n";
        assert_eq!(indent(src), src);
    }

    #[test]
    fn test_indent_width() {
        let mut options = Options::default();
        options.indent_width = 4;
        assert_eq!(
            format("key:\n- a\n", &[], &options).unwrap(),
            "key:\n    - a\n"
        );
    }
}
