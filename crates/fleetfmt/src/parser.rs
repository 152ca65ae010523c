//! YAML parser.
//!
//! The parser is lossless: every byte of the input ends up in exactly one
//! token of the produced tree, so printing the tree gives back the source.

use crate::syntax::{SyntaxKind, SyntaxKind::*, SyntaxNode};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

macro_rules! with_node {
    ($builder:expr, $kind:ident, $($content:tt)*) => {
        {
            $builder.start_node($kind.into());
            let res = $($content)*;
            $builder.finish_node();
            res
        }
    };
}

/// A syntax error that can occur during parsing.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Error {
    /// The span of the error.
    pub range: TextRange,

    /// Human-friendly error message.
    pub message: String,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", &self.message, &self.range)
    }
}
impl std::error::Error for Error {}

/// Parse a YAML stream into a [Rowan green tree](rowan::GreenNode).
///
/// The parsing will not stop at unexpected or invalid tokens.
/// Instead errors will be collected with their character offsets and lengths,
/// and the invalid remainder of the source will be kept in a single
/// [`ERROR`](SyntaxKind::ERROR) token.
///
/// The parse will only fail if the source is not valid UTF-8 or
/// its length exceeds `u32::MAX`.
pub fn parse(source: &str) -> Parse {
    Parser::new(source).parse()
}

type ParserResult<T> = Result<T, ()>;

/// Where a block node appears, which decides what may follow on the
/// indicator's line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Document,
    MappingValue,
    SequenceItem,
}

/// A hand-written parser that scans the source directly
/// and constructs a Rowan green tree from it.
pub(crate) struct Parser<'p> {
    src: &'p str,
    pos: usize,
    builder: GreenNodeBuilder<'p>,
    errors: Vec<Error>,
}

impl<'p> Parser<'p> {
    pub(crate) fn new(source: &'p str) -> Self {
        Parser {
            src: source,
            pos: 0,
            builder: Default::default(),
            errors: Default::default(),
        }
    }

    fn parse(mut self) -> Parse {
        let _ = with_node!(self.builder, STREAM, self.parse_stream());

        Parse {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn parse_stream(&mut self) -> ParserResult<()> {
        loop {
            let res = with_node!(self.builder, DOCUMENT, self.parse_document());
            if res.is_err() {
                if self.pos < self.src.len() {
                    self.token(ERROR, self.src.len() - self.pos);
                }
                return res;
            }
            if self.pos >= self.src.len() {
                return Ok(());
            }
        }
    }

    fn parse_document(&mut self) -> ParserResult<()> {
        while let Some(p) = self.next_content(self.pos) {
            if self.column(p) != 0 || self.byte_at(p) != Some(b'%') {
                break;
            }
            self.trivia_until(p);
            let end = self.line_end(p);
            self.token(DIRECTIVE, end - p);
        }

        match self.next_content(self.pos) {
            Some(p) if self.is_marker(p, "---") => {
                self.trivia_until(p);
                self.token(DOCUMENT_START, 3);
                self.parse_block_node(-1, Context::Document)?;
            }
            Some(p) if !self.is_marker(p, "...") => {
                self.trivia_until(p);
                self.check_indent(p)?;
                let col = self.column(p);
                self.parse_block_content(-1, col)?;
            }
            _ => {}
        }

        match self.next_content(self.pos) {
            None => {
                self.trivia_until(self.src.len());
                Ok(())
            }
            Some(p) if self.is_marker(p, "...") => {
                self.trivia_until(p);
                self.token(DOCUMENT_END, 3);
                self.finish_line()?;
                if self.next_content(self.pos).is_none() {
                    self.trivia_until(self.src.len());
                }
                Ok(())
            }
            Some(p) if self.is_marker(p, "---") => {
                self.trivia_until(p);
                Ok(())
            }
            Some(p) => {
                self.trivia_until(p);
                self.report_error("unexpected content after the document")
            }
        }
    }

    /// Parses the node following an indicator (`:`, `-` or `---`).
    ///
    /// `indent` is the column of the collection owning the indicator,
    /// `-1` at the document level.
    fn parse_block_node(&mut self, indent: isize, ctx: Context) -> ParserResult<()> {
        self.skip_inline_ws();
        if self.props_then_line_end() {
            self.parse_properties(false)?;
        }
        if self.at_comment() {
            let end = self.line_end(self.pos);
            self.token(COMMENT, end - self.pos);
        }

        if self.at_eol() {
            let p = match self.next_content(self.pos) {
                Some(p) if !self.is_marker(p, "---") && !self.is_marker(p, "...") => p,
                _ => return Ok(()),
            };
            let col = self.column(p) as isize;
            let indentless = ctx == Context::MappingValue && col == indent && self.is_dash(p);
            if col < indent || (col == indent && !indentless) {
                return Ok(());
            }
            self.trivia_until(p);
            self.check_indent(p)?;
            return self.parse_block_content(indent, col as usize);
        }

        if ctx == Context::SequenceItem {
            let col = self.column(self.pos);
            if self.is_dash(self.pos) {
                return with_node!(self.builder, SEQUENCE, self.parse_block_sequence(col));
            }
            if self.is_implicit_key(self.pos) {
                return with_node!(self.builder, MAPPING, self.parse_block_mapping(col));
            }
        }

        self.parse_inline_value(indent, false)?;
        self.finish_line()
    }

    /// Parses a node starting on its own line at `col`.
    fn parse_block_content(&mut self, indent: isize, col: usize) -> ParserResult<()> {
        if self.is_dash(self.pos) {
            return with_node!(self.builder, SEQUENCE, self.parse_block_sequence(col));
        }
        if self.is_implicit_key(self.pos) {
            return with_node!(self.builder, MAPPING, self.parse_block_mapping(col));
        }
        self.parse_inline_value(indent, false)?;
        self.finish_line()
    }

    fn parse_block_mapping(&mut self, col: usize) -> ParserResult<()> {
        loop {
            with_node!(self.builder, ENTRY, self.parse_block_entry(col))?;

            let p = match self.next_content(self.pos) {
                Some(p) if !self.is_marker(p, "---") && !self.is_marker(p, "...") => p,
                _ => return Ok(()),
            };
            match self.column(p) {
                c if c < col => return Ok(()),
                c if c > col => {
                    self.trivia_until(p);
                    return self.report_error("bad indentation of a mapping entry");
                }
                _ => {}
            }
            if !self.is_implicit_key(p) {
                self.trivia_until(p);
                if self.byte_at(p) == Some(b'?') {
                    return self.report_error("complex mapping keys are not supported");
                }
                return self.report_error("expected a mapping key");
            }
            self.trivia_before_element(p);
        }
    }

    fn parse_block_entry(&mut self, col: usize) -> ParserResult<()> {
        self.leading_trivia()?;
        with_node!(self.builder, KEY, self.parse_key(false))?;
        self.skip_inline_ws();
        if self.byte() != Some(b':') {
            return self.report_error("expected ':'");
        }
        self.token(COLON, 1);
        self.parse_block_node(col as isize, Context::MappingValue)
    }

    fn parse_block_sequence(&mut self, col: usize) -> ParserResult<()> {
        loop {
            with_node!(self.builder, ITEM, self.parse_block_item(col))?;

            let p = match self.next_content(self.pos) {
                Some(p) if !self.is_marker(p, "---") && !self.is_marker(p, "...") => p,
                _ => return Ok(()),
            };
            match self.column(p) {
                c if c < col => return Ok(()),
                c if c > col => {
                    self.trivia_until(p);
                    return self.report_error("bad indentation of a sequence entry");
                }
                _ => {}
            }
            if !self.is_dash(p) {
                // a key at the column of an indentless sequence belongs to the parent mapping
                return Ok(());
            }
            self.trivia_before_element(p);
        }
    }

    fn parse_block_item(&mut self, col: usize) -> ParserResult<()> {
        self.leading_trivia()?;
        self.token(DASH, 1);
        self.parse_block_node(col as isize, Context::SequenceItem)
    }

    fn parse_key(&mut self, in_flow: bool) -> ParserResult<()> {
        with_node!(self.builder, SCALAR, self.parse_key_scalar(in_flow))
    }

    fn parse_key_scalar(&mut self, in_flow: bool) -> ParserResult<()> {
        match self.byte() {
            Some(b'"') | Some(b'\'') => self.parse_quoted(),
            Some(b'?') if self.is_blank_at(self.pos + 1) => {
                self.report_error("complex mapping keys are not supported")
            }
            _ => {
                let end = self.scan_plain_line(self.pos, in_flow);
                if end == self.pos {
                    return self.report_error("expected a mapping key");
                }
                self.token(PLAIN, end - self.pos);
                Ok(())
            }
        }
    }

    /// Parses a scalar, alias or flow collection, with its properties,
    /// starting on the current line.
    fn parse_inline_value(&mut self, indent: isize, in_flow: bool) -> ParserResult<()> {
        let checkpoint = self.builder.checkpoint();
        let has_props = self.parse_properties(in_flow)?;

        let kind = match self.byte() {
            Some(b'[') => FLOW_SEQUENCE,
            Some(b'{') => FLOW_MAPPING,
            _ => SCALAR,
        };
        self.builder.start_node_at(checkpoint, kind.into());
        let res = match kind {
            FLOW_SEQUENCE => self.parse_flow_sequence(),
            FLOW_MAPPING => self.parse_flow_mapping(),
            _ => self.parse_scalar(indent, in_flow, has_props),
        };
        self.builder.finish_node();
        res
    }

    fn parse_scalar(&mut self, indent: isize, in_flow: bool, has_props: bool) -> ParserResult<()> {
        match self.byte() {
            None | Some(b'\n') | Some(b'\r') if has_props => Ok(()),
            Some(b'#') if has_props => Ok(()),
            Some(b',') | Some(b']') | Some(b'}') if in_flow && has_props => Ok(()),
            Some(b'"') | Some(b'\'') => self.parse_quoted(),
            Some(b'*') => {
                let end = self.scan_name(self.pos + 1, in_flow);
                if end == self.pos + 1 {
                    return self.report_error("expected an alias name");
                }
                self.token(ALIAS, end - self.pos);
                Ok(())
            }
            Some(b'|') | Some(b'>') if !in_flow => match self.scan_block_scalar(self.pos, indent) {
                Some(end) => {
                    self.token(BLOCK_SCALAR, end - self.pos);
                    Ok(())
                }
                None => self.report_error("invalid block scalar header"),
            },
            Some(b'-') if self.is_dash(self.pos) => {
                self.report_error("block sequence entries are not allowed in this context")
            }
            Some(b'?') if self.is_blank_at(self.pos + 1) => {
                self.report_error("complex mapping keys are not supported")
            }
            Some(b'%') | Some(b'@') | Some(b'`') => {
                self.report_error("reserved indicators cannot start a plain scalar")
            }
            Some(b'#') | Some(b',') | Some(b'[') | Some(b']') | Some(b'{') | Some(b'}')
            | Some(b'|') | Some(b'>') => self.report_error("unexpected character"),
            None | Some(b'\n') | Some(b'\r') => self.report_error("expected a value"),
            _ => {
                let end = self.scan_plain(self.pos, indent, in_flow);
                if end == self.pos {
                    return self.report_error("expected a value");
                }
                self.token(PLAIN, end - self.pos);
                Ok(())
            }
        }
    }

    fn parse_quoted(&mut self) -> ParserResult<()> {
        let kind = if self.byte() == Some(b'"') {
            DOUBLE_QUOTED
        } else {
            SINGLE_QUOTED
        };
        match self.scan_quoted(self.pos) {
            Some(end) => {
                self.token(kind, end - self.pos);
                Ok(())
            }
            None => self.report_error("unterminated quoted scalar"),
        }
    }

    /// Emits anchors and tags, returns whether there were any.
    fn parse_properties(&mut self, in_flow: bool) -> ParserResult<bool> {
        let mut found = false;
        loop {
            let kind = match self.byte() {
                Some(b'&') => ANCHOR,
                Some(b'!') => TAG,
                _ => return Ok(found),
            };
            let end = if kind == TAG && self.byte_at(self.pos + 1) == Some(b'<') {
                match self.src[self.pos..].find('>') {
                    Some(i) => self.pos + i + 1,
                    None => return self.report_error("unterminated verbatim tag").map(|_| found),
                }
            } else {
                self.scan_name(self.pos + 1, in_flow)
            };
            if kind == ANCHOR && end == self.pos + 1 {
                return self.report_error("expected an anchor name").map(|_| found);
            }
            self.token(kind, end - self.pos);
            found = true;
            if in_flow {
                self.flow_trivia();
            } else {
                self.skip_inline_ws();
            }
        }
    }

    fn parse_flow_sequence(&mut self) -> ParserResult<()> {
        self.token(BRACKET_START, 1);
        loop {
            self.flow_trivia();
            match self.byte() {
                None => return self.report_error("unterminated flow sequence"),
                Some(b']') => {
                    self.token(BRACKET_END, 1);
                    return Ok(());
                }
                _ => {}
            }
            self.parse_inline_value(-1, true)?;
            self.flow_trivia();
            match self.byte() {
                None => return self.report_error("unterminated flow sequence"),
                Some(b',') => self.token(COMMA, 1),
                Some(b']') => {
                    self.token(BRACKET_END, 1);
                    return Ok(());
                }
                Some(b':') => {
                    return self.report_error("implicit mappings in flow sequences are not supported")
                }
                _ => return self.report_error("expected ',' or ']'"),
            }
        }
    }

    fn parse_flow_mapping(&mut self) -> ParserResult<()> {
        self.token(BRACE_START, 1);
        loop {
            self.flow_trivia();
            match self.byte() {
                None => return self.report_error("unterminated flow mapping"),
                Some(b'}') => {
                    self.token(BRACE_END, 1);
                    return Ok(());
                }
                _ => {}
            }
            with_node!(self.builder, ENTRY, self.parse_flow_entry())?;
            self.flow_trivia();
            match self.byte() {
                None => return self.report_error("unterminated flow mapping"),
                Some(b',') => self.token(COMMA, 1),
                Some(b'}') => {
                    self.token(BRACE_END, 1);
                    return Ok(());
                }
                _ => return self.report_error("expected ',' or '}'"),
            }
        }
    }

    fn parse_flow_entry(&mut self) -> ParserResult<()> {
        with_node!(self.builder, KEY, self.parse_key(true))?;
        self.skip_inline_ws();
        if self.byte() != Some(b':') {
            return Ok(());
        }
        self.token(COLON, 1);
        self.flow_trivia();
        match self.byte() {
            Some(b',') | Some(b'}') => Ok(()),
            _ => self.parse_inline_value(-1, true),
        }
    }

    /// Consumes blanks and a comment up to the end of the current line.
    fn finish_line(&mut self) -> ParserResult<()> {
        self.skip_inline_ws();
        if self.at_comment() {
            let end = self.line_end(self.pos);
            self.token(COMMENT, end - self.pos);
        }
        if self.at_eol() {
            Ok(())
        } else {
            self.report_error("unexpected content")
        }
    }

    /// Emits the trivia in front of an entry or item that starts the node.
    fn leading_trivia(&mut self) -> ParserResult<()> {
        if let Some(p) = self.next_content(self.pos) {
            self.trivia_until(p);
            self.check_indent(p)?;
        }
        Ok(())
    }

    /// Emits the trivia up to `target`, stopping in front of the comment
    /// lines directly above it at the same column.
    fn trivia_before_element(&mut self, target: usize) {
        let col = self.column(target);
        let mut split = target;
        let mut line = self.line_start(target);
        while line > 0 {
            let prev = self.line_start(line - 1);
            if prev < self.pos {
                break;
            }
            let text = &self.src[prev..self.line_end(prev)];
            let body = text.trim_start_matches(' ');
            if !body.starts_with('#') || text.len() - body.len() != col {
                break;
            }
            split = prev + col;
            line = prev;
        }
        self.trivia_until(split);
    }

    /// Emits whitespace, line break and comment tokens up to `target`.
    fn trivia_until(&mut self, target: usize) {
        while self.pos < target {
            match self.src.as_bytes()[self.pos] {
                b' ' | b'\t' => {
                    let len = self.src[self.pos..target]
                        .bytes()
                        .take_while(|b| matches!(b, b' ' | b'\t'))
                        .count();
                    self.token(WHITESPACE, len);
                }
                b'\r' if self.byte_at(self.pos + 1) == Some(b'\n') => self.token(NEWLINE, 2),
                b'\n' | b'\r' => self.token(NEWLINE, 1),
                b'#' => {
                    let end = self.line_end(self.pos).min(target);
                    self.token(COMMENT, end - self.pos);
                }
                _ => self.token(ERROR, target - self.pos),
            }
        }
    }

    fn flow_trivia(&mut self) {
        let mut end = self.pos;
        let bytes = self.src.as_bytes();
        while end < bytes.len() {
            match bytes[end] {
                b' ' | b'\t' | b'\n' | b'\r' => end += 1,
                b'#' if end == 0 || matches!(bytes[end - 1], b' ' | b'\t' | b'\n' | b'\r') => {
                    end = self.line_end(end)
                }
                _ => break,
            }
        }
        self.trivia_until(end);
    }

    fn skip_inline_ws(&mut self) -> usize {
        let len = self.src[self.pos..]
            .bytes()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        if len > 0 {
            self.token(WHITESPACE, len);
        }
        len
    }

    fn check_indent(&mut self, p: usize) -> ParserResult<()> {
        if self.src[self.line_start(p)..p].contains('\t') {
            self.report_error("tabs are not allowed as indentation")
        } else {
            Ok(())
        }
    }

    fn token(&mut self, kind: SyntaxKind, len: usize) {
        let text = &self.src[self.pos..self.pos + len];
        self.builder.token(kind.into(), text);
        self.pos += len;
    }

    fn report_error(&mut self, message: &str) -> ParserResult<()> {
        let err = self.build_error(message);
        self.add_error(&err);
        Err(())
    }

    fn build_error(&self, message: &str) -> Error {
        let start = self.pos.min(self.src.len());
        let line_end = self.line_end(start);
        let end = if line_end > start {
            line_end
        } else {
            (start + 1).min(self.src.len())
        };
        Error {
            range: TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32)),
            message: message.into(),
        }
    }

    fn add_error(&mut self, e: &Error) {
        if let Some(last_err) = self.errors.last_mut() {
            if last_err.range == e.range {
                return;
            }
        }
        self.errors.push(e.clone());
    }
}

// Lookahead helpers, none of them emit tokens.
impl<'p> Parser<'p> {
    fn byte(&self) -> Option<u8> {
        self.byte_at(self.pos)
    }

    fn byte_at(&self, at: usize) -> Option<u8> {
        self.src.as_bytes().get(at).copied()
    }

    /// Whitespace, a line break or the end of input.
    fn is_blank_at(&self, at: usize) -> bool {
        matches!(
            self.byte_at(at),
            None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
        )
    }

    fn at_eol(&self) -> bool {
        matches!(self.byte(), None | Some(b'\n') | Some(b'\r'))
    }

    fn at_comment(&self) -> bool {
        self.byte() == Some(b'#')
            && (self.pos == 0 || matches!(self.byte_at(self.pos - 1), Some(b' ' | b'\t' | b'\n')))
    }

    fn is_dash(&self, at: usize) -> bool {
        self.byte_at(at) == Some(b'-') && self.is_blank_at(at + 1)
    }

    fn is_marker(&self, at: usize, marker: &str) -> bool {
        self.column(at) == 0 && self.src[at..].starts_with(marker) && self.is_blank_at(at + 3)
    }

    fn line_start(&self, at: usize) -> usize {
        self.src[..at].rfind('\n').map_or(0, |i| i + 1)
    }

    /// Offset of the line break ending the line of `at`.
    fn line_end(&self, at: usize) -> usize {
        let end = self.src[at..].find('\n').map_or(self.src.len(), |i| at + i);
        if end > at && self.byte_at(end - 1) == Some(b'\r') && end < self.src.len() {
            end - 1
        } else {
            end
        }
    }

    fn column(&self, at: usize) -> usize {
        at - self.line_start(at)
    }

    /// Offset of the next byte that is not whitespace, a line break or part of a comment.
    fn next_content(&self, from: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' | b'\n' | b'\r' => i += 1,
                b'#' => i = self.line_end(i),
                _ => return Some(i),
            }
        }
        None
    }

    /// Properties followed by nothing but a comment on the current line.
    fn props_then_line_end(&self) -> bool {
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        let mut found = false;
        while matches!(bytes.get(i), Some(b'&') | Some(b'!')) {
            i = self.scan_name(i + 1, false);
            found = true;
            while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
                i += 1;
            }
        }
        found && matches!(bytes.get(i), None | Some(b'\n') | Some(b'\r') | Some(b'#'))
    }

    fn is_implicit_key(&self, p: usize) -> bool {
        let end = match self.byte_at(p) {
            Some(b'"') | Some(b'\'') => match self.scan_quoted(p) {
                Some(end) if !self.src[p..end].contains('\n') => end,
                _ => return false,
            },
            None
            | Some(b'[' | b'{' | b']' | b'}' | b',' | b'#' | b'&' | b'*' | b'!' | b'|' | b'>')
            | Some(b'%' | b'@' | b'`') => return false,
            Some(b'-' | b'?' | b':') if self.is_blank_at(p + 1) => return false,
            _ => self.scan_plain_line(p, false),
        };
        if end == p {
            return false;
        }
        let rest = self.src[end..].trim_start_matches([' ', '\t']);
        let colon = self.src.len() - rest.len();
        self.byte_at(colon) == Some(b':') && self.is_blank_at(colon + 1)
    }

    /// End of an anchor, alias or tag name starting at `from`.
    fn scan_name(&self, from: usize, in_flow: bool) -> usize {
        let len = self.src[from..]
            .bytes()
            .take_while(|b| {
                !matches!(b, b' ' | b'\t' | b'\n' | b'\r')
                    && !(in_flow && matches!(b, b',' | b'[' | b']' | b'{' | b'}'))
            })
            .count();
        from + len
    }

    fn scan_quoted(&self, p: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let quote = bytes[p];
        let mut i = p + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if quote == b'"' => i += 2,
                b'\'' if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') => i += 2,
                b if b == quote => return Some(i + 1),
                _ => i += 1,
            }
        }
        None
    }

    /// End of the plain scalar text on the line of `p`, trailing blanks excluded.
    fn scan_plain_line(&self, p: usize, in_flow: bool) -> usize {
        let bytes = self.src.as_bytes();
        let is_end = |at: usize| {
            matches!(
                bytes.get(at),
                None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
            ) || (in_flow && matches!(bytes.get(at), Some(b',' | b'[' | b']' | b'{' | b'}')))
        };
        let mut i = p;
        let mut end = p;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' | b'\r' => break,
                b':' if is_end(i + 1) => break,
                b'#' if i > p && matches!(bytes[i - 1], b' ' | b'\t') => break,
                b',' | b'[' | b']' | b'{' | b'}' if in_flow => break,
                b' ' | b'\t' => {
                    i += 1;
                    continue;
                }
                _ => {}
            }
            i += 1;
            end = i;
        }
        end
    }

    /// End of a possibly multi-line plain scalar. Continuation lines must be
    /// indented deeper than `indent` outside of flow collections.
    fn scan_plain(&self, p: usize, indent: isize, in_flow: bool) -> usize {
        let bytes = self.src.as_bytes();
        let mut end = self.scan_plain_line(p, in_flow);
        loop {
            let mut i = end;
            while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
                i += 1;
            }
            if !matches!(bytes.get(i), Some(b'\n') | Some(b'\r')) {
                return end;
            }
            while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\n' | b'\r')) {
                i += 1;
            }
            match bytes.get(i) {
                None | Some(b'#') => return end,
                Some(b',' | b']' | b'}') if in_flow => return end,
                Some(b':') if in_flow || self.is_blank_at(i + 1) => return end,
                Some(b'-') if !in_flow && self.is_dash(i) && self.column(i) as isize <= indent => {
                    return end
                }
                _ => {}
            }
            if self.is_marker(i, "---") || self.is_marker(i, "...") {
                return end;
            }
            if !in_flow && (self.column(i) as isize <= indent || self.is_implicit_key(i)) {
                return end;
            }
            let line_end = self.scan_plain_line(i, in_flow);
            if line_end == i {
                return end;
            }
            end = line_end;
        }
    }

    /// End of a literal or folded block scalar whose indicator is at `p`.
    ///
    /// Returns `None` when the header is malformed. Trailing blank lines
    /// belong to the scalar only with the keep (`+`) chomping indicator.
    fn scan_block_scalar(&self, p: usize, indent: isize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut i = p + 1;
        let mut explicit = None;
        let mut keep = false;
        for _ in 0..2 {
            match bytes.get(i) {
                Some(b'+') => keep = true,
                Some(b'-') => {}
                Some(d @ b'1'..=b'9') => explicit = Some((d - b'0') as usize),
                _ => break,
            }
            i += 1;
        }
        let header_end = self.line_end(i);
        let rest = &self.src[i..header_end];
        let trimmed = rest.trim_start_matches([' ', '\t']);
        if !trimmed.is_empty() && !(trimmed.starts_with('#') && trimmed.len() < rest.len()) {
            return None;
        }

        let min = (indent + 1).max(1) as usize;
        let mut content_indent = explicit.map(|d| if indent >= 0 { indent as usize + d } else { d });
        let mut end = header_end;
        let mut content_end = header_end;
        let mut line = match self.src[header_end..].find('\n') {
            Some(i) => header_end + i + 1,
            None => return Some(header_end),
        };
        while line < bytes.len() {
            let le = self.line_end(line);
            let text = &self.src[line..le];
            let spaces = text.len() - text.trim_start_matches(' ').len();
            if text.trim().is_empty() {
                end = le;
            } else {
                let ci = match content_indent {
                    Some(ci) => ci,
                    None if spaces >= min => spaces,
                    None => break,
                };
                content_indent = Some(ci);
                if spaces < ci {
                    break;
                }
                end = le;
                content_end = le;
            }
            match self.src[le..].find('\n') {
                Some(n) => line = le + n + 1,
                None => break,
            }
        }
        Some(if keep { end } else { content_end })
    }
}

/// The final results of a parsing.
/// It contains the green tree, and
/// the errors that ocurred during parsing.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green_node: GreenNode,
    pub errors: Vec<Error>,
}

impl Parse {
    /// Turn the parse into a syntax node.
    pub fn into_syntax(self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::stringify_syntax;
    use pretty_assertions::assert_eq;

    fn assert_lossless(src: &str) {
        let p = parse(src);
        assert_eq!(p.errors, vec![], "{src}");
        assert_eq!(p.into_syntax().to_string(), src);
    }

    fn first_error(src: &str) -> String {
        let p = parse(src);
        assert_eq!(p.clone().into_syntax().to_string(), src);
        p.errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_default()
    }

    fn kinds(src: &str, kind: SyntaxKind) -> Vec<String> {
        parse(src)
            .into_syntax()
            .descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_syntax_tree() {
        let syntax = parse("a: b\n").into_syntax();
        let dump = stringify_syntax(0, syntax.into()).unwrap();
        insta::assert_snapshot!(dump.trim_end(), @r###"
        STREAM@0..5
          DOCUMENT@0..5
            MAPPING@0..4
              ENTRY@0..4
                KEY@0..1
                  SCALAR@0..1
                    PLAIN@0..1 "a"
                COLON@1..2 ":"
                WHITESPACE@2..3 " "
                SCALAR@3..4
                  PLAIN@3..4 "b"
            NEWLINE@4..5 "\n"
        "###);
    }

    #[test]
    fn test_lossless() {
        assert_lossless("");
        assert_lossless("\n\n");
        assert_lossless("# only a comment\n");
        assert_lossless("a: 1\nb:\n  c: [1, 2, 3]\n  d: {x: 1, 'y': \"z\"}\n");
        assert_lossless("- a\n- b: c\n  d: e\n-\n- - nested\n  - more\n");
        assert_lossless("key:\n- indentless\n- sequence\nother: x\n");
        assert_lossless("text: |\n  line one\n\n  line three\nfolded: >-\n  a\n  b\nkeep: |+\n  x\n\n\nlast: y\n");
        assert_lossless("plain: this is\n  a multi line\n  plain scalar\nnext: 1\n");
        assert_lossless("quoted: \"multi\n  line\"\nsingle: 'it''s'\n");
        assert_lossless("anchor: &a value\nalias: *a\ntagged: !!str 123\nnested: &b\n  k: v\n");
        assert_lossless("%YAML 1.2\n---\na: 1\n...\n---\nb: 2\n");
        assert_lossless("---\n- x\n---\n- y\n");
        assert_lossless("json: {\"a\":1, \"b\": [true, null]}\n");
        assert_lossless("spread: [\n  one,\n  two, # comment\n]\n");
        assert_lossless("url: http://example.com:8080/path\ncolon:in: plain\n");
        assert_lossless("windows: line\r\nendings: here\r\n");
        assert_lossless("key: value # trailing comment\n# own line comment\nother: value\n");
        assert_lossless("empty:\nalso_empty: # comment\nlast:");
        assert_lossless("'quoted key': v\n\"double key\": w\n");
    }

    #[test]
    fn test_leading_comments_attach_to_entries() {
        let entries = kinds("a: 1\n# about b\nb: 2\n\n# detached\n\nc: 3\n", ENTRY);
        assert_eq!(entries, vec!["a: 1", "# about b\nb: 2", "c: 3"]);

        let items = kinds("list:\n  # head\n  - one\n  # about two\n  - two\n", ITEM);
        assert_eq!(items, vec!["- one", "# about two\n  - two"]);
    }

    #[test]
    fn test_structure() {
        assert_eq!(
            kinds("- name: a\n  type: keyword\n- name: b\n", MAPPING),
            vec!["name: a\n  type: keyword", "name: b"]
        );
        assert_eq!(kinds("k:\n- a\n- b\n", SEQUENCE), vec!["- a\n- b"]);
        assert_eq!(kinds("k: [a, {b: c}]\n", FLOW_MAPPING), vec!["{b: c}"]);
        assert_eq!(
            kinds("a: |\n  x\n  y\nb: z\n", SCALAR),
            vec!["a", "|\n  x\n  y", "b", "z"]
        );
        assert_eq!(kinds("a: x\n  y\n", SCALAR), vec!["a", "x\n  y"]);
        assert_eq!(kinds("a: !!str &x 1\n", SCALAR), vec!["a", "!!str &x 1"]);
        assert_eq!(kinds("- - a\n  - b\n", SEQUENCE), vec!["- - a\n  - b", "- a\n  - b"]);
    }

    #[test]
    fn test_multiple_documents() {
        let documents = kinds("a: 1\n---\nb: 2\n", DOCUMENT);
        assert_eq!(documents, vec!["a: 1\n", "---\nb: 2\n"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(first_error("a: 'open\n"), "unterminated quoted scalar");
        assert_eq!(first_error("a: b: c\n"), "unexpected content");
        assert_eq!(first_error("a: 1\n  b: 2\n"), "bad indentation of a mapping entry");
        assert_eq!(first_error("? complex\n: key\n"), "complex mapping keys are not supported");
        assert_eq!(
            first_error("a: [b: c]\n"),
            "implicit mappings in flow sequences are not supported"
        );
        assert_eq!(first_error("a: [b, c\n"), "unterminated flow sequence");
        assert_eq!(first_error("a:\n\tb: c\n"), "tabs are not allowed as indentation");
        assert_eq!(first_error("a: 1\n- b\n"), "expected a mapping key");
        assert_eq!(first_error("a: - b\n"), "block sequence entries are not allowed in this context");
        assert_eq!(first_error("a: @b\n"), "reserved indicators cannot start a plain scalar");
    }

    #[test]
    fn test_error_keeps_source() {
        let src = "a: 1\nb: 'unterminated\nc: 3\n";
        let p = parse(src);
        assert_eq!(p.errors.len(), 1);
        let syntax = p.into_syntax();
        assert_eq!(syntax.to_string(), src);
        assert!(syntax
            .descendants_with_tokens()
            .any(|e| e.kind() == ERROR));
    }
}
