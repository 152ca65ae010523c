//! Conversion of byte offsets into line and column positions.

use rowan::{TextRange, TextSize};

/// A zero-based position in a text.
///
/// `character` counts Unicode scalar values from the start of the line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u64,
    pub character: u64,
}

impl Position {
    pub fn new(line: u64, character: u64) -> Self {
        Self { line, character }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A range between two [`Position`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Maps byte offsets of a source text to positions.
#[derive(Debug, Clone)]
pub struct Mapper<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> Mapper<'s> {
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position(&self, offset: TextSize) -> Option<Position> {
        let offset = u32::from(offset) as usize;
        if offset > self.source.len() {
            return None;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let character = self.source.get(start..offset)?.chars().count();
        Some(Position::new(line as u64, character as u64))
    }

    pub fn range(&self, range: TextRange) -> Option<Range> {
        Some(Range {
            start: self.position(range.start())?,
            end: self.position(range.end())?,
        })
    }

    pub fn offset(&self, position: Position) -> Option<TextSize> {
        let start = *self.line_starts.get(position.line as usize)?;
        let line = &self.source[start..];
        let line = &line[..line.find('\n').unwrap_or(line.len())];
        let byte = match line.char_indices().nth(position.character as usize) {
            Some((i, _)) => i,
            None if line.chars().count() == position.character as usize => line.len(),
            None => return None,
        };
        Some(TextSize::from((start + byte) as u32))
    }
}
