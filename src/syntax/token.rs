#![forbid(unsafe_code)]

//! Tokens, spans and source positions

use serde::Serialize;
use std::ops::Range;

/// A half-open byte range `start..end` in one source snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Creates a span; `start` and `end` are swapped if given out of order
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Span { start, end }
        } else {
            Span {
                start: end,
                end: start,
            }
        }
    }

    /// A zero-width span at `offset`
    pub fn empty(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A resolved source position (1-indexed line and column)
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Start and end positions of a finding or token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn span(&self) -> Span {
        Span::new(self.start.offset, self.end.offset)
    }
}

/// Maps byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { line_starts }
    }

    /// Number of lines; a trailing newline opens a final empty line
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset at which the 1-indexed `line` starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx).copied())
    }

    /// Resolves `offset` against `text`, clamping to the end of the text
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        Position {
            offset,
            line: line_idx + 1,
            column: text[line_start..offset].chars().count() + 1,
        }
    }
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Punctuator,
    Keyword,
    Identifier,
    Comment,
    String,
    Template,
    Numeric,
    RegularExpression,
    JsxText,
}

/// One token of a parse; immutable and superseded on re-parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position in the tree's token stream
    pub index: usize,
    pub kind: TokenKind,
    pub span: Span,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn location(&self) -> Location {
        Location {
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// True when both tokens share the line this one ends on and `other` starts on
    pub fn is_on_same_line(&self, other: &Token) -> bool {
        self.end.line == other.start.line
    }
}
