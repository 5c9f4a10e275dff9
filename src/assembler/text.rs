// assembler/text.rs
use std::fmt;

/// A position in source text. Both fields are zero-based; `column` counts characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open range of source text. An empty span (`start == end`) marks a point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextSpan {
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// Span of `start..end` columns on a single line.
    pub const fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(TextPosition::new(line, start), TextPosition::new(line, end))
    }
}
