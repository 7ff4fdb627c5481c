//! Span types returned by the resolver.

/// Zero-based line and byte column inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Range covered by a span. End column is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpanRange {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl SpanRange {
    pub const fn single_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start_line: line,
            start_col,
            end_line: line,
            end_col,
        }
    }

    pub const fn start(&self) -> TextPosition {
        TextPosition::new(self.start_line, self.start_col)
    }

    pub const fn end(&self) -> TextPosition {
        TextPosition::new(self.end_line, self.end_col)
    }
}

/// Text to translate as one unit, with the source range it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub range: SpanRange,
    /// Set for identifier and whole-token spans: callers split the text into
    /// words before translating.
    pub identifier_like: bool,
}
