//! Tokenizer seam.
//!
//! Syntax highlighting engines are external collaborators: anything that can
//! turn one line plus the state left behind by the previous line into a list
//! of scoped tokens plugs in through [`Tokenizer`].

use crate::error::Result;

/// A scoped region of a single line.
///
/// Offsets are byte offsets into the line text. `scopes` is ordered from the
/// outermost scope (e.g. `source.rust`) to the innermost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub scopes: Vec<String>,
}

impl Token {
    pub fn new(start: usize, end: usize, scopes: Vec<String>) -> Self {
        Self { start, end, scopes }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true when the token covers byte `offset`.
    pub fn covers(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Source text of the token within `line`.
    ///
    /// Out-of-bounds or non-boundary offsets yield an empty string instead of
    /// panicking.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.start..self.end).unwrap_or("")
    }
}

/// Result of tokenizing one line.
#[derive(Debug, Clone)]
pub struct LineTokens<S> {
    pub tokens: Vec<Token>,
    pub next_state: S,
}

/// Stateful, line-oriented tokenizer.
///
/// Must be deterministic: the same line and incoming state always produce
/// the same tokens and outgoing state.
pub trait Tokenizer {
    /// State carried from the end of one line to the start of the next.
    type State: Clone;

    /// State before the first line of a document.
    fn initial_state(&self) -> Self::State;

    /// Tokenizes `line` starting from `state`.
    fn tokenize_line(&self, line: &str, state: &Self::State) -> Result<LineTokens<Self::State>>;
}
