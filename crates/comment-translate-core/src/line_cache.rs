//! Incremental per-line tokenization cache.
//!
//! Rows are appended in document order, each row starting from the end
//! state of the row before it, so a query at line `n` only tokenizes the
//! lines between the last cached row and `n`.

use crate::error::{CoreError, Result};
use crate::token::{Token, Tokenizer};

/// Tokenization result for one document line.
#[derive(Debug, Clone)]
pub struct TokenRow<S> {
    pub start_state: S,
    pub tokens: Vec<Token>,
    pub end_state: S,
}

/// Document snapshot plus the tokenized prefix of its lines.
///
/// Invariant: `rows[i].start_state` is `rows[i - 1].end_state` and
/// `rows[0].start_state` is the tokenizer's initial state.
pub struct LineCache<T: Tokenizer> {
    tokenizer: T,
    lines: Vec<String>,
    rows: Vec<TokenRow<T::State>>,
    tokenized: usize,
}

impl<T: Tokenizer> LineCache<T> {
    /// Snapshots `text`, splitting on `\n` and dropping a trailing `\r`.
    pub fn new(text: &str, tokenizer: T) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            tokenizer,
            lines,
            rows: Vec::new(),
            tokenized: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Number of tokenizer invocations performed by this cache.
    pub fn tokenized_lines(&self) -> usize {
        self.tokenized
    }

    #[cfg(test)]
    fn cached_rows(&self) -> usize {
        self.rows.len()
    }

    /// Guarantees rows `0..=line` are populated.
    ///
    /// # Errors
    ///
    /// `LineOutOfRange` if `line` is past the document end, `Tokenize` if the
    /// tokenizer rejects one of the missing lines. Rows tokenized before the
    /// failure stay cached.
    pub fn ensure_tokenized(&mut self, line: usize) -> Result<()> {
        if line >= self.lines.len() {
            return Err(CoreError::LineOutOfRange {
                line,
                len: self.lines.len(),
            });
        }

        let mut state = match self.rows.last() {
            Some(row) => row.end_state.clone(),
            None => self.tokenizer.initial_state(),
        };

        for index in self.rows.len()..=line {
            let result = self.tokenizer.tokenize_line(&self.lines[index], &state)?;
            self.tokenized += 1;

            self.rows.push(TokenRow {
                start_state: state,
                tokens: result.tokens,
                end_state: result.next_state.clone(),
            });
            state = result.next_state;
        }

        Ok(())
    }

    /// Returns the row for `line`, tokenizing up to it first.
    pub fn row(&mut self, line: usize) -> Result<&TokenRow<T::State>> {
        self.ensure_tokenized(line)?;
        Ok(&self.rows[line])
    }

    /// Tokens of an already tokenized line.
    ///
    /// Returns an empty slice when `line` has not been tokenized yet; call
    /// [`ensure_tokenized`](Self::ensure_tokenized) first.
    pub fn tokens(&self, line: usize) -> &[Token] {
        self.rows.get(line).map_or(&[], |row| row.tokens.as_slice())
    }
}
