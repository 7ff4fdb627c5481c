//! Span merge engine.
//!
//! Starting from the token under the cursor, [`SpanResolver`] walks
//! backward and forward over neighbouring tokens of the same class and
//! rebuilds the logical unit the user wants translated:
//!
//! - string literals are rejoined within one line (escape sequences are
//!   separate tokens),
//! - comments are merged across lines, optionally joining lines that look
//!   like one sentence,
//! - identifiers (and any token in whole-token mode) stay a single token.

use std::collections::VecDeque;

use crate::classify::{SpanClass, is_comment_filler};
use crate::error::Result;
use crate::line_cache::LineCache;
use crate::settings::Settings;
use crate::span::{Span, SpanRange, TextPosition};
use crate::token::{Token, Tokenizer};

/// Per-query knobs, usually derived from [`Settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Join comment lines that continue a sentence with a space.
    pub multi_line_merge: bool,
    /// Treat any seed token not claimed by the string or comment rules as a
    /// whole-token span.
    pub whole_token: bool,
}

impl From<&Settings> for ResolveOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            multi_line_merge: settings.multi_line_merge,
            whole_token: settings.concise,
        }
    }
}

/// Result of a directional merge: one text fragment per line of `range`.
struct Merged {
    fragments: VecDeque<String>,
    range: SpanRange,
}

/// Resolves translatable spans for one document snapshot.
pub struct SpanResolver<T: Tokenizer> {
    lines: LineCache<T>,
}

impl<T: Tokenizer> SpanResolver<T> {
    pub fn new(text: &str, tokenizer: T) -> Self {
        Self {
            lines: LineCache::new(text, tokenizer),
        }
    }

    pub fn line_cache(&self) -> &LineCache<T> {
        &self.lines
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.line_text(line)
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Resolves the span at `position`, treating every failure as "no span".
    pub fn resolve(&mut self, position: TextPosition, options: ResolveOptions) -> Option<Span> {
        match self.try_resolve(position, options) {
            Ok(span) => span,
            Err(e) => {
                tracing::debug!(
                    line = position.line,
                    column = position.column,
                    "span resolution failed: {}",
                    e
                );
                None
            }
        }
    }

    /// Resolves the span at `position`.
    ///
    /// Returns `Ok(None)` when the position is outside the document, outside
    /// every token, or on a token that is not translatable.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn try_resolve(
        &mut self,
        position: TextPosition,
        options: ResolveOptions,
    ) -> Result<Option<Span>> {
        let line = position.line;
        let Some(line_len) = self.lines.line_text(line).map(str::len) else {
            return Ok(None);
        };
        if position.column == 0 || position.column > line_len {
            return Ok(None);
        }

        let Some(seed) = find_seed(&self.lines.row(line)?.tokens, position.column - 1) else {
            return Ok(None);
        };

        let seed_token = &self.lines.tokens(line)[seed];
        if is_comment_filler(&seed_token.scopes) {
            return Ok(None);
        }

        let span = match SpanClass::of_token(seed_token) {
            SpanClass::String => {
                let merged = self.merge(line, seed, SpanClass::String, line, line)?;
                Span {
                    text: merged.fragments.into_iter().collect(),
                    range: merged.range,
                    identifier_like: false,
                }
            }
            SpanClass::Comment => {
                let last_line = self.lines.line_count().saturating_sub(1);
                let merged = self.merge(line, seed, SpanClass::Comment, 0, last_line)?;
                Span {
                    text: join_comment_lines(
                        merged.fragments.iter().map(String::as_str),
                        options.multi_line_merge,
                    ),
                    range: merged.range,
                    identifier_like: false,
                }
            }
            class if class == SpanClass::Identifier || options.whole_token => {
                let text = self.lines.line_text(line).unwrap_or("");
                Span {
                    text: seed_token.text(text).to_string(),
                    range: SpanRange::single_line(line, seed_token.start, seed_token.end),
                    identifier_like: true,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(span))
    }

    /// Expands the seed over adjacent tokens matching `class`, bounded to
    /// `min_line..=max_line`.
    fn merge(
        &mut self,
        line: usize,
        seed: usize,
        class: SpanClass,
        min_line: usize,
        max_line: usize,
    ) -> Result<Merged> {
        let skip_filler = class == SpanClass::Comment;

        let seed_token = &self.lines.tokens(line)[seed];
        let seed_text = seed_token
            .text(self.lines.line_text(line).unwrap_or(""))
            .to_string();
        let mut range = SpanRange::single_line(line, seed_token.start, seed_token.end);
        let mut fragments = VecDeque::from([seed_text]);
        let mut first_line = line;

        // Backward: left within the line, then up.
        let mut current = line;
        let mut upto = seed;
        loop {
            let text = self.lines.line_text(current).unwrap_or("");
            let mut stopped = false;
            for token in self.lines.tokens(current)[..upto].iter().rev() {
                if skip_filler && is_comment_filler(&token.scopes) {
                    continue;
                }
                if !class.matches(&token.scopes) {
                    stopped = true;
                    break;
                }
                if let Some(fragment) = fragments.front_mut() {
                    fragment.insert_str(0, token.text(text));
                }
                range.start_line = current;
                range.start_col = token.start;
            }

            if stopped || current <= min_line {
                break;
            }
            current -= 1;
            upto = self.lines.row(current)?.tokens.len();
            fragments.push_front(String::new());
            first_line = current;
        }

        // Forward: right within the line, then down.
        let mut current = line;
        let mut from = seed + 1;
        loop {
            let text = self.lines.line_text(current).unwrap_or("");
            let mut stopped = false;
            for token in self.lines.tokens(current).iter().skip(from) {
                if skip_filler && is_comment_filler(&token.scopes) {
                    continue;
                }
                if !class.matches(&token.scopes) {
                    stopped = true;
                    break;
                }
                if let Some(fragment) = fragments.back_mut() {
                    fragment.push_str(token.text(text));
                }
                range.end_line = current;
                range.end_col = token.end;
            }

            if stopped || current >= max_line {
                break;
            }
            current += 1;
            self.lines.ensure_tokenized(current)?;
            from = 0;
            fragments.push_back(String::new());
        }

        // Lines visited without contributing a token are not part of the span.
        let last_line = first_line + fragments.len() - 1;
        for _ in first_line..range.start_line {
            fragments.pop_front();
        }
        for _ in range.end_line..last_line {
            fragments.pop_back();
        }

        Ok(Merged { fragments, range })
    }
}

/// Index of the non-empty token covering byte `offset`.
fn find_seed(tokens: &[Token], offset: usize) -> Option<usize> {
    tokens.iter().rposition(|token| token.covers(offset))
}

/// Strips leading `/`, `*` and space characters.
pub fn strip_comment_markers(line: &str) -> &str {
    line.trim_start_matches(['/', '*', ' '])
}

/// Sentence continuation heuristic for comment lines.
///
/// True when `previous` starts with an upper-case letter and does not end
/// with a period, and `next` starts with a lower-case letter.
pub fn continues_sentence(previous: &str, next: &str) -> bool {
    previous
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
        && !previous.ends_with('.')
        && next.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Joins comment lines into translation text.
///
/// Without `multi_line_merge` lines are joined verbatim with `\n`. With it,
/// comment markers are stripped and a line continuing the previous sentence
/// is joined with a single space.
pub fn join_comment_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    multi_line_merge: bool,
) -> String {
    let mut out = String::new();

    for (i, line) in lines.into_iter().enumerate() {
        let fragment = if multi_line_merge {
            strip_comment_markers(line)
        } else {
            line
        };

        if i > 0 {
            let previous = out.rsplit('\n').next().unwrap_or("");
            if multi_line_merge && continues_sentence(previous, fragment) {
                out.push(' ');
            } else {
                out.push('\n');
            }
        }
        out.push_str(fragment);
    }

    out
}
