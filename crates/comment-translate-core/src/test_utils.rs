//! Test tokenizer emitting TextMate-style scopes for a tiny C-like language.
//!
//! Supports `//` and `/* */` comments, double-quoted strings with backslash
//! escapes and identifiers. Counts invocations so tests can observe
//! retokenization.

use crate::error::Result;
use crate::token::{LineTokens, Token, Tokenizer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const ROOT: &str = "source.mini";
const LINE_COMMENT: &str = "comment.line.double-slash.mini";
const BLOCK_COMMENT: &str = "comment.block.mini";
const COMMENT_PUNCT: &str = "punctuation.definition.comment.mini";
const STRING: &str = "string.quoted.double.mini";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MiniState {
    pub(crate) in_block: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MiniTokenizer {
    calls: Arc<AtomicUsize>,
}

impl MiniTokenizer {
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

fn scopes(inner: &[&str]) -> Vec<String> {
    std::iter::once(ROOT)
        .chain(inner.iter().copied())
        .map(String::from)
        .collect()
}

fn run_end(line: &str, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    line[pos..]
        .char_indices()
        .find(|(_, c)| !pred(*c))
        .map_or(line.len(), |(i, _)| pos + i)
}

fn char_len_at(line: &str, pos: usize) -> usize {
    line[pos..].chars().next().map_or(1, char::len_utf8)
}

impl Tokenizer for MiniTokenizer {
    type State = MiniState;

    fn initial_state(&self) -> MiniState {
        MiniState::default()
    }

    fn tokenize_line(&self, line: &str, state: &MiniState) -> Result<LineTokens<MiniState>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut tokens = Vec::new();
        let mut in_block = state.in_block;

        if line.is_empty() {
            let scope = if in_block {
                scopes(&[BLOCK_COMMENT])
            } else {
                scopes(&[])
            };
            tokens.push(Token::new(0, 0, scope));
            return Ok(LineTokens {
                tokens,
                next_state: MiniState { in_block },
            });
        }

        let mut pos = 0;
        while pos < line.len() {
            let rest = &line[pos..];

            if in_block {
                if rest.starts_with("*/") {
                    tokens.push(Token::new(pos, pos + 2, scopes(&[BLOCK_COMMENT, COMMENT_PUNCT])));
                    pos += 2;
                    in_block = false;
                } else {
                    let end = rest.find("*/").map_or(line.len(), |i| pos + i);
                    tokens.push(Token::new(pos, end, scopes(&[BLOCK_COMMENT])));
                    pos = end;
                }
                continue;
            }

            if rest.starts_with("//") {
                tokens.push(Token::new(pos, pos + 2, scopes(&[LINE_COMMENT, COMMENT_PUNCT])));
                if pos + 2 < line.len() {
                    tokens.push(Token::new(pos + 2, line.len(), scopes(&[LINE_COMMENT])));
                }
                pos = line.len();
                continue;
            }

            if rest.starts_with("/*") {
                tokens.push(Token::new(pos, pos + 2, scopes(&[BLOCK_COMMENT, COMMENT_PUNCT])));
                pos += 2;
                in_block = true;
                continue;
            }

            let Some(c) = rest.chars().next() else {
                break;
            };

            if c == '"' {
                tokens.push(Token::new(
                    pos,
                    pos + 1,
                    scopes(&[STRING, "punctuation.definition.string.begin.mini"]),
                ));
                pos += 1;
                let mut chunk_start = pos;
                while pos < line.len() {
                    match line.as_bytes()[pos] {
                        b'\\' => {
                            if chunk_start < pos {
                                tokens.push(Token::new(chunk_start, pos, scopes(&[STRING])));
                            }
                            let mut end = pos + 1;
                            if end < line.len() {
                                end += char_len_at(line, end);
                            }
                            tokens.push(Token::new(
                                pos,
                                end,
                                scopes(&[STRING, "constant.character.escape.mini"]),
                            ));
                            pos = end;
                            chunk_start = pos;
                        }
                        b'"' => {
                            if chunk_start < pos {
                                tokens.push(Token::new(chunk_start, pos, scopes(&[STRING])));
                            }
                            tokens.push(Token::new(
                                pos,
                                pos + 1,
                                scopes(&[STRING, "punctuation.definition.string.end.mini"]),
                            ));
                            pos += 1;
                            chunk_start = pos;
                            break;
                        }
                        _ => pos += char_len_at(line, pos),
                    }
                }
                if chunk_start < pos {
                    tokens.push(Token::new(chunk_start, pos, scopes(&[STRING])));
                }
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let end = run_end(line, pos, |c| c.is_alphanumeric() || c == '_');
                tokens.push(Token::new(pos, end, scopes(&["variable.other.mini"])));
                pos = end;
                continue;
            }

            if c.is_whitespace() {
                let end = run_end(line, pos, char::is_whitespace);
                let scope = if pos == 0 && line[end..].starts_with("//") {
                    scopes(&["punctuation.whitespace.comment.leading.mini"])
                } else {
                    scopes(&[])
                };
                tokens.push(Token::new(pos, end, scope));
                pos = end;
                continue;
            }

            let end = pos + c.len_utf8();
            tokens.push(Token::new(pos, end, scopes(&[])));
            pos = end;
        }

        Ok(LineTokens {
            tokens,
            next_state: MiniState { in_block },
        })
    }
}
