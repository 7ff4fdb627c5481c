//! TextMate-style grammars backed by syntect.
//!
//! [`GrammarRegistry`] maps LSP language ids onto the bundled syntect
//! syntaxes and hands out [`SyntectTokenizer`]s, which adapt syntect's
//! scope-stack operations into the flat token rows the span resolver reads.

use comment_translate_core::{CoreError, LineTokens, Result, SpanClass, Token, Tokenizer};
use std::sync::{Arc, OnceLock};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

/// Scope given to indentation in front of a comment.
const LEADING_COMMENT_WHITESPACE: &str = "punctuation.whitespace.comment.leading";

/// Language ids that do not match a syntect syntax name or extension.
fn language_aliases(language_id: &str) -> &'static [&'static str] {
    match language_id {
        "javascriptreact" | "typescript" | "typescriptreact" => &["JavaScript", "js"],
        "shellscript" | "shell" | "bash" | "zsh" => &["Bourne Again Shell (bash)", "sh"],
        "csharp" => &["C#", "cs"],
        "cpp" | "cuda-cpp" => &["C++", "cpp"],
        "objective-c" | "objective-cpp" => &["Objective-C", "m"],
        "python" => &["Python", "py"],
        "rust" => &["Rust", "rs"],
        "ruby" => &["Ruby", "rb"],
        "perl" => &["Perl", "pl"],
        "makefile" => &["Makefile", "make"],
        "latex" => &["LaTeX", "tex"],
        "jsonc" => &["JSON", "json"],
        "dockerfile" => &["Bourne Again Shell (bash)", "sh"],
        _ => &[],
    }
}

/// Lazily loaded set of bundled grammars.
#[derive(Default)]
pub struct GrammarRegistry {
    syntax_set: OnceLock<Arc<SyntaxSet>>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the grammar set, loading it on first use.
    ///
    /// Loading deserializes every bundled syntax and takes tens of
    /// milliseconds; call from a blocking context when warming up.
    pub fn syntax_set(&self) -> &Arc<SyntaxSet> {
        self.syntax_set.get_or_init(|| {
            tracing::debug!("loading bundled grammars");
            Arc::new(SyntaxSet::load_defaults_newlines())
        })
    }

    /// Creates a tokenizer for `language_id`.
    ///
    /// Plain text and unknown languages yield [`CoreError::NoGrammar`]:
    /// without scopes there is nothing to classify.
    pub fn tokenizer_for(&self, language_id: &str) -> Result<SyntectTokenizer> {
        let syntax_set = Arc::clone(self.syntax_set());
        let syntax = resolve_syntax(&syntax_set, language_id)
            .ok_or_else(|| CoreError::NoGrammar(language_id.to_string()))?;
        let initial = ParseState::new(syntax);

        Ok(SyntectTokenizer {
            syntax_set,
            initial,
        })
    }

    #[cfg(test)]
    fn supports(&self, language_id: &str) -> bool {
        resolve_syntax(self.syntax_set(), language_id).is_some()
    }
}

fn resolve_syntax<'a>(syntax_set: &'a SyntaxSet, language_id: &str) -> Option<&'a SyntaxReference> {
    let id = language_id.trim();
    if id.is_empty() || matches!(id, "plaintext" | "text" | "txt") {
        return None;
    }

    let found = std::iter::once(id)
        .chain(language_aliases(id).iter().copied())
        .find_map(|candidate| {
            syntax_set
                .find_syntax_by_name(candidate)
                .or_else(|| syntax_set.find_syntax_by_extension(candidate))
                .or_else(|| {
                    syntax_set
                        .syntaxes()
                        .iter()
                        .find(|syntax| syntax.name.eq_ignore_ascii_case(candidate))
                })
        })?;

    let plain_text = syntax_set.find_syntax_plain_text();
    (found.name != plain_text.name).then_some(found)
}

/// Parser state carried from one line to the next.
#[derive(Clone)]
pub struct SyntectState {
    parse: ParseState,
    scopes: ScopeStack,
}

/// Tokenizer over one syntect syntax.
pub struct SyntectTokenizer {
    syntax_set: Arc<SyntaxSet>,
    initial: ParseState,
}

impl Tokenizer for SyntectTokenizer {
    type State = SyntectState;

    fn initial_state(&self) -> SyntectState {
        SyntectState {
            parse: self.initial.clone(),
            scopes: ScopeStack::new(),
        }
    }

    fn tokenize_line(&self, line: &str, state: &SyntectState) -> Result<LineTokens<SyntectState>> {
        let mut parse = state.parse.clone();
        let mut scopes = state.scopes.clone();

        // Syntaxes loaded with newline support expect the terminator.
        let input = format!("{line}\n");
        let ops = parse
            .parse_line(&input, &self.syntax_set)
            .map_err(|e| CoreError::Tokenize(e.to_string()))?;

        let len = line.len();
        let mut tokens = Vec::new();
        let mut last = 0;

        for (offset, op) in ops {
            let offset = offset.min(len);
            if offset > last {
                tokens.push(Token::new(last, offset, scope_names(&scopes)));
                last = offset;
            }
            scopes
                .apply(&op)
                .map_err(|e| CoreError::Tokenize(format!("{e:?}")))?;
        }

        if last < len || tokens.is_empty() {
            tokens.push(Token::new(last, len, scope_names(&scopes)));
        }
        mark_leading_comment_whitespace(line, &mut tokens);

        Ok(LineTokens {
            tokens,
            next_state: SyntectState { parse, scopes },
        })
    }
}

/// Scopes the indentation before a comment as comment filler.
///
/// The bundled grammars leave that whitespace in the enclosing scope, which
/// would stop a comment merge at every indented line.
fn mark_leading_comment_whitespace(line: &str, tokens: &mut [Token]) {
    let Some(first_text) = tokens
        .iter()
        .position(|token| !token.is_empty() && !token.text(line).trim().is_empty())
    else {
        return;
    };
    if first_text == 0 || !SpanClass::Comment.matches(&tokens[first_text].scopes) {
        return;
    }

    for token in &mut tokens[..first_text] {
        if !token.is_empty() && !SpanClass::Comment.matches(&token.scopes) {
            token.scopes.push(LEADING_COMMENT_WHITESPACE.to_string());
        }
    }
}

fn scope_names(scopes: &ScopeStack) -> Vec<String> {
    scopes
        .as_slice()
        .iter()
        .map(|scope| scope.build_string())
        .collect()
}
