//! Token classification by TextMate scope prefixes.

use crate::token::Token;

const STRING_SCOPES: &[&str] = &["string.quoted", "constant.character.escape"];

const COMMENT_SCOPES: &[&str] = &[
    "punctuation.definition.comment",
    "comment.block",
    "comment.line",
];

const IDENTIFIER_SCOPES: &[&str] = &["entity", "variable", "support", "meta.object-literal.key"];

const COMMENT_FILLER_SCOPE: &str = "punctuation.whitespace.comment";

/// Semantic class of a token, as far as translation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanClass {
    /// String literal body or escape sequence; merged within one line.
    String,
    /// Comment text or delimiter; merged across lines.
    Comment,
    /// Identifier-ish token; never merged, humanized before translation.
    Identifier,
    Other,
}

fn starts_with_any(scope: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| scope.starts_with(prefix))
}

fn head_matches(scopes: &[String], prefixes: &[&str]) -> bool {
    scopes
        .last()
        .is_some_and(|scope| starts_with_any(scope, prefixes))
}

impl SpanClass {
    /// Classifies a scope path ordered outer to inner.
    ///
    /// Priority is string, then comment, then identifier.
    pub fn of(scopes: &[String]) -> Self {
        if Self::String.matches(scopes) {
            Self::String
        } else if Self::Comment.matches(scopes) {
            Self::Comment
        } else if Self::Identifier.matches(scopes) {
            Self::Identifier
        } else {
            Self::Other
        }
    }

    pub fn of_token(token: &Token) -> Self {
        Self::of(&token.scopes)
    }

    /// Whether `scopes` satisfies this class's own rule, ignoring priority.
    ///
    /// Merging continues over any token matching the seed's rule, so a
    /// comment token whose innermost scope is a string still extends a
    /// comment span.
    pub fn matches(self, scopes: &[String]) -> bool {
        match self {
            Self::String => head_matches(scopes, STRING_SCOPES),
            Self::Comment => scopes
                .iter()
                .any(|scope| starts_with_any(scope, COMMENT_SCOPES)),
            Self::Identifier => head_matches(scopes, IDENTIFIER_SCOPES),
            Self::Other => false,
        }
    }
}

/// Whitespace inside a comment region: skipped while merging comments.
pub fn is_comment_filler(scopes: &[String]) -> bool {
    scopes
        .last()
        .is_some_and(|scope| scope.starts_with(COMMENT_FILLER_SCOPE))
}
