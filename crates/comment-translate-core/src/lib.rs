//! Core of comment-translate.
//!
//! Resolves the comment, string literal or identifier under a cursor into
//! the span a user wants translated, and provides the supporting pieces the
//! language server builds on: a short-lived selection cache, a recency set,
//! settings and the translator seam.
//!
//! # Examples
//!
//! ```
//! use comment_translate_core::{LineTokens, ResolveOptions, SpanResolver, TextPosition, Token, Tokenizer};
//!
//! /// Treats every line as one line comment.
//! struct AllComments;
//!
//! impl Tokenizer for AllComments {
//!     type State = ();
//!
//!     fn initial_state(&self) {}
//!
//!     fn tokenize_line(&self, line: &str, _: &()) -> comment_translate_core::Result<LineTokens<()>> {
//!         let scopes = vec!["source".to_string(), "comment.line".to_string()];
//!         Ok(LineTokens {
//!             tokens: vec![Token::new(0, line.len(), scopes)],
//!             next_state: (),
//!         })
//!     }
//! }
//!
//! let mut resolver = SpanResolver::new("// Hello\n// world", AllComments);
//! let options = ResolveOptions { multi_line_merge: true, whole_token: false };
//! let span = resolver.resolve(TextPosition::new(0, 4), options).unwrap();
//! assert_eq!(span.text, "Hello world");
//! ```

pub mod classify;
pub mod error;
pub mod google;
pub mod humanize;
pub mod line_cache;
pub mod merge;
pub mod recent;
pub mod settings;
pub mod short_live;
pub mod span;
pub mod token;
pub mod translator;

#[cfg(test)]
mod test_utils;

pub use classify::{SpanClass, is_comment_filler};
pub use error::{CoreError, Result};
pub use google::GoogleTranslator;
pub use humanize::{humanize, to_identifier};
pub use line_cache::{LineCache, TokenRow};
pub use merge::{ResolveOptions, SpanResolver, continues_sentence, join_comment_lines};
pub use recent::RecentSet;
pub use settings::{Settings, SettingsPatch};
pub use short_live::ShortLive;
pub use span::{Span, SpanRange, TextPosition};
pub use token::{LineTokens, Token, Tokenizer};
pub use translator::{CachedTranslator, CooldownTranslator, Translator};
