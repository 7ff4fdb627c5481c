//! Error types shared by the span engine and the translator seam.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by comment-translate core components.
///
/// Variants carry owned strings rather than source errors so the type stays
/// `Clone`: concurrent callers awaiting one shared translation all observe
/// the same failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Requested line lies past the end of the document.
    #[error("line {line} is out of range (document has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    /// The tokenizer rejected a line.
    #[error("tokenizer failed: {0}")]
    Tokenize(String),

    /// No grammar is registered for the language id.
    #[error("no grammar available for language '{0}'")]
    NoGrammar(String),

    /// Network or HTTP status failure talking to the translation provider.
    #[error("translation request failed: {0}")]
    Http(String),

    /// Provider answered with a body we could not interpret.
    #[error("invalid translation response: {0}")]
    InvalidResponse(String),

    /// Provider is suppressed after a recent failure.
    #[error("translation provider cooling down, retry in {}s", remaining.as_secs())]
    CoolingDown { remaining: Duration },

    /// Nothing to translate.
    #[error("empty text")]
    EmptyText,
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
