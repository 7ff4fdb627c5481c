//! Custom protocol extensions.
//!
//! Server to client:
//! - `selectionContains`: asks the editor for the selected block enclosing a
//!   position.
//!
//! Client to server (registered in `main.rs`):
//! - `lastHover`: the most recent hover produced for a document.
//! - `translate`: translates free text into the configured language.
//! - `commentTranslate/translateSelection`: translates a selection for
//!   in-place replacement.
//! - `commentTranslate/recentLanguages`: recently used target languages.

use serde::{Deserialize, Serialize};
use tower_lsp_server::ls_types::request::Request;
use tower_lsp_server::ls_types::{Range, TextDocumentPositionParams, Uri};

/// Selection block reported by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBlock {
    pub comment: String,
    pub range: Range,
}

#[derive(Debug)]
pub enum SelectionContains {}

impl Request for SelectionContains {
    type Params = TextDocumentPositionParams;
    type Result = Option<SelectionBlock>;
    const METHOD: &'static str = "selectionContains";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastHoverParams {
    pub uri: Uri,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateParams {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateSelectionParams {
    pub text: String,
    /// Overrides the configured target language for this request.
    #[serde(default)]
    pub target_language: Option<String>,
    /// Treat the selection as an identifier: humanize before translating and
    /// re-case the result.
    #[serde(default)]
    pub humanize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateSelectionResult {
    pub translation: String,
    pub target_language: String,
}
