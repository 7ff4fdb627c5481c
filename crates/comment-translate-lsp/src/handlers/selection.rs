//! Correlation of go-to-definition with the following hover.
//!
//! Editors that peek a definition send `textDocument/definition` and then a
//! hover for the same document. When the hover arrives within the selection
//! window, the text to translate is the block the editor has selected, which
//! only the client knows.

use crate::document::ServerState;
use crate::protocol::{SelectionBlock, SelectionContains};
use async_trait::async_trait;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::{GotoDefinitionParams, TextDocumentPositionParams};

/// Source of the client's current selection.
#[async_trait]
pub trait SelectionQuery: Send + Sync {
    async fn selection_containing(
        &self,
        position: &TextDocumentPositionParams,
    ) -> Option<SelectionBlock>;
}

#[async_trait]
impl SelectionQuery for Client {
    async fn selection_containing(
        &self,
        position: &TextDocumentPositionParams,
    ) -> Option<SelectionBlock> {
        match self.send_request::<SelectionContains>(position.clone()).await {
            Ok(block) => block,
            Err(e) => {
                tracing::debug!("selectionContains request failed: {}", e);
                None
            }
        }
    }
}

/// Client that never reports a selection.
pub struct NoSelection;

#[async_trait]
impl SelectionQuery for NoSelection {
    async fn selection_containing(&self, _: &TextDocumentPositionParams) -> Option<SelectionBlock> {
        None
    }
}

/// Records a definition request so the next hover on the document within
/// the window consults the selection.
pub fn handle_definition(state: &ServerState, params: &GotoDefinitionParams) {
    let uri = &params.text_document_position_params.text_document.uri;
    tracing::debug!("definition requested in {:?}", uri);
    state.selections.add(uri.clone());
}
