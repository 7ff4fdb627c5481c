//! Hover translation.
//!
//! Resolves the span under the cursor (or the client's selection right after
//! a go-to-definition), translates it and renders the result as markdown.
//! Results computed for a document that changed or closed meanwhile are
//! dropped.

use super::selection::SelectionQuery;
use crate::document::{ParseKey, ServerState};
use crate::position::{to_lsp_range, utf16_to_byte};
use comment_translate_core::google::translation_link;
use comment_translate_core::{CoreError, ResolveOptions, Settings, SpanResolver, TextPosition, humanize};
use std::sync::Arc;
use tower_lsp_server::ls_types::{
    Hover, HoverContents, HoverParams, MarkupContent, MarkupKind, Position, Range, Uri,
};

/// Text chosen for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub text: String,
    pub range: Range,
    pub identifier_like: bool,
}

pub async fn handle_hover(
    state: Arc<ServerState>,
    params: HoverParams,
    settings: &Settings,
    selection: &dyn SelectionQuery,
) -> Option<Hover> {
    let position_params = &params.text_document_position_params;
    let uri = &position_params.text_document.uri;
    let position = position_params.position;

    // Concise mode only answers hovers that follow a go-to-definition.
    let selection_live = state.selections.is_live(uri);
    if settings.concise && !selection_live {
        return None;
    }

    let (language_id, generation) = {
        let doc = state.get_document(uri)?;
        (doc.language_id.clone(), doc.generation)
    };

    let mut target = None;
    if selection_live {
        target = selection
            .selection_containing(position_params)
            .await
            .filter(|block| !block.comment.trim().is_empty())
            .map(|block| HoverTarget {
                text: block.comment,
                range: block.range,
                identifier_like: false,
            });
    }
    let target = match target {
        Some(target) => target,
        None => resolve_target(&state, uri, &language_id, generation, position, settings)?,
    };

    let source = if target.identifier_like {
        humanize(&target.text)
    } else {
        target.text.clone()
    };

    let target_language = settings.target_language.as_str();
    let translated = state.translator().translate(&source, target_language).await;

    if state.generation_of(uri) != Some(generation) {
        tracing::debug!("discarding hover for {:?}: document changed", uri);
        return None;
    }

    let value = match translated {
        Ok(text) if target.identifier_like => format!("{source} => {text}"),
        Ok(text) => text,
        Err(CoreError::EmptyText) => return None,
        Err(e) => {
            tracing::warn!("hover translation failed: {}", e);
            format_failure(&e, &source, target_language)
        }
    };

    let hover = Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(target.range),
    };
    state.last_hovers.insert(uri.clone(), hover.clone());
    Some(hover)
}

/// Resolves the span under `position` through the document's cached parse
/// state, building it on first use.
pub fn resolve_target(
    state: &ServerState,
    uri: &Uri,
    language_id: &str,
    generation: u64,
    position: Position,
    settings: &Settings,
) -> Option<HoverTarget> {
    let key = ParseKey::new(language_id, uri.clone());
    let create = || {
        let tokenizer = match state.grammars.tokenizer_for(language_id) {
            Ok(tokenizer) => tokenizer,
            Err(e) => {
                tracing::debug!("{}", e);
                return None;
            }
        };
        let doc = state.get_document(uri)?;
        Some(SpanResolver::new(&doc.text, tokenizer))
    };

    state
        .parse_cache
        .with_resolver(key, generation, create, |resolver| {
            let line = position.line as usize;
            let column = utf16_to_byte(resolver.line_text(line)?, position.character);
            let span = resolver.resolve(
                TextPosition::new(line, column),
                ResolveOptions::from(settings),
            )?;
            let range = to_lsp_range(span.range, |line| resolver.line_text(line));

            Some(HoverTarget {
                text: span.text,
                range,
                identifier_like: span.identifier_like,
            })
        })
        .flatten()
}

fn format_failure(error: &CoreError, source: &str, target_language: &str) -> String {
    format!(
        "*translation failed: {}*\n\n{}",
        error,
        translation_link(source, target_language)
    )
}
