//! Integration tests for the document lifecycle.
//!
//! Drives `ServerState` the way the notification handlers do and checks
//! that parse state is built lazily, reused between hovers and dropped on
//! every change or close.

use comment_translate_core::Settings;
use comment_translate_lsp::document::{DocumentState, ParseKey, ServerState};
use comment_translate_lsp::handlers::hover::resolve_target;
use tower_lsp_server::ls_types::{Position, Uri};

fn uri() -> Uri {
    "file:///test/lib.js".parse().unwrap()
}

fn merged() -> Settings {
    Settings {
        multi_line_merge: true,
        ..Settings::default()
    }
}

fn hover_text(state: &ServerState, line: u32, character: u32) -> Option<String> {
    let generation = state.generation_of(&uri())?;
    let language_id = state.get_document(&uri())?.language_id.clone();
    resolve_target(
        state,
        &uri(),
        &language_id,
        generation,
        Position::new(line, character),
        &merged(),
    )
    .map(|target| target.text)
}

#[test]
fn test_parse_state_built_lazily() {
    let state = ServerState::new();
    state.update_document(uri(), DocumentState::new("javascript", "// Load the config\nlet x = 1;\n", 1));

    let key = ParseKey::new("javascript", uri());
    assert!(!state.parse_cache.contains(&key));

    assert_eq!(hover_text(&state, 0, 4).as_deref(), Some("Load the config"));
    assert!(state.parse_cache.contains(&key));
}

#[test]
fn test_change_invalidates_parse_state() {
    let state = ServerState::new();
    state.update_document(uri(), DocumentState::new("javascript", "// first version\n", 1));
    assert_eq!(hover_text(&state, 0, 4).as_deref(), Some("first version"));

    state.update_document(uri(), DocumentState::new("javascript", "// second version\n", 2));
    assert!(state.parse_cache.is_empty());
    assert_eq!(hover_text(&state, 0, 4).as_deref(), Some("second version"));
}

#[test]
fn test_close_drops_parse_state() {
    let state = ServerState::new();
    state.update_document(uri(), DocumentState::new("javascript", "// hello\n", 1));
    hover_text(&state, 0, 4);
    assert_eq!(state.parse_cache.len(), 1);

    state.remove_document(&uri());
    assert!(state.parse_cache.is_empty());
    assert!(hover_text(&state, 0, 4).is_none());
}

#[test]
fn test_reopen_with_other_language() {
    let state = ServerState::new();
    state.update_document(uri(), DocumentState::new("javascript", "// note\n", 1));
    hover_text(&state, 0, 4);

    state.remove_document(&uri());
    state.update_document(uri(), DocumentState::new("plaintext", "// note\n", 1));
    assert!(hover_text(&state, 0, 4).is_none());
    assert!(!state.parse_cache.contains(&ParseKey::new("javascript", uri())));
}

#[test]
fn test_string_literal() {
    let state = ServerState::new();
    state.update_document(
        uri(),
        DocumentState::new("javascript", "const greeting = \"good morning\";\n", 1),
    );
    assert_eq!(hover_text(&state, 0, 20).as_deref(), Some("good morning"));
}
