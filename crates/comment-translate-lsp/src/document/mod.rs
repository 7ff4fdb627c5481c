//! Open documents and shared server state.

mod parse_cache;

pub use parse_cache::{ParseCache, ParseKey};

use crate::config::TranslatorConfig;
use crate::grammar::{GrammarRegistry, SyntectTokenizer};
use async_trait::async_trait;
use comment_translate_core::recent::DEFAULT_RECENT_CAPACITY;
use comment_translate_core::short_live::DEFAULT_WINDOW;
use comment_translate_core::{
    CachedTranslator, CooldownTranslator, CoreError, GoogleTranslator, RecentSet, ShortLive,
    Translator,
};
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tower_lsp_server::ls_types::{Hover, Uri};

/// Snapshot of one open document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub language_id: String,
    pub text: String,
    pub version: i32,
    /// Server-wide counter value assigned on every open or change.
    pub generation: u64,
}

impl DocumentState {
    pub fn new(language_id: impl Into<String>, text: impl Into<String>, version: i32) -> Self {
        Self {
            language_id: language_id.into(),
            text: text.into(),
            version,
            generation: 0,
        }
    }
}

/// State shared by all request handlers.
pub struct ServerState {
    pub documents: DashMap<Uri, DocumentState>,
    pub parse_cache: ParseCache<SyntectTokenizer>,
    pub grammars: GrammarRegistry,
    /// Documents where a go-to-definition just fired; a hover arriving
    /// within the window asks the client for the selected block instead.
    pub selections: Arc<ShortLive<Uri>>,
    pub last_hovers: DashMap<Uri, Hover>,
    recent_languages: Mutex<RecentSet<String>>,
    translator: RwLock<Arc<dyn Translator>>,
    generation: AtomicU64,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_translator(build_translator(&TranslatorConfig::default()))
    }

    /// Creates state around a custom translator.
    pub fn with_translator(translator: Arc<dyn Translator>) -> Self {
        Self {
            documents: DashMap::new(),
            parse_cache: ParseCache::new(),
            grammars: GrammarRegistry::new(),
            selections: Arc::new(ShortLive::new(DEFAULT_WINDOW, |a: &Uri, b: &Uri| a == b)),
            last_hovers: DashMap::new(),
            recent_languages: Mutex::new(RecentSet::new(DEFAULT_RECENT_CAPACITY)),
            translator: RwLock::new(translator),
            generation: AtomicU64::new(0),
        }
    }

    pub fn get_document(&self, uri: &Uri) -> Option<Ref<'_, Uri, DocumentState>> {
        self.documents.get(uri)
    }

    /// Stores a new snapshot of `uri` and drops its cached parse state.
    ///
    /// Returns the generation assigned to the snapshot.
    pub fn update_document(&self, uri: Uri, mut state: DocumentState) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.generation = generation;
        self.parse_cache.invalidate(&uri);
        self.documents.insert(uri, state);
        generation
    }

    pub fn remove_document(&self, uri: &Uri) -> Option<DocumentState> {
        self.parse_cache.invalidate(uri);
        self.last_hovers.remove(uri);
        self.documents.remove(uri).map(|(_, doc)| doc)
    }

    /// Current generation of `uri`, `None` once closed.
    pub fn generation_of(&self, uri: &Uri) -> Option<u64> {
        self.documents.get(uri).map(|doc| doc.generation)
    }

    pub fn translator(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.translator.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set_translator(&self, translator: Arc<dyn Translator>) {
        *self
            .translator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = translator;
    }

    /// Moves `language` to the front of the recently used list.
    pub fn promote_language(&self, language: &str) {
        self.recent_languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .promote(language.to_string());
    }

    pub fn recent_languages(&self) -> Vec<String> {
        self.recent_languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ordered_list()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

/// Builds the production translator stack described by `config`.
///
/// If the HTTP client cannot be created every translation reports the
/// failure instead.
pub fn build_translator(config: &TranslatorConfig) -> Arc<dyn Translator> {
    match GoogleTranslator::with_endpoint(config.endpoint.clone(), config.timeout()) {
        Ok(google) => Arc::new(CachedTranslator::new(
            CooldownTranslator::new(google, config.cooldown()),
            config.max_cache_entries,
        )),
        Err(e) => {
            tracing::error!("failed to build translation client: {}", e);
            Arc::new(Unavailable(e))
        }
    }
}

struct Unavailable(CoreError);

#[async_trait]
impl Translator for Unavailable {
    async fn translate(&self, _: &str, _: &str) -> comment_translate_core::Result<String> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(path: &str) -> Uri {
        format!("file:///{path}").parse().unwrap()
    }

    #[test]
    fn test_update_document_bumps_generation() {
        let state = ServerState::new();
        let a = uri("a.rs");

        let first = state.update_document(a.clone(), DocumentState::new("rust", "// a", 1));
        let second = state.update_document(a.clone(), DocumentState::new("rust", "// b", 2));

        assert!(second > first);
        assert_eq!(state.generation_of(&a), Some(second));
        let doc = state.get_document(&a).unwrap();
        assert_eq!(doc.text, "// b");
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_generations_are_global() {
        let state = ServerState::new();
        let g1 = state.update_document(uri("a.rs"), DocumentState::new("rust", "", 1));
        let g2 = state.update_document(uri("b.rs"), DocumentState::new("rust", "", 1));
        assert_ne!(g1, g2);
    }

    #[test]
    fn test_remove_document_clears_state() {
        let state = ServerState::new();
        let a = uri("a.rs");
        state.update_document(a.clone(), DocumentState::new("rust", "// a", 1));
        state.last_hovers.insert(
            a.clone(),
            Hover {
                contents: tower_lsp_server::ls_types::HoverContents::Array(vec![]),
                range: None,
            },
        );

        assert!(state.remove_document(&a).is_some());
        assert!(state.get_document(&a).is_none());
        assert!(state.generation_of(&a).is_none());
        assert!(!state.last_hovers.contains_key(&a));
        assert_eq!(state.document_count(), 0);
    }

    #[test]
    fn test_recent_languages_order() {
        let state = ServerState::new();
        state.promote_language("de");
        state.promote_language("ja");
        state.promote_language("de");
        assert_eq!(state.recent_languages(), vec!["de", "ja"]);
    }

    #[tokio::test]
    async fn test_unreachable_translator_reports_error() {
        let config = TranslatorConfig {
            endpoint: "http://127.0.0.1:9/translate_a/single".into(),
            timeout_ms: 2_000,
            ..TranslatorConfig::default()
        };
        let translator = build_translator(&config);
        let err = translator.translate("hello", "de").await.unwrap_err();
        assert!(matches!(err, CoreError::Http(_)));
    }
}
