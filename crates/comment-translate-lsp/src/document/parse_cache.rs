//! Per-document parse state cache.
//!
//! Each open document gets one [`SpanResolver`] (and with it the line token
//! cache) built lazily on the first hover. Entries are keyed by language id
//! and URI, remember the document generation they were built from, and are
//! evicted on every change or close of their document.

use comment_translate_core::{SpanResolver, Tokenizer};
use dashmap::DashMap;
use tower_lsp_server::ls_types::Uri;

/// Cache key: the same URI reopened under a different language gets a
/// fresh parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseKey {
    pub language_id: String,
    pub uri: Uri,
}

impl ParseKey {
    pub fn new(language_id: impl Into<String>, uri: Uri) -> Self {
        Self {
            language_id: language_id.into(),
            uri,
        }
    }
}

struct CachedParse<T: Tokenizer> {
    generation: u64,
    resolver: SpanResolver<T>,
}

pub struct ParseCache<T: Tokenizer> {
    entries: DashMap<ParseKey, CachedParse<T>>,
}

impl<T: Tokenizer> Default for ParseCache<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T: Tokenizer> ParseCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the resolver for `key`, building it with `create`
    /// when missing or built from an older `generation`.
    ///
    /// `create` runs without holding a cache lock. Returns `None` when
    /// `create` declines (no grammar, document gone).
    pub fn with_resolver<R>(
        &self,
        key: ParseKey,
        generation: u64,
        create: impl FnOnce() -> Option<SpanResolver<T>>,
        f: impl FnOnce(&mut SpanResolver<T>) -> R,
    ) -> Option<R> {
        if let Some(mut cached) = self.entries.get_mut(&key)
            && cached.generation == generation
        {
            return Some(f(&mut cached.resolver));
        }

        tracing::debug!("building parse state for {:?}", key.uri);
        let mut resolver = create()?;
        let result = f(&mut resolver);
        self.entries.insert(
            key,
            CachedParse {
                generation,
                resolver,
            },
        );
        Some(result)
    }

    /// Drops every cached parse of `uri`, whatever its language.
    pub fn invalidate(&self, uri: &Uri) {
        self.entries.retain(|key, _| &key.uri != uri);
    }

    pub fn contains(&self, key: &ParseKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comment_translate_core::{LineTokens, ResolveOptions, TextPosition, Token};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats every line as a line comment and counts calls.
    #[derive(Clone, Default)]
    struct CountingTokenizer {
        calls: Arc<AtomicUsize>,
    }

    impl Tokenizer for CountingTokenizer {
        type State = ();

        fn initial_state(&self) {}

        fn tokenize_line(
            &self,
            line: &str,
            _: &(),
        ) -> comment_translate_core::Result<LineTokens<()>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let scopes = vec!["source.test".to_string(), "comment.line.test".to_string()];
            Ok(LineTokens {
                tokens: vec![Token::new(0, line.len(), scopes)],
                next_state: (),
            })
        }
    }

    fn uri(path: &str) -> Uri {
        format!("file:///{path}").parse().unwrap()
    }

    fn hover_text(
        cache: &ParseCache<CountingTokenizer>,
        tokenizer: &CountingTokenizer,
        key: &ParseKey,
        generation: u64,
        text: &str,
    ) -> Option<String> {
        cache
            .with_resolver(
                key.clone(),
                generation,
                || Some(SpanResolver::new(text, tokenizer.clone())),
                |resolver| {
                    let options = ResolveOptions {
                        multi_line_merge: true,
                        whole_token: false,
                    };
                    resolver.resolve(TextPosition::new(0, 4), options)
                },
            )
            .flatten()
            .map(|span| span.text)
    }

    #[test]
    fn test_resolver_reused_until_invalidated() {
        let cache = ParseCache::new();
        let tokenizer = CountingTokenizer::default();
        let key = ParseKey::new("test", uri("a.rs"));

        assert_eq!(hover_text(&cache, &tokenizer, &key, 1, "// old").as_deref(), Some("old"));
        let after_first = tokenizer.calls.load(Ordering::SeqCst);
        assert!(after_first > 0);

        hover_text(&cache, &tokenizer, &key, 1, "// old");
        assert_eq!(tokenizer.calls.load(Ordering::SeqCst), after_first);

        cache.invalidate(&key.uri);
        assert!(!cache.contains(&key));

        assert_eq!(hover_text(&cache, &tokenizer, &key, 2, "// new").as_deref(), Some("new"));
        assert!(tokenizer.calls.load(Ordering::SeqCst) > after_first);
    }

    #[test]
    fn test_generation_mismatch_rebuilds() {
        let cache = ParseCache::new();
        let tokenizer = CountingTokenizer::default();
        let key = ParseKey::new("test", uri("a.rs"));

        hover_text(&cache, &tokenizer, &key, 1, "// stale");
        assert_eq!(hover_text(&cache, &tokenizer, &key, 2, "// fresh").as_deref(), Some("fresh"));
    }

    #[test]
    fn test_invalidate_spans_languages() {
        let cache = ParseCache::new();
        let tokenizer = CountingTokenizer::default();
        let doc = uri("a.txt");
        let other = ParseKey::new("test", uri("b.txt"));

        hover_text(&cache, &tokenizer, &ParseKey::new("one", doc.clone()), 1, "// x");
        hover_text(&cache, &tokenizer, &ParseKey::new("two", doc.clone()), 1, "// x");
        hover_text(&cache, &tokenizer, &other, 1, "// y");
        assert_eq!(cache.len(), 3);

        cache.invalidate(&doc);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&other));
    }

    #[test]
    fn test_create_declines() {
        let cache: ParseCache<CountingTokenizer> = ParseCache::new();
        let key = ParseKey::new("plaintext", uri("a.txt"));
        let result = cache.with_resolver(key, 1, || None, |_| ());
        assert!(result.is_none());
        assert!(cache.is_empty());
    }
}
