//! Translation provider seam and the wrappers stacked on top of it.
//!
//! Providers implement [`Translator`]. The server composes them as
//! `CachedTranslator<CooldownTranslator<Provider>>`: identical requests are
//! shared and memoized, and a failing provider is left alone for a while.

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Default suppression window after a provider failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Default number of memoized translations.
pub const DEFAULT_MAX_CACHE_ENTRIES: usize = 1024;

/// Asynchronous text translation.
///
/// Implementations must not panic on provider errors; every failure is
/// reported through [`CoreError`].
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` into `target_language` (a provider language code).
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        (**self).translate(text, target_language).await
    }
}

/// Suppresses calls to the inner translator for a window after a provider
/// failure.
pub struct CooldownTranslator<T> {
    inner: T,
    cooldown: Duration,
    last_failure: Mutex<Option<Instant>>,
}

impl<T> CooldownTranslator<T> {
    pub fn new(inner: T, cooldown: Duration) -> Self {
        Self {
            inner,
            cooldown,
            last_failure: Mutex::new(None),
        }
    }

    /// Time left before the provider is contacted again, if any.
    pub fn remaining_cooldown(&self, now: Instant) -> Option<Duration> {
        let last_failure = *self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(last_failure?);
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    fn record_failure(&self, now: Instant) {
        *self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(now);
    }
}

#[async_trait]
impl<T: Translator> Translator for CooldownTranslator<T> {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        if let Some(remaining) = self.remaining_cooldown(Instant::now()) {
            tracing::debug!("skipping translation, provider cooling down");
            return Err(CoreError::CoolingDown { remaining });
        }

        match self.inner.translate(text, target_language).await {
            Ok(translated) => Ok(translated),
            Err(e) => {
                if matches!(e, CoreError::Http(_) | CoreError::InvalidResponse(_)) {
                    tracing::warn!(
                        "translation provider failed, pausing for {}s: {}",
                        self.cooldown.as_secs(),
                        e
                    );
                    self.record_failure(Instant::now());
                }
                Err(e)
            }
        }
    }
}

type TranslationKey = (String, String);
type SharedTranslation = Shared<BoxFuture<'static, Result<String>>>;

/// Shares in-flight requests and memoizes successful translations keyed by
/// target language and text. Failed entries are dropped so a later call
/// retries.
pub struct CachedTranslator<T> {
    inner: Arc<T>,
    entries: DashMap<TranslationKey, SharedTranslation>,
    max_entries: usize,
}

impl<T: Translator + 'static> CachedTranslator<T> {
    pub fn new(inner: T, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(inner),
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl<T: Translator + 'static> Translator for CachedTranslator<T> {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyText);
        }

        let key = (target_language.to_string(), text.to_string());
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            tracing::debug!("translation cache full, clearing {} entries", self.entries.len());
            self.entries.clear();
        }

        let shared = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| {
                let inner = Arc::clone(&self.inner);
                let (target, text) = key.clone();
                async move { inner.translate(&text, &target).await }
                    .boxed()
                    .shared()
            })
            .clone();

        let result = shared.await;
        if result.is_err() {
            self.entries
                .remove_if(&key, |_, entry| entry.peek().is_some_and(Result::is_err));
        }
        result
    }
}
