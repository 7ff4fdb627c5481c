//! Short-lived correlation cache.
//!
//! Records recent explicit selection gestures so that a hover arriving
//! shortly afterwards can be treated as "translate my selection". Entries
//! expire after a fixed window; expiry is kept in an insertion-ordered queue
//! (insertion order is expiry order since the window is fixed) pruned on
//! every access, and [`ShortLive::spawn_sweeper`] runs one background ticker
//! so idle caches drain too.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default lifetime of an entry.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

type Matcher<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

struct Entry<T> {
    item: T,
    inserted_at: Instant,
}

/// Time-windowed membership cache with a caller-supplied equality predicate.
pub struct ShortLive<T> {
    window: Duration,
    matches: Matcher<T>,
    entries: Mutex<VecDeque<Entry<T>>>,
}

impl<T> ShortLive<T> {
    /// Creates a cache whose entries live for `window`.
    ///
    /// `matches(entry, candidate)` decides whether a stored entry answers a
    /// query.
    pub fn new(window: Duration, matches: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            window,
            matches: Box::new(matches),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Entry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &Entry<T>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) > self.window
    }

    fn prune(&self, entries: &mut VecDeque<Entry<T>>, now: Instant) {
        while entries
            .front()
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            entries.pop_front();
        }
    }

    pub fn add(&self, item: T) {
        self.add_at(item, Instant::now());
    }

    /// Records `item` as inserted at `now`.
    pub fn add_at(&self, item: T, now: Instant) {
        let mut entries = self.lock();
        self.prune(&mut entries, now);
        entries.push_back(Entry {
            item,
            inserted_at: now,
        });
    }

    pub fn is_live(&self, candidate: &T) -> bool {
        self.is_live_at(candidate, Instant::now())
    }

    /// Whether an entry matching `candidate` is still inside its window at
    /// `now`.
    pub fn is_live_at(&self, candidate: &T, now: Instant) -> bool {
        let mut entries = self.lock();
        self.prune(&mut entries, now);
        entries
            .iter()
            .any(|entry| (self.matches)(&entry.item, candidate))
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let mut entries = self.lock();
        self.prune(&mut entries, Instant::now());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries.
    pub fn sweep(&self) {
        let mut entries = self.lock();
        self.prune(&mut entries, Instant::now());
    }
}

impl<T: Send + 'static> ShortLive<T> {
    /// Spawns a ticker that sweeps expired entries once per window.
    ///
    /// The task holds a weak reference and exits once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = self.window.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    break;
                };
                cache.sweep();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_uri() -> ShortLive<(String, u32)> {
        ShortLive::new(DEFAULT_WINDOW, |entry: &(String, u32), candidate: &(String, u32)| {
            entry.0 == candidate.0
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_inside_window() {
        let cache = by_uri();
        let t = Instant::now();
        cache.add_at(("file:///a.rs".into(), 3), t);

        let candidate = ("file:///a.rs".to_string(), 99);
        assert!(cache.is_live_at(&candidate, t + Duration::from_millis(999)));
        assert!(!cache.is_live_at(&candidate, t + Duration::from_millis(1001)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_uses_predicate() {
        let cache = by_uri();
        cache.add(("file:///a.rs".into(), 1));

        assert!(cache.is_live(&("file:///a.rs".into(), 7)));
        assert!(!cache.is_live(&("file:///b.rs".into(), 1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_with_clock() {
        let cache = by_uri();
        cache.add(("file:///a.rs".into(), 1));
        assert_eq!(cache.len(), 1);

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(!cache.is_live(&("file:///a.rs".into(), 1)));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_individually() {
        let cache = by_uri();
        let t = Instant::now();
        cache.add_at(("file:///a.rs".into(), 1), t);
        cache.add_at(("file:///b.rs".into(), 1), t + Duration::from_millis(600));

        let later = t + Duration::from_millis(1200);
        assert!(!cache.is_live_at(&("file:///a.rs".into(), 0), later));
        assert!(cache.is_live_at(&("file:///b.rs".into(), 0), later));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_drains_idle_cache() {
        let cache = Arc::new(by_uri());
        let handle = cache.spawn_sweeper();
        cache.add(("file:///a.rs".into(), 1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(cache.lock().len(), 0);

        drop(cache);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(handle.is_finished());
    }
}
