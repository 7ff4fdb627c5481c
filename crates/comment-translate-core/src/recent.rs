//! Bounded most-recently-used set.

use std::collections::VecDeque;

/// Default number of remembered items.
pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Ordered set of recently used items, most recent first.
///
/// Promoting an item moves it to the front; once more than `max_len` items
/// are held, the least recently used one is evicted.
#[derive(Debug, Clone)]
pub struct RecentSet<T> {
    items: VecDeque<T>,
    max_len: usize,
}

impl<T: PartialEq + Clone> RecentSet<T> {
    pub fn new(max_len: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(max_len.min(64)),
            max_len: max_len.max(1),
        }
    }

    /// Moves `item` to the front, inserting it if absent.
    pub fn promote(&mut self, item: T) {
        if let Some(index) = self.items.iter().position(|existing| *existing == item) {
            self.items.remove(index);
        }
        self.items.push_front(item);
        self.items.truncate(self.max_len);
    }

    pub fn as_ordered_list(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

}

impl<T: PartialEq + Clone> Default for RecentSet<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}
