//! Routing cache (C6, spec.md §4.3): a bounded, TTL'd cache of routing
//! results keyed by `(text, recent context)`. Built on top of the `lru`
//! crate (already a teacher dependency, used the same way for the query
//! embedding cache in `storage/sqlite.rs`) plus an expiry wrapper, since
//! `lru::LruCache` orders entries but doesn't expire them.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::router::RoutingResult;

struct Entry {
    result: RoutingResult,
    inserted_at: Instant,
}

/// Bounded insertion-ordered cache of routing decisions.
pub struct RoutingCache {
    cache: LruCache<String, Entry>,
    ttl: Duration,
}

impl RoutingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self { cache: LruCache::new(capacity), ttl }
    }

    /// Build the fingerprint cache key: `text ⧺ "|" ⧺ join(last_3(context), "|")`
    /// (spec.md §4.4 step 2, GLOSSARY "Fingerprint of a routing request").
    pub fn key(text: &str, recent_context: &[String]) -> String {
        let last_three: Vec<&str> = recent_context
            .iter()
            .rev()
            .take(3)
            .rev()
            .map(|s| s.as_str())
            .collect();
        format!("{text}|{}", last_three.join("|"))
    }

    /// `get(k)`: absent -> miss; expired -> evict and miss; else move to MRU
    /// and return (spec.md §4.3).
    pub fn get(&mut self, key: &str) -> Option<RoutingResult> {
        let expired = match self.cache.peek(key) {
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            self.cache.pop(key);
            return None;
        }
        self.cache.get(key).map(|entry| entry.result.clone())
    }

    /// `set(k, v)`: present -> delete first (reset position); at capacity ->
    /// evict LRU; insert at MRU end with current timestamp (spec.md §4.3).
    pub fn set(&mut self, key: String, value: RoutingResult) {
        self.cache.pop(&key);
        self.cache.put(key, Entry { result: value, inserted_at: Instant::now() });
    }

    /// Any learning event must clear the cache — weights changed, so cached
    /// decisions are invalidated (spec.md §4.3, §4.4 `learn`).
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Decision, RouteSource};

    fn sample_result() -> RoutingResult {
        RoutingResult {
            decision: Decision::Emm,
            confidence: 0.9,
            source: RouteSource::Ml,
            command: None,
        }
    }

    #[test]
    fn key_joins_only_the_last_three_context_lines() {
        let context = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let key = RoutingCache::key("hello", &context);
        assert_eq!(key, "hello|b|c|d");
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut cache = RoutingCache::new(10, Duration::from_secs(1800));
        cache.set("k".to_string(), sample_result());
        assert_eq!(cache.get("k"), Some(sample_result()));
    }

    #[test]
    fn get_after_ttl_is_a_miss() {
        let mut cache = RoutingCache::new(10, Duration::from_millis(10));
        cache.set("k".to_string(), sample_result());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut cache = RoutingCache::new(2, Duration::from_secs(1800));
        cache.set("a".to_string(), sample_result());
        cache.set("b".to_string(), sample_result());
        cache.set("c".to_string(), sample_result());
        assert!(cache.len() <= 2);
        // "a" should have been evicted as the least recently used.
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = RoutingCache::new(10, Duration::from_secs(1800));
        cache.set("k".to_string(), sample_result());
        cache.clear();
        assert!(cache.is_empty());
    }
}
