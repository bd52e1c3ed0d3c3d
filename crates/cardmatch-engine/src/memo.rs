//! Suggestion memoization with TTL
//!
//! Ranking is a pure function of the extracted identity, the employee snapshot
//! and the ranker's settings, so results can be reused while none of them
//! change. Keys combine the whitespace-stripped identity, the snapshot's content
//! fingerprint and the ranker's settings key. A new directory snapshot or a
//! differently configured ranker never hits entries computed for another.
//!
//! The cache is an explicit value owned by its caller. Nothing here is global.

use cardmatch_core::{IdentityString, SnapshotVersion, Suggestion};
use crate::ranker::CandidateRanker;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Cache key: stripped identity, snapshot version and ranker settings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    identity: IdentityString,
    snapshot: SnapshotVersion,
    settings: String,
}

impl MemoKey {
    pub fn new(extracted: &str, snapshot: &SnapshotVersion, ranker: &CandidateRanker) -> Self {
        Self {
            identity: IdentityString::normalize(extracted),
            snapshot: snapshot.clone(),
            settings: ranker.settings_key(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    suggestions: Arc<Vec<Suggestion>>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_valid(&self) -> bool {
        self.created_at.elapsed() < self.ttl
    }
}

/// Ranked suggestions cached per `(identity, snapshot version)`
///
/// ## Usage
///
/// ```rust,ignore
/// let cache = SuggestionCache::new(Duration::from_secs(300));
/// let key = MemoKey::new(extracted, &snapshot.version(), &ranker);
///
/// let suggestions =
///     cache.get_or_insert_with(key, || ranker.rank(Some(extracted), snapshot.employees()));
/// ```
#[derive(Debug, Clone)]
pub struct SuggestionCache {
    cache: Arc<RwLock<HashMap<MemoKey, CacheEntry>>>,
    default_ttl: Duration,
}

impl SuggestionCache {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: ttl,
        }
    }

    /// Store suggestions under `key`
    pub fn insert(&self, key: MemoKey, suggestions: Vec<Suggestion>) -> Arc<Vec<Suggestion>> {
        let suggestions = Arc::new(suggestions);
        let entry = CacheEntry {
            suggestions: Arc::clone(&suggestions),
            created_at: Instant::now(),
            ttl: self.default_ttl,
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, entry);
        }

        suggestions
    }

    /// Suggestions for `key` if present and not expired
    pub fn get(&self, key: &MemoKey) -> Option<Arc<Vec<Suggestion>>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(key) {
                if entry.is_valid() {
                    return Some(Arc::clone(&entry.suggestions));
                }
            }
        }

        self.evict(key);
        None
    }

    /// Return the cached value or compute, store and return it
    pub fn get_or_insert_with<F>(&self, key: MemoKey, compute: F) -> Arc<Vec<Suggestion>>
    where
        F: FnOnce() -> Vec<Suggestion>,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }

        self.insert(key, compute())
    }

    pub fn evict(&self, key: &MemoKey) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry
    pub fn evict_expired(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| entry.is_valid());
        }
    }

    /// (total, valid, expired)
    pub fn stats(&self) -> (usize, usize, usize) {
        if let Ok(cache) = self.cache.read() {
            let total = cache.len();
            let valid = cache.values().filter(|e| e.is_valid()).count();
            (total, valid, total - valid)
        } else {
            (0, 0, 0)
        }
    }
}
