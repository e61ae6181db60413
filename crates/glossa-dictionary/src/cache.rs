//! Bounded least-recently-used cache of lookup outcomes.

use std::num::NonZeroUsize;

use glossa_core::{LookupOutcome, ShardKey};
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

struct Inner {
    entries: LruCache<String, LookupOutcome>,
    /// Bumped whenever a shard's words are dropped
    generations: [u64; ShardKey::COUNT],
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Shared lookup cache keyed by normalized word. Negative outcomes are cached
/// and evicted like any other. All access goes through one mutex.
pub struct LookupCache {
    inner: Mutex<Inner>,
}

impl LookupCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                generations: [0; ShardKey::COUNT],
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    /// Cached outcome for `word`, marking it most recently used
    pub fn get(&self, word: &str) -> Option<LookupOutcome> {
        let mut inner = self.inner.lock();
        let hit = inner.entries.get(word).cloned();
        match hit {
            Some(outcome) => {
                inner.hits += 1;
                Some(outcome)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub fn put(&self, word: String, outcome: LookupOutcome) {
        let mut inner = self.inner.lock();
        Self::insert(&mut inner, word, outcome);
    }

    /// Current generation of `key`; read it before resolving the shard and
    /// hand it back to `put_if_current`.
    pub fn generation(&self, key: ShardKey) -> u64 {
        self.inner.lock().generations[key.index()]
    }

    /// Insert only if `key` has not been dropped since `generation` was read.
    /// Returns whether the outcome was stored.
    pub fn put_if_current(
        &self,
        key: ShardKey,
        generation: u64,
        word: String,
        outcome: LookupOutcome,
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.generations[key.index()] != generation {
            tracing::debug!("Shard {} changed during lookup of '{}', not caching", key, word);
            return false;
        }
        Self::insert(&mut inner, word, outcome);
        true
    }

    fn insert(inner: &mut Inner, word: String, outcome: LookupOutcome) {
        if inner.entries.contains(&word) {
            inner.entries.put(word, outcome);
            return;
        }
        if let Some((evicted, _)) = inner.entries.push(word, outcome) {
            inner.evictions += 1;
            tracing::debug!("Evicted '{}' from lookup cache", evicted);
        }
    }

    /// Drop every word routed to `key` and bump its generation, in one
    /// critical section. Returns how many words were dropped.
    pub fn drop_shard(&self, key: ShardKey) -> usize {
        let mut inner = self.inner.lock();
        inner.generations[key.index()] += 1;

        let doomed: Vec<String> = inner
            .entries
            .iter()
            .filter(|(word, _)| ShardKey::for_word(word) == key)
            .map(|(word, _)| word.clone())
            .collect();

        for word in &doomed {
            inner.entries.pop(word);
        }
        doomed.len()
    }

    /// Presence check that leaves recency and stats alone
    pub fn contains(&self, word: &str) -> bool {
        self.inner.lock().entries.contains(word)
    }

    pub fn remove(&self, word: &str) -> Option<LookupOutcome> {
        self.inner.lock().entries.pop(word)
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.inner.lock().entries.cap()
    }

    /// Words from most to least recently used
    pub fn words(&self) -> Vec<String> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|(word, _)| word.clone())
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            len: inner.entries.len(),
            capacity: inner.entries.cap().get(),
        }
    }
}
