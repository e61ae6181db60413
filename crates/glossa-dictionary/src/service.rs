use std::sync::Arc;

use glossa_config::Config;
use glossa_core::dictionary::Dictionary;
use glossa_core::{DictionaryMetadata, InvalidQuery, LookupOutcome, ShardKey, normalize};
use tokio::task::JoinSet;

use crate::cache::{CacheStats, LookupCache};
use crate::index::{IndexError, ShardIndex};
use crate::store::{self, ShardStore};

/// Public entry point for definitions.
///
/// Queries are normalized, answered from the lookup cache when possible and
/// otherwise routed to their shard. Found, not-found and parse-failure
/// outcomes are cached; read failures are not, so they are retried on the
/// next lookup.
pub struct DictionaryService {
    index: Arc<ShardIndex>,
    cache: Arc<LookupCache>,
    expected_words: usize,
}

impl DictionaryService {
    pub fn new(store: Arc<dyn ShardStore>, cache: Arc<LookupCache>) -> Self {
        Self {
            index: Arc::new(ShardIndex::new(store)),
            cache,
            expected_words: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store = store::from_config(&config.dictionary);
        tracing::info!("Dictionary corpus: {}", store.describe());

        let cache = Arc::new(LookupCache::new(config.cache.capacity()));
        Self::new(store, cache).with_expected_words(config.dictionary.expected_words)
    }

    /// Informational corpus size reported through `metadata`
    pub fn with_expected_words(mut self, expected_words: usize) -> Self {
        self.expected_words = expected_words;
        self
    }

    pub async fn lookup(&self, query: &str) -> Result<LookupOutcome, InvalidQuery> {
        let word = normalize(query);
        if word.is_empty() {
            return Err(InvalidQuery(query.to_string()));
        }

        if let Some(outcome) = self.cache.get(&word) {
            tracing::debug!("Cache hit for '{}'", word);
            return Ok(outcome);
        }

        let key = ShardKey::for_word(&word);
        tracing::debug!("Cache miss for '{}', routing to shard {}", word, key);

        // an invalidation while the shard resolves must not leave this word cached
        let generation = self.cache.generation(key);

        let outcome = match self.index.resolve(key).await {
            Ok(map) => match map.get(&word) {
                Some(entry) => LookupOutcome::Found(Arc::clone(entry)),
                None => LookupOutcome::NotFound,
            },
            Err(IndexError::Parse(e)) => LookupOutcome::Unavailable(e.to_string()),
            Err(IndexError::Unavailable(e)) => {
                // retryable, keep it out of the cache
                return Ok(LookupOutcome::Unavailable(e.to_string()));
            }
        };

        self.cache.put_if_current(key, generation, word, outcome.clone());
        Ok(outcome)
    }

    /// Load the given shards concurrently. Returns how many are resident afterwards.
    pub async fn prefetch(&self, keys: impl IntoIterator<Item = ShardKey>) -> usize {
        let mut tasks = JoinSet::new();
        for key in keys {
            let index = Arc::clone(&self.index);
            tasks.spawn(async move { (key, index.resolve(key).await.is_ok()) });
        }

        let mut resident = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, true)) => resident += 1,
                Ok((key, false)) => tracing::warn!("Prefetch of shard {} failed", key),
                Err(e) => tracing::error!("Prefetch task panicked: {e}"),
            }
        }

        tracing::info!("Prefetch complete: {} shards resident", resident);
        resident
    }

    /// Forget a shard and every cached word routed to it
    pub fn invalidate_shard(&self, key: ShardKey) -> usize {
        self.index.invalidate(key);
        let dropped = self.cache.drop_shard(key);
        tracing::debug!("Dropped {} cached words for shard {}", dropped, key);
        dropped
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn index(&self) -> &ShardIndex {
        &self.index
    }

    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }
}

#[async_trait::async_trait]
impl Dictionary for DictionaryService {
    async fn lookup(&self, query: &str) -> Result<LookupOutcome, InvalidQuery> {
        DictionaryService::lookup(self, query).await
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "glossa".to_string(),
            resident_shards: self.index.resident_shards(),
            resident_entries: self.index.resident_entries(),
            expected_words: self.expected_words,
        }
    }
}
