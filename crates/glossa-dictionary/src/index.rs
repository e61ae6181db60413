//! Lazily parsed, memoized shards.
//!
//! One slot per shard key. A slot goes from empty to resident exactly once;
//! concurrent first lookups wait on the same parse. Read failures leave the
//! slot empty so the next call retries; parse failures are remembered until
//! the slot is invalidated.

use std::collections::HashMap;
use std::sync::Arc;

use glossa_core::{CorpusParseError, DefinitionEntry, ShardKey, ShardUnavailable};
use parking_lot::RwLock;
use tokio::sync::OnceCell;

use crate::format::parse_shard;
use crate::store::ShardStore;

/// Normalized headword to entry, for one shard
pub type ShardMap = HashMap<String, Arc<DefinitionEntry>>;

type Parsed = Result<Arc<ShardMap>, CorpusParseError>;
type Slot = Arc<OnceCell<Parsed>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Unavailable(#[from] ShardUnavailable),

    #[error(transparent)]
    Parse(#[from] CorpusParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardStatus {
    Unloaded,
    Resident { entries: usize },
    Failed { diagnostic: String },
}

pub struct ShardIndex {
    store: Arc<dyn ShardStore>,
    slots: Vec<RwLock<Slot>>,
}

impl ShardIndex {
    pub fn new(store: Arc<dyn ShardStore>) -> Self {
        let slots = (0..ShardKey::COUNT)
            .map(|_| RwLock::new(Arc::new(OnceCell::new())))
            .collect();

        Self { store, slots }
    }

    fn slot(&self, key: ShardKey) -> Slot {
        Arc::clone(&self.slots[key.index()].read())
    }

    /// Parsed shard for `key`, loading it on first use
    pub async fn resolve(&self, key: ShardKey) -> Result<Arc<ShardMap>, IndexError> {
        let slot = self.slot(key);
        let parsed = slot.get_or_try_init(|| self.load(key)).await?;

        match parsed {
            Ok(map) => Ok(Arc::clone(map)),
            Err(e) => Err(IndexError::Parse(e.clone())),
        }
    }

    async fn load(&self, key: ShardKey) -> Result<Parsed, ShardUnavailable> {
        let bytes = self.store.open(key).await.inspect_err(|e| {
            tracing::warn!("{}", e);
        })?;

        let parsed = parse_shard(key, &bytes).map(Arc::new);
        match &parsed {
            Ok(map) => tracing::info!(
                "Shard {} resident: {} entries from {}",
                key,
                map.len(),
                self.store.describe()
            ),
            Err(e) => tracing::error!("{}", e),
        }

        Ok(parsed)
    }

    /// Drop whatever the slot holds; the next `resolve` reads and parses again.
    pub fn invalidate(&self, key: ShardKey) {
        *self.slots[key.index()].write() = Arc::new(OnceCell::new());
        tracing::info!("Shard {} invalidated", key);
    }

    pub fn status(&self, key: ShardKey) -> ShardStatus {
        match self.slot(key).get() {
            None => ShardStatus::Unloaded,
            Some(Ok(map)) => ShardStatus::Resident { entries: map.len() },
            Some(Err(e)) => ShardStatus::Failed {
                diagnostic: e.diagnostic.clone(),
            },
        }
    }

    pub fn resident_shards(&self) -> usize {
        ShardKey::all()
            .filter(|key| matches!(self.status(*key), ShardStatus::Resident { .. }))
            .count()
    }

    pub fn resident_entries(&self) -> usize {
        ShardKey::all()
            .map(|key| match self.status(key) {
                ShardStatus::Resident { entries } => entries,
                _ => 0,
            })
            .sum()
    }

    pub fn store(&self) -> &Arc<dyn ShardStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryShardStore;
    use crate::tests::{CountingStore, FlakyStore};

    fn corpus() -> MemoryShardStore {
        MemoryShardStore::new()
            .with_shard(
                ShardKey::Letter('h'),
                r#"{"hello": {"definitions": ["a greeting"]}, "hat": {"definitions": ["head covering"]}}"#,
            )
            .with_shard(ShardKey::Letter('b'), "{ broken")
    }

    #[tokio::test]
    async fn resolves_and_memoizes() {
        let store = Arc::new(CountingStore::new(corpus()));
        let index = ShardIndex::new(store.clone());
        let h = ShardKey::Letter('h');

        assert_eq!(index.status(h), ShardStatus::Unloaded);

        let first = index.resolve(h).await.unwrap();
        let second = index.resolve(h).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
        assert_eq!(store.opens(h), 1);
        assert_eq!(index.status(h), ShardStatus::Resident { entries: 2 });
        assert_eq!(index.resident_shards(), 1);
        assert_eq!(index.resident_entries(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_parses_once() {
        let store = Arc::new(CountingStore::new(corpus()));
        let index = Arc::new(ShardIndex::new(store.clone()));
        let h = ShardKey::Letter('h');

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let index = Arc::clone(&index);
            tasks.spawn(async move { index.resolve(h).await.map(|m| m.len()) });
        }
        while let Some(result) = tasks.join_next().await {
            assert_eq!(result.unwrap().unwrap(), 2);
        }

        assert_eq!(store.opens(h), 1);
    }

    #[tokio::test]
    async fn parse_failure_is_isolated_and_remembered() {
        let store = Arc::new(CountingStore::new(corpus()));
        let index = ShardIndex::new(store.clone());
        let b = ShardKey::Letter('b');

        let err = index.resolve(b).await.unwrap_err();
        assert!(matches!(err, IndexError::Parse(ref e) if e.key == b));
        assert!(matches!(index.status(b), ShardStatus::Failed { .. }));

        // not re-read
        assert!(index.resolve(b).await.is_err());
        assert_eq!(store.opens(b), 1);

        // other shards unaffected
        assert!(index.resolve(ShardKey::Letter('h')).await.is_ok());
    }

    #[tokio::test]
    async fn read_failure_is_retried() {
        let store = Arc::new(FlakyStore::new(corpus(), 1));
        let index = ShardIndex::new(store.clone());
        let h = ShardKey::Letter('h');

        let err = index.resolve(h).await.unwrap_err();
        assert!(matches!(err, IndexError::Unavailable(_)));
        assert_eq!(index.status(h), ShardStatus::Unloaded);

        let map = index.resolve(h).await.unwrap();
        assert!(map.contains_key("hello"));
    }

    #[tokio::test]
    async fn missing_shard_is_unavailable() {
        let index = ShardIndex::new(Arc::new(corpus()));
        let err = index.resolve(ShardKey::Letter('z')).await.unwrap_err();
        assert!(matches!(err, IndexError::Unavailable(ref e) if e.key == ShardKey::Letter('z')));
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let store = Arc::new(CountingStore::new(corpus()));
        let index = ShardIndex::new(store.clone());
        let h = ShardKey::Letter('h');

        index.resolve(h).await.unwrap();
        index.invalidate(h);
        assert_eq!(index.status(h), ShardStatus::Unloaded);

        index.resolve(h).await.unwrap();
        assert_eq!(store.opens(h), 2);
    }
}
