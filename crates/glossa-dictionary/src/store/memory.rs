use std::collections::HashMap;

use glossa_core::{ShardKey, ShardUnavailable};

use super::ShardStore;

/// Shards held in memory, e.g. bundled with the binary
#[derive(Debug, Default, Clone)]
pub struct MemoryShardStore {
    shards: HashMap<ShardKey, Vec<u8>>,
}

impl MemoryShardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shard(mut self, key: ShardKey, content: impl Into<Vec<u8>>) -> Self {
        self.insert(key, content);
        self
    }

    pub fn insert(&mut self, key: ShardKey, content: impl Into<Vec<u8>>) {
        self.shards.insert(key, content.into());
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

#[async_trait::async_trait]
impl ShardStore for MemoryShardStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        self.shards
            .get(&key)
            .cloned()
            .ok_or_else(|| ShardUnavailable::new(key, "shard not bundled"))
    }

    fn describe(&self) -> String {
        format!("memory ({} shards)", self.shards.len())
    }
}
