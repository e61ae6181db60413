use std::sync::Arc;

use glossa_config::dictionary::DictionaryConfig;
use glossa_core::{ShardKey, ShardUnavailable};

pub mod directory;
pub mod http;
pub mod memory;

pub use directory::DirectoryShardStore;
pub use http::HttpShardStore;
pub use memory::MemoryShardStore;

/// Byte-level access to shard documents. No parsing, no caching.
///
/// Implementations must allow concurrent `open` calls for different keys.
#[async_trait::async_trait]
pub trait ShardStore: Send + Sync {
    /// Raw content of one shard
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Pick the store the config points at; a remote URL wins over a directory.
pub fn from_config(config: &DictionaryConfig) -> Arc<dyn ShardStore> {
    match &config.corpus_url {
        Some(url) => Arc::new(HttpShardStore::new(url.clone())),
        None => Arc::new(DirectoryShardStore::new(config.corpus_dir.clone())),
    }
}

/// `<stem>.json`
pub(crate) fn file_name(key: ShardKey) -> String {
    format!("{}.json", key.stem())
}
