use std::path::{Path, PathBuf};

use glossa_core::{ShardKey, ShardUnavailable};

use super::{ShardStore, file_name};

/// Shards stored as `<root>/a.json` .. `<root>/z.json` and `<root>/misc.json`
#[derive(Debug, Clone)]
pub struct DirectoryShardStore {
    root: PathBuf,
}

impl DirectoryShardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shard_path(&self, key: ShardKey) -> PathBuf {
        self.root.join(file_name(key))
    }
}

#[async_trait::async_trait]
impl ShardStore for DirectoryShardStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        let path = self.shard_path(key);
        tracing::debug!("Reading shard {} from {}", key, path.display());

        tokio::fs::read(&path)
            .await
            .map_err(|e| ShardUnavailable::new(key, format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
