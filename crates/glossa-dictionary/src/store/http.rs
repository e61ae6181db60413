use glossa_core::{ShardKey, ShardUnavailable};

use super::{ShardStore, file_name};

/// Shards served as `<base_url>/<stem>.json`
#[derive(Clone)]
pub struct HttpShardStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpShardStore {
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn shard_url(&self, key: ShardKey) -> String {
        format!("{}/{}", self.base_url, file_name(key))
    }
}

#[async_trait::async_trait]
impl ShardStore for HttpShardStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        let url = self.shard_url(key);
        tracing::debug!("Fetching shard {} from {}", key, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShardUnavailable::new(key, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ShardUnavailable::new(
                key,
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ShardUnavailable::new(key, format!("body read failed: {}", e)))?;

        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}
