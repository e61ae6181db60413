use std::env;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

fn default_capacity() -> usize {
    512
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of resolved words kept in the lookup cache
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        let capacity = env::var("GLOSSA_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_capacity);

        Self { capacity }
    }

    /// Capacity as the cache expects it; zero is bumped to one.
    pub fn capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or_else(|| {
            tracing::warn!("cache capacity 0 is not usable, falling back to 1");
            NonZeroUsize::MIN
        })
    }
}
