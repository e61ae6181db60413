pub mod cache;
pub mod format;
pub mod index;
pub mod service;
pub mod store;

pub use cache::{CacheStats, LookupCache};
pub use index::{IndexError, ShardIndex, ShardMap, ShardStatus};
pub use service::DictionaryService;
pub use store::{DirectoryShardStore, HttpShardStore, MemoryShardStore, ShardStore};

#[cfg(test)]
mod tests;
