use crate::shard::ShardKey;

/// Query was empty after normalization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid query: {0:?}")]
pub struct InvalidQuery(pub String);

/// Raw shard bytes could not be obtained. Retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Shard {key} unavailable: {reason}")]
pub struct ShardUnavailable {
    pub key: ShardKey,
    pub reason: String,
}

impl ShardUnavailable {
    pub fn new(key: ShardKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Shard content is malformed. Fatal for that shard until invalidated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Corpus parse error in shard {key}: {diagnostic}")]
pub struct CorpusParseError {
    pub key: ShardKey,
    pub diagnostic: String,
}

impl CorpusParseError {
    pub fn new(key: ShardKey, diagnostic: impl Into<String>) -> Self {
        Self {
            key,
            diagnostic: diagnostic.into(),
        }
    }
}
