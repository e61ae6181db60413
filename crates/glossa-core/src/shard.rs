use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Partition of the corpus by a word's initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShardKey {
    /// Lowercase ASCII initial `a`..=`z`
    Letter(char),
    /// Digits, symbols and non-ASCII initials
    CatchAll,
}

impl ShardKey {
    pub const COUNT: usize = 27;
    pub const CATCH_ALL_STEM: &'static str = "misc";

    /// Shard for an already normalized word. Empty words route to the catch-all.
    pub fn for_word(normalized: &str) -> Self {
        match normalized.chars().next() {
            Some(c) if c.is_ascii_lowercase() => ShardKey::Letter(c),
            _ => ShardKey::CatchAll,
        }
    }

    /// Dense slot number in `0..COUNT`.
    pub fn index(self) -> usize {
        match self {
            ShardKey::Letter(c) => (c as u8 - b'a') as usize,
            ShardKey::CatchAll => Self::COUNT - 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=25 => Some(ShardKey::Letter((b'a' + index as u8) as char)),
            26 => Some(ShardKey::CatchAll),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = ShardKey> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }

    /// File stem used by shard stores (`a`, `b`, ..., `misc`).
    pub fn stem(self) -> String {
        match self {
            ShardKey::Letter(c) => c.to_string(),
            ShardKey::CatchAll => Self::CATCH_ALL_STEM.to_string(),
        }
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown shard key: {0}")]
pub struct UnknownShardKey(pub String);

impl FromStr for ShardKey {
    type Err = UnknownShardKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::CATCH_ALL_STEM) {
            return Ok(ShardKey::CatchAll);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(ShardKey::Letter(c.to_ascii_lowercase()))
            }
            _ => Err(UnknownShardKey(s.to_string())),
        }
    }
}
