use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use self::cache::CacheConfig;
use self::debounce::DebounceConfig;
use self::dictionary::DictionaryConfig;
use self::log::LogConfig;
use self::vocabulary::VocabularyConfig;

pub mod cache;
pub mod debounce;
pub mod dictionary;
pub mod log;
pub mod vocabulary;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub cache: CacheConfig,
    pub vocabulary: VocabularyConfig,
    pub debounce: DebounceConfig,
    pub log: LogConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        Config {
            dictionary: DictionaryConfig::new(),
            cache: CacheConfig::new(),
            vocabulary: VocabularyConfig::new(),
            debounce: DebounceConfig::new(),
            log: LogConfig::new(),
        }
    }

    /// Load a JSON config file layered over `Config::new()`: fields the file
    /// leaves out keep their environment or built-in values.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let parse_err = |source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        };

        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let overrides: Value = serde_json::from_str(&data).map_err(parse_err)?;
        let mut merged = serde_json::to_value(Config::new()).map_err(parse_err)?;
        merge(&mut merged, overrides);

        serde_json::from_value(merged).map_err(parse_err)
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, value) => *base = value,
    }
}
