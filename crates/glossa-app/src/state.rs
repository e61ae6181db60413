use std::sync::Arc;

use glossa_config::Config;
use glossa_core::{DebounceGate, ShardKey};
use glossa_dictionary::DictionaryService;
use glossa_vocabulary::VocabularyStore;

/// Debounce key for interactive lookups
pub const QUERY_KEY: &str = "query";

pub struct AppState {
    pub config: Config,
    pub dictionary: Arc<DictionaryService>,
    pub vocabulary: Arc<VocabularyStore>,
    pub gate: DebounceGate<&'static str>,
}

impl AppState {
    /// Build services from config. Must run inside the tokio runtime.
    pub async fn new(config: Config) -> Self {
        let dictionary = Arc::new(DictionaryService::from_config(&config));

        let vocabulary = VocabularyStore::open_default(config.vocabulary.path.clone()).await;
        if let Some(warning) = vocabulary.load_warning() {
            tracing::warn!("Saved words reset: {}", warning);
        }

        let state = Self {
            config,
            dictionary,
            vocabulary: Arc::new(vocabulary),
            gate: DebounceGate::current(),
        };
        state.spawn_prefetch();
        state
    }

    /// Warm configured shards without blocking startup
    fn spawn_prefetch(&self) {
        let keys: Vec<ShardKey> = self
            .config
            .dictionary
            .prefetch
            .iter()
            .filter_map(|stem| match stem.parse() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!("Ignoring prefetch entry: {}", e);
                    None
                }
            })
            .collect();

        if keys.is_empty() {
            return;
        }

        let dictionary = Arc::clone(&self.dictionary);
        tokio::spawn(async move {
            dictionary.prefetch(keys).await;
        });
    }
}
