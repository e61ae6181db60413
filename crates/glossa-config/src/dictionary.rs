use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_expected_words() -> usize {
    58_000
}

fn default_prefetch() -> Vec<String> {
    vec![]
}

/// Where shard documents come from and how many headwords to expect.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Directory holding `a.json` .. `z.json` and `misc.json`
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
    /// Remote base URL; takes precedence over `corpus_dir` when set
    #[serde(default)]
    pub corpus_url: Option<String>,
    /// Informational headword count reported in metadata
    #[serde(default = "default_expected_words")]
    pub expected_words: usize,
    /// Shard stems to warm in the background at startup
    #[serde(default = "default_prefetch")]
    pub prefetch: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            corpus_url: None,
            expected_words: default_expected_words(),
            prefetch: default_prefetch(),
        }
    }
}

impl DictionaryConfig {
    pub fn new() -> Self {
        let corpus_dir = env::var("GLOSSA_CORPUS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_corpus_dir());

        let corpus_url = env::var("GLOSSA_CORPUS_URL").ok().filter(|v| !v.is_empty());

        let expected_words = env::var("GLOSSA_EXPECTED_WORDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_expected_words);

        Self {
            corpus_dir,
            corpus_url,
            expected_words,
            prefetch: default_prefetch(),
        }
    }
}
