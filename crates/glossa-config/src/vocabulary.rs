use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> PathBuf {
    PathBuf::from("vocabulary.json")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct VocabularyConfig {
    /// File backing the saved-word list
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl VocabularyConfig {
    pub fn new() -> Self {
        let path = env::var("GLOSSA_VOCABULARY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_path());

        Self { path }
    }
}
