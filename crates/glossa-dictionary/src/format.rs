//! Shard document format.
//!
//! A shard is a JSON object mapping headwords to records:
//!
//! ```json
//! {
//!   "hello": {
//!     "pronunciation": "həˈləʊ",
//!     "definitions": [
//!       "a greeting",
//!       { "partOfSpeech": "interjection", "text": "used as a greeting" }
//!     ],
//!     "examples": ["hello there"]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use glossa_core::{CorpusParseError, DefinitionEntry, PartOfSpeech, ShardKey, Sense, normalize};
use serde::Deserialize;

use crate::index::ShardMap;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Deserialize)]
struct RawRecord {
    definitions: Vec<RawSense>,
    #[serde(default, alias = "phonetic")]
    pronunciation: Option<String>,
    #[serde(default)]
    examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSense {
    Text(String),
    Tagged {
        #[serde(default, rename = "partOfSpeech", alias = "pos")]
        part_of_speech: Option<String>,
        #[serde(alias = "definition")]
        text: String,
    },
}

impl From<RawSense> for Sense {
    fn from(raw: RawSense) -> Self {
        match raw {
            RawSense::Text(text) => Sense {
                part_of_speech: PartOfSpeech::Unknown,
                text,
            },
            RawSense::Tagged {
                part_of_speech,
                text,
            } => Sense {
                part_of_speech: part_of_speech
                    .as_deref()
                    .map(PartOfSpeech::from_tag)
                    .unwrap_or(PartOfSpeech::Unknown),
                text,
            },
        }
    }
}

/// Parse one shard document into a map keyed by normalized headword.
///
/// Headwords are visited in sorted raw-key order, so when two raw keys
/// normalize to the same word the result is deterministic: the later one wins.
/// Headwords that normalize to nothing, or that belong to another shard, are
/// skipped.
pub fn parse_shard(key: ShardKey, content: &[u8]) -> Result<ShardMap, CorpusParseError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let raw: BTreeMap<String, RawRecord> = serde_json::from_slice(content)
        .map_err(|e| CorpusParseError::new(key, e.to_string()))?;

    let mut entries: ShardMap = HashMap::with_capacity(raw.len());
    let mut skipped = 0usize;

    for (headword, record) in raw {
        let word = normalize(&headword);

        if word.is_empty() {
            skipped += 1;
            continue;
        }

        let routed = ShardKey::for_word(&word);
        if routed != key {
            tracing::warn!("Shard {}: '{}' belongs to shard {}, skipping", key, headword, routed);
            skipped += 1;
            continue;
        }

        let entry = DefinitionEntry {
            word: word.clone(),
            pronunciation: record
                .pronunciation
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            senses: record.definitions.into_iter().map(Sense::from).collect(),
            examples: record.examples,
        };

        if entries.insert(word, Arc::new(entry)).is_some() {
            tracing::warn!("Shard {}: duplicate headword '{}', keeping the later record", key, headword);
        }
    }

    if skipped > 0 {
        tracing::debug!("Shard {}: skipped {} headwords", key, skipped);
    }

    Ok(entries)
}
