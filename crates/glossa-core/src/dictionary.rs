use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::InvalidQuery;

/// Dictionary lookup as seen by UI callers
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Resolve a raw query to a definition
    async fn lookup(&self, query: &str) -> Result<LookupOutcome, InvalidQuery>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

/// One headword and everything the corpus says about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    /// Normalized headword
    pub word: String,
    pub pronunciation: Option<String>,
    pub senses: Vec<Sense>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl DefinitionEntry {
    /// Sense texts in corpus order
    pub fn definitions(&self) -> Vec<&str> {
        self.senses.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub part_of_speech: PartOfSpeech,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Determiner,
    Numeral,
    Abbreviation,
    Phrase,
    Unknown,
}

impl PartOfSpeech {
    /// Lenient tag parsing; unrecognised tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().trim_end_matches('.').to_ascii_lowercase();
        match tag.as_str() {
            "n" | "noun" => PartOfSpeech::Noun,
            "v" | "vb" | "verb" | "vt" | "vi" => PartOfSpeech::Verb,
            "adj" | "a" | "adjective" => PartOfSpeech::Adjective,
            "adv" | "adverb" => PartOfSpeech::Adverb,
            "pron" | "pronoun" => PartOfSpeech::Pronoun,
            "prep" | "preposition" => PartOfSpeech::Preposition,
            "conj" | "conjunction" => PartOfSpeech::Conjunction,
            "interj" | "int" | "interjection" | "exclamation" => PartOfSpeech::Interjection,
            "det" | "determiner" | "article" => PartOfSpeech::Determiner,
            "num" | "numeral" | "number" => PartOfSpeech::Numeral,
            "abbr" | "abbrev" | "abbreviation" | "acronym" => PartOfSpeech::Abbreviation,
            "phr" | "phrase" | "idiom" => PartOfSpeech::Phrase,
            _ => PartOfSpeech::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Determiner => "determiner",
            PartOfSpeech::Numeral => "numeral",
            PartOfSpeech::Abbreviation => "abbreviation",
            PartOfSpeech::Phrase => "phrase",
            PartOfSpeech::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a dictionary lookup. Every variant is cacheable except where
/// the service says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Arc<DefinitionEntry>),
    NotFound,
    /// Shard could not be read or parsed
    Unavailable(String),
}

impl LookupOutcome {
    pub fn entry(&self) -> Option<&DefinitionEntry> {
        match self {
            LookupOutcome::Found(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryMetadata {
    pub name: String,
    pub resident_shards: usize,
    pub resident_entries: usize,
    /// Configured corpus size, informational only
    pub expected_words: usize,
}
