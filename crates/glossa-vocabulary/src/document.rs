use std::collections::HashMap;

use chrono::{DateTime, Utc};
use glossa_core::normalize;
use serde::{Deserialize, Serialize};

pub const DOCUMENT_VERSION: u32 = 1;

/// A word the user chose to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    pub saved_at: DateTime<Utc>,
}

/// On-disk shape of the saved-word list
#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyDocument {
    pub version: u32,
    pub words: Vec<VocabularyItem>,
}

/// Everything `decode` accepts. Bare word arrays come from older exports
/// that did not record timestamps.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Document(VocabularyDocument),
    Words(Vec<String>),
}

/// Parse a stored list into `word -> saved_at`, normalizing words and keeping
/// the newest timestamp for duplicates. Untimestamped words get `fallback`.
pub fn decode(
    content: &str,
    fallback: DateTime<Utc>,
) -> Result<HashMap<String, DateTime<Utc>>, serde_json::Error> {
    let items: Vec<(String, DateTime<Utc>)> = match serde_json::from_str(content)? {
        Stored::Document(doc) => doc
            .words
            .into_iter()
            .map(|item| (item.word, item.saved_at))
            .collect(),
        Stored::Words(words) => words.into_iter().map(|w| (w, fallback)).collect(),
    };

    let mut map = HashMap::with_capacity(items.len());
    for (word, saved_at) in items {
        let word = normalize(&word);
        if word.is_empty() {
            continue;
        }
        map.entry(word)
            .and_modify(|at: &mut DateTime<Utc>| *at = (*at).max(saved_at))
            .or_insert(saved_at);
    }
    Ok(map)
}

/// Items ordered most recently saved first, ties by word
pub fn ordered(items: &HashMap<String, DateTime<Utc>>) -> Vec<VocabularyItem> {
    let mut list: Vec<VocabularyItem> = items
        .iter()
        .map(|(word, saved_at)| VocabularyItem {
            word: word.clone(),
            saved_at: *saved_at,
        })
        .collect();
    list.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.word.cmp(&b.word)));
    list
}

pub fn encode(items: &HashMap<String, DateTime<Utc>>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&VocabularyDocument {
        version: DOCUMENT_VERSION,
        words: ordered(items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn decodes_document() {
        let content = r#"{
            "version": 1,
            "words": [
                {"word": "Serendipity", "savedAt": "2024-05-01T10:00:00Z"},
                {"word": "serendipity", "savedAt": "2024-06-01T10:00:00Z"},
                {"word": "ephemeral", "savedAt": "2024-04-01T10:00:00Z"}
            ]
        }"#;
        let map = decode(content, at(0)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map["serendipity"],
            "2024-06-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn decodes_bare_word_list() {
        let map = decode(r#"["Alpha", " beta ", ""]"#, at(42)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["alpha"], at(42));
        assert_eq!(map["beta"], at(42));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("{\"version\": 1}", at(0)).is_err());
        assert!(decode("\u{0}\u{1}", at(0)).is_err());
        assert!(decode("", at(0)).is_err());
    }

    #[test]
    fn orders_newest_first() {
        let mut items = HashMap::new();
        items.insert("b".to_string(), at(10));
        items.insert("a".to_string(), at(10));
        items.insert("c".to_string(), at(20));
        let words: Vec<_> = ordered(&items).into_iter().map(|i| i.word).collect();
        assert_eq!(words, vec!["c", "a", "b"]);
    }

    #[test]
    fn encode_then_decode_keeps_words() {
        let mut items = HashMap::new();
        items.insert("lucid".to_string(), at(100));
        items.insert("terse".to_string(), at(200));
        let content = encode(&items).unwrap();
        assert!(content.contains("\"savedAt\""));
        assert_eq!(decode(&content, at(0)).unwrap(), items);
    }
}
