use glossa_core::{DefinitionEntry, LookupOutcome};
use glossa_vocabulary::VocabularyItem;
use serde::Serialize;

/// JSON view of one lookup
#[derive(Serialize)]
pub struct LookupView<'a> {
    pub query: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<&'a DefinitionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

impl<'a> LookupView<'a> {
    pub fn new(query: &'a str, outcome: &'a LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found(entry) => Self {
                query,
                status: "found",
                entry: Some(entry),
                reason: None,
            },
            LookupOutcome::NotFound => Self {
                query,
                status: "not_found",
                entry: None,
                reason: None,
            },
            LookupOutcome::Unavailable(reason) => Self {
                query,
                status: "unavailable",
                entry: None,
                reason: Some(reason),
            },
        }
    }
}

pub fn render_outcome(query: &str, outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found(entry) => render_entry(entry),
        LookupOutcome::NotFound => format!("{}: no definition found", query.trim()),
        LookupOutcome::Unavailable(_) => format!("{}: definition unavailable", query.trim()),
    }
}

pub fn render_entry(entry: &DefinitionEntry) -> String {
    let mut out = entry.word.clone();
    if let Some(pronunciation) = &entry.pronunciation {
        out.push_str(&format!(" /{}/", pronunciation));
    }

    for (i, sense) in entry.senses.iter().enumerate() {
        out.push_str(&format!("\n  {}. ", i + 1));
        if sense.part_of_speech != glossa_core::PartOfSpeech::Unknown {
            out.push_str(&format!("({}) ", sense.part_of_speech));
        }
        out.push_str(&sense.text);
    }

    for example in &entry.examples {
        out.push_str(&format!("\n  e.g. {}", example));
    }

    out
}

pub fn render_saved(items: &[VocabularyItem]) -> String {
    if items.is_empty() {
        return "no saved words".to_string();
    }

    items
        .iter()
        .map(|item| format!("{}  {}", item.saved_at.format("%Y-%m-%d %H:%M"), item.word))
        .collect::<Vec<_>>()
        .join("\n")
}
