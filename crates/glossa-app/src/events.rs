use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};

use crate::state::AppState;

pub mod text_input;
pub mod vocabulary;

use text_input::{handle_lookup, handle_text_input};
use vocabulary::{handle_save, handle_saved, handle_unsave};

/// Input events for the interactive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Raw query line, debounced before lookup
    TextInput(String),
    /// Debounce elapsed, look the query up now
    Lookup(String),
    /// Save a word, or the last looked-up word when empty
    Save(Option<String>),
    Unsave(String),
    ShowSaved,
    ShowStats,
    Quit,
}

impl AppEvent {
    /// Parse one input line. Blank lines yield nothing.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(command) = line.strip_prefix(':') else {
            return Some(AppEvent::TextInput(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        let event = match name {
            "save" | "s" => AppEvent::Save((!arg.is_empty()).then(|| arg.to_string())),
            "unsave" | "u" if !arg.is_empty() => AppEvent::Unsave(arg.to_string()),
            "saved" | "list" => AppEvent::ShowSaved,
            "stats" => AppEvent::ShowStats,
            "quit" | "q" | "exit" => AppEvent::Quit,
            _ => {
                tracing::warn!("Unknown command: {}", line);
                return None;
            }
        };

        Some(event)
    }
}

/// Interactive main loop. Returns once a quit event is handled.
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    input_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut last_word: Option<String> = None;

    tracing::debug!("Event loop started");
    loop {
        let event = input_rx.recv().await?;
        tracing::debug!("Event received: {:?}", event);

        match event {
            AppEvent::TextInput(text) => {
                handle_text_input(&state, text, &input_tx);
            }
            AppEvent::Lookup(query) => {
                if let Some(word) = handle_lookup(&state, &query).await {
                    last_word = Some(word);
                }
            }
            AppEvent::Save(word) => {
                handle_save(&state, word.or_else(|| last_word.clone())).await;
            }
            AppEvent::Unsave(word) => {
                handle_unsave(&state, &word).await;
            }
            AppEvent::ShowSaved => handle_saved(&state),
            AppEvent::ShowStats => {
                let stats = state.dictionary.cache_stats();
                println!(
                    "cache: {}/{} entries, {} hits, {} misses, {} evictions",
                    stats.len, stats.capacity, stats.hits, stats.misses, stats.evictions
                );
            }
            AppEvent::Quit => {
                if state.gate.pending() == 0 {
                    tracing::debug!("Event loop finished");
                    return Ok(());
                }

                // let the pending lookup land before quitting
                let tx = input_tx.clone();
                let delay = state.config.debounce.delay();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(AppEvent::Quit).await;
                });
            }
        }
    }
}
