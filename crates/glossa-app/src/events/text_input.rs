use kanal::AsyncSender;

use crate::events::AppEvent;
use crate::render::render_outcome;
use crate::state::{AppState, QUERY_KEY};

/// Restart the debounce window for the latest query
pub fn handle_text_input(state: &AppState, text: String, input_tx: &AsyncSender<AppEvent>) {
    let tx = input_tx.clone();
    state
        .gate
        .schedule(QUERY_KEY, state.config.debounce.delay(), move || async move {
            if let Err(e) = tx.send(AppEvent::Lookup(text)).await {
                tracing::error!("Failed to queue lookup: {}", e);
            }
        });
}

/// Look the query up and print it. Returns the normalized word when found.
pub async fn handle_lookup(state: &AppState, query: &str) -> Option<String> {
    match state.dictionary.lookup(query).await {
        Ok(outcome) => {
            println!("{}", render_outcome(query, &outcome));
            outcome.entry().map(|entry| entry.word.clone())
        }
        Err(e) => {
            tracing::debug!("Skipping lookup: {}", e);
            None
        }
    }
}
