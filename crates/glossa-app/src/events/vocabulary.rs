use crate::render::render_saved;
use crate::state::AppState;

pub async fn handle_save(state: &AppState, word: Option<String>) {
    let Some(word) = word else {
        println!("nothing to save yet, look a word up first");
        return;
    };

    match state.vocabulary.add(&word).await {
        Ok(item) => println!("saved {}", item.word),
        Err(e) => {
            tracing::error!("Save failed: {}", e);
            println!("could not save {}: {}", word, e);
        }
    }
}

pub async fn handle_unsave(state: &AppState, word: &str) {
    match state.vocabulary.remove(word).await {
        Ok(true) => println!("removed {}", word.trim()),
        Ok(false) => println!("{} was not saved", word.trim()),
        Err(e) => {
            tracing::error!("Unsave failed: {}", e);
            println!("could not remove {}: {}", word, e);
        }
    }
}

pub fn handle_saved(state: &AppState) {
    println!("{}", render_saved(&state.vocabulary.list()));
}
