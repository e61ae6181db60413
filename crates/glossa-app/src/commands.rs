//! One-shot subcommands. Output goes to the given writer so the commands
//! can be exercised without a terminal.

use std::io::Write;

use glossa_core::dictionary::Dictionary;

use crate::render::{LookupView, render_outcome, render_saved};
use crate::state::AppState;

/// Look up each word in order. Returns how many were found.
pub async fn lookup(
    state: &AppState,
    words: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let mut found = 0;

    for word in words {
        let outcome = match state.dictionary.lookup(word).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };

        if outcome.is_found() {
            found += 1;
        }

        if json {
            writeln!(out, "{}", serde_json::to_string(&LookupView::new(word, &outcome))?)?;
        } else {
            writeln!(out, "{}", render_outcome(word, &outcome))?;
        }
    }

    Ok(found)
}

pub async fn save(state: &AppState, word: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let item = state.vocabulary.add(word).await?;
    writeln!(out, "saved {}", item.word)?;
    Ok(())
}

pub async fn unsave(state: &AppState, word: &str, out: &mut impl Write) -> anyhow::Result<()> {
    if state.vocabulary.remove(word).await? {
        writeln!(out, "removed {}", word.trim())?;
    } else {
        writeln!(out, "{} was not saved", word.trim())?;
    }
    Ok(())
}

pub fn saved(state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", render_saved(&state.vocabulary.list()))?;
    Ok(())
}

/// Run the lookups, then report cache and shard residency
pub async fn stats(state: &AppState, words: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    for word in words {
        if let Err(e) = state.dictionary.lookup(word).await {
            tracing::warn!("{}", e);
        }
    }

    let stats = state.dictionary.cache_stats();
    let metadata = state.dictionary.metadata();

    writeln!(
        out,
        "cache: {}/{} entries, {} hits, {} misses, {} evictions",
        stats.len, stats.capacity, stats.hits, stats.misses, stats.evictions
    )?;
    writeln!(
        out,
        "shards: {} resident, {} entries (corpus size ~{} words)",
        metadata.resident_shards, metadata.resident_entries, metadata.expected_words
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use glossa_config::Config;
    use tempfile::TempDir;

    use super::*;

    async fn state(dir: &TempDir) -> AppState {
        let corpus = dir.path().join("corpus");
        fs::create_dir_all(&corpus).unwrap();
        fs::write(
            corpus.join("h.json"),
            r#"{"hello": {"definitions": ["a greeting"]}}"#,
        )
        .unwrap();
        fs::write(corpus.join("z.json"), "{}").unwrap();

        let mut config = Config::default();
        config.dictionary.corpus_dir = corpus;
        config.vocabulary.path = dir.path().join("vocabulary.json");
        config.cache.capacity = 8;
        AppState::new(config).await
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn lookup_prints_each_word() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        let words = vec!["Hello".to_string(), "zzzqx".to_string(), " ".to_string()];
        let found = lookup(&state, &words, false, &mut out).await.unwrap();

        assert_eq!(found, 1);
        assert_eq!(
            text(out),
            "hello\n  1. a greeting\nzzzqx: no definition found\n"
        );
    }

    #[tokio::test]
    async fn lookup_reports_missing_shard_as_unavailable() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        let found = lookup(&state, &["quill".to_string()], false, &mut out)
            .await
            .unwrap();

        assert_eq!(found, 0);
        assert_eq!(text(out), "quill: definition unavailable\n");
    }

    #[tokio::test]
    async fn lookup_json_lines() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        lookup(&state, &["hello".to_string()], true, &mut out)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(text(out).trim()).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["entry"]["word"], "hello");
    }

    #[tokio::test]
    async fn save_list_unsave() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        save(&state, " Serendipity ", &mut out).await.unwrap();
        unsave(&state, "missing", &mut out).await.unwrap();
        assert_eq!(text(out), "saved serendipity\nmissing was not saved\n");

        let mut out = Vec::new();
        saved(&state, &mut out).unwrap();
        assert!(text(out).trim_end().ends_with("serendipity"));

        let mut out = Vec::new();
        unsave(&state, "serendipity", &mut out).await.unwrap();
        saved(&state, &mut out).unwrap();
        assert_eq!(text(out), "removed serendipity\nno saved words\n");
    }

    #[tokio::test]
    async fn save_rejects_blank_word() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        assert!(save(&state, "   ", &mut out).await.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn stats_reports_cache_and_shards() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let mut out = Vec::new();
        let words = vec!["hello".to_string(), "hello".to_string()];
        stats(&state, &words, &mut out).await.unwrap();

        let report = text(out);
        assert!(report.contains("cache: 1/8 entries, 1 hits, 1 misses, 0 evictions"));
        assert!(report.contains("shards: 1 resident, 1 entries"));
    }
}
