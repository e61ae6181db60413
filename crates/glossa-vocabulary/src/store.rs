// Vocabulary store - the user's saved words, persisted as one JSON document.
// Every mutation is written with temp file + fsync + rename before it is
// acknowledged, so a crash loses at most the call that was in flight.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use glossa_core::{Clock, SystemClock, normalize};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::document::{self, VocabularyItem};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    /// Word is empty after normalization
    #[error("Invalid word: {0:?}")]
    InvalidWord(String),

    /// Change could not be made durable; nothing was applied
    #[error("Saved words temporarily unavailable: {0}")]
    Persistence(String),

    /// Stored list was read but its content is not a vocabulary document
    #[error("Vocabulary store corrupt at {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Stored list exists but could not be read (permissions, I/O)
    #[error("Vocabulary store unreadable at {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

pub struct VocabularyStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    /// Committed state, only replaced after a successful write
    items: RwLock<HashMap<String, DateTime<Utc>>>,
    /// Serializes mutations so writes never interleave
    write_lock: Mutex<()>,
    load_warning: Option<VocabularyError>,
    /// False when the file on disk could not be read; it must not be overwritten
    writable: bool,
}

impl VocabularyStore {
    /// Open the store at `path`, starting empty if the file is missing.
    /// A corrupt file fails with `VocabularyError::Corrupt`.
    pub async fn try_open(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, VocabularyError> {
        let path = path.into();
        tracing::debug!("Loading vocabulary from {:?}", path);

        let items = match tokio::fs::read_to_string(&path).await {
            Ok(content) => document::decode(&content, clock.now()).map_err(|e| {
                VocabularyError::Corrupt {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No vocabulary file found, starting with empty store");
                HashMap::new()
            }
            Err(e) => {
                return Err(VocabularyError::Unreadable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!("Loaded {} saved words", items.len());
        Ok(Self::with_items(path, clock, items, None))
    }

    /// Like `try_open`, but never fails. The problem is kept in `load_warning`.
    ///
    /// A corrupt file is moved aside and the store starts empty. A file that
    /// could not be read at all is left in place and the store refuses
    /// mutations, so the saved list is never replaced by an empty one.
    pub async fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let path = path.into();
        match Self::try_open(path.clone(), Arc::clone(&clock)).await {
            Ok(store) => store,
            Err(e @ VocabularyError::Corrupt { .. }) => {
                tracing::warn!("{}; starting with an empty vocabulary", e);
                quarantine(&path).await;
                Self::with_items(path, clock, HashMap::new(), Some(e))
            }
            Err(e) => {
                tracing::warn!("{}; saved words are read-only for this session", e);
                let mut store = Self::with_items(path, clock, HashMap::new(), Some(e));
                store.writable = false;
                store
            }
        }
    }

    /// `open` with the system clock
    pub async fn open_default(path: impl Into<PathBuf>) -> Self {
        Self::open(path, Arc::new(SystemClock)).await
    }

    fn with_items(
        path: PathBuf,
        clock: Arc<dyn Clock>,
        items: HashMap<String, DateTime<Utc>>,
        load_warning: Option<VocabularyError>,
    ) -> Self {
        Self {
            path,
            clock,
            items: RwLock::new(items),
            write_lock: Mutex::new(()),
            load_warning,
            writable: true,
        }
    }

    /// Save `word`, or refresh its timestamp if already saved
    pub async fn add(&self, raw: &str) -> Result<VocabularyItem, VocabularyError> {
        let word = normalize(raw);
        if word.is_empty() {
            return Err(VocabularyError::InvalidWord(raw.to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let saved_at = self.clock.now();

        let mut next = self.items.read().clone();
        next.insert(word.clone(), saved_at);
        self.commit(next).await?;

        tracing::debug!("Saved '{}'", word);
        Ok(VocabularyItem { word, saved_at })
    }

    /// Forget `word`. Returns false if it was not saved, without touching storage.
    pub async fn remove(&self, word: &str) -> Result<bool, VocabularyError> {
        let word = normalize(word);

        let _guard = self.write_lock.lock().await;
        if !self.items.read().contains_key(&word) {
            return Ok(false);
        }

        let mut next = self.items.read().clone();
        next.remove(&word);
        self.commit(next).await?;

        tracing::debug!("Removed '{}'", word);
        Ok(true)
    }

    /// Drop every saved word
    pub async fn clear(&self) -> Result<(), VocabularyError> {
        let _guard = self.write_lock.lock().await;
        self.commit(HashMap::new()).await?;
        tracing::info!("Vocabulary cleared");
        Ok(())
    }

    /// Saved words, most recently saved first
    pub fn list(&self) -> Vec<VocabularyItem> {
        document::ordered(&self.items.read())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.items.read().contains_key(&normalize(word))
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the store started empty, if it had to
    pub fn load_warning(&self) -> Option<&VocabularyError> {
        self.load_warning.as_ref()
    }

    /// Write `next` to disk, then make it the visible state
    async fn commit(&self, next: HashMap<String, DateTime<Utc>>) -> Result<(), VocabularyError> {
        if !self.writable {
            return Err(VocabularyError::Persistence(format!(
                "{} could not be read at startup",
                self.path.display()
            )));
        }

        let content =
            document::encode(&next).map_err(|e| VocabularyError::Persistence(e.to_string()))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, content.as_bytes()))
            .await
            .map_err(|e| VocabularyError::Persistence(format!("write task failed: {}", e)))??;

        *self.items.write() = next;
        Ok(())
    }
}

/// `<name>.tmp` next to `path`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Persist using temp file + fsync + rename, then fsync the directory so the
/// rename itself survives power loss
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), VocabularyError> {
    tracing::debug!("Persisting vocabulary to {:?}", path);

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(|e| VocabularyError::Persistence(e.to_string()))?;
    }

    let temp_path = temp_path(path);

    {
        let mut file = File::create(&temp_path).map_err(|e| {
            VocabularyError::Persistence(format!("Failed to create temp file: {}", e))
        })?;
        file.write_all(content)
            .map_err(|e| VocabularyError::Persistence(format!("Failed to write: {}", e)))?;
        file.sync_all()
            .map_err(|e| VocabularyError::Persistence(format!("Failed to sync: {}", e)))?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VocabularyError::Persistence(format!("Failed to rename: {}", e))
    })?;

    #[cfg(unix)]
    {
        let dir = parent.unwrap_or(Path::new("."));
        File::open(dir).and_then(|d| d.sync_all()).map_err(|e| {
            VocabularyError::Persistence(format!("Failed to sync directory: {}", e))
        })?;
    }

    Ok(())
}

/// Move an unreadable vocabulary file to `<name>.corrupt` so the next save
/// does not overwrite it.
async fn quarantine(path: &Path) {
    let Some(name) = path.file_name() else {
        return;
    };
    if tokio::fs::metadata(path).await.is_err() {
        return;
    }

    let mut aside = name.to_os_string();
    aside.push(".corrupt");
    let aside = path.with_file_name(aside);

    match tokio::fs::rename(path, &aside).await {
        Ok(()) => tracing::warn!("Moved unreadable vocabulary to {:?}", aside),
        Err(e) => tracing::error!("Could not move unreadable vocabulary aside: {}", e),
    }
}
