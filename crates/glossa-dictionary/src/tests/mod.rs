//! Test doubles for shard stores and end-to-end service scenarios

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use glossa_core::{ShardKey, ShardUnavailable};
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::store::{MemoryShardStore, ShardStore};


/// Counts `open` calls per shard
pub(crate) struct CountingStore {
    inner: MemoryShardStore,
    opens: Mutex<HashMap<ShardKey, usize>>,
}

impl CountingStore {
    pub(crate) fn new(inner: MemoryShardStore) -> Self {
        Self {
            inner,
            opens: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn opens(&self, key: ShardKey) -> usize {
        self.opens.lock().get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn total_opens(&self) -> usize {
        self.opens.lock().values().sum()
    }
}

#[async_trait::async_trait]
impl ShardStore for CountingStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        *self.opens.lock().entry(key).or_insert(0) += 1;
        // give concurrent callers a chance to pile up on the same slot
        tokio::task::yield_now().await;
        self.inner.open(key).await
    }

    fn describe(&self) -> String {
        format!("counting {}", self.inner.describe())
    }
}

/// Fails the first `failures` opens, then delegates
pub(crate) struct FlakyStore {
    inner: MemoryShardStore,
    failures: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new(inner: MemoryShardStore, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait::async_trait]
impl ShardStore for FlakyStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ShardUnavailable::new(key, "connection reset"));
        }
        self.inner.open(key).await
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

/// Holds every `open` until a permit is released, signalling each arrival
pub(crate) struct GatedStore {
    inner: MemoryShardStore,
    pub(crate) entered: Notify,
    pub(crate) release: Semaphore,
    opens: AtomicUsize,
}

impl GatedStore {
    pub(crate) fn new(inner: MemoryShardStore) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            release: Semaphore::new(0),
            opens: AtomicUsize::new(0),
        }
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ShardStore for GatedStore {
    async fn open(&self, key: ShardKey) -> Result<Vec<u8>, ShardUnavailable> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        let permit = self
            .release
            .acquire()
            .await
            .map_err(|_| ShardUnavailable::new(key, "gate closed"))?;
        permit.forget();
        self.inner.open(key).await
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}
