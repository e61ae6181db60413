//! Keyed debounce for bursts of interactive requests.
//!
//! Each key holds at most one pending action. Scheduling again under the same
//! key cancels the previous action, so only the last call in a burst runs,
//! `delay` after that call.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

struct Pending {
    id: u64,
    cancel: CancellationToken,
}

pub struct DebounceGate<K> {
    handle: Handle,
    pending: Arc<Mutex<HashMap<K, Pending>>>,
    next_id: AtomicU64,
}

impl<K> DebounceGate<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    /// Gate whose timers run on the given runtime
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Gate bound to the runtime of the calling task.
    ///
    /// # Panics
    /// Outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Run `action` after `delay` unless `key` is scheduled again first.
    pub fn schedule<F, Fut>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        // Held across spawn so the new task cannot look itself up before it is registered
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.remove(&key) {
            previous.cancel.cancel();
            tracing::debug!("Debounce replaced pending action for {:?}", key);
        }

        let token = cancel.clone();
        let registry = Arc::clone(&self.pending);
        let task_key = key.clone();

        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            {
                let mut pending = registry.lock();
                match pending.get(&task_key) {
                    Some(current) if current.id == id => {
                        pending.remove(&task_key);
                    }
                    // superseded between the timer firing and taking the lock
                    _ => return,
                }
            }

            action().await;
        });

        pending.insert(key, Pending { id, cancel });
    }

    /// Cancel the pending action for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match self.pending.lock().remove(key) {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        for (_, pending) in drained {
            pending.cancel.cancel();
        }
    }

    /// Number of keys with an action still waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<K> Drop for DebounceGate<K> {
    fn drop(&mut self) {
        for (_, pending) in self.pending.lock().drain() {
            pending.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tokio::time::{Instant, sleep};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Arc<Mutex<Vec<Instant>>>) {
        (Arc::new(AtomicUsize::new(0)), Arc::new(Mutex::new(Vec::new())))
    }

    fn action(
        count: &Arc<AtomicUsize>,
        fired: &Arc<Mutex<Vec<Instant>>>,
    ) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let count = Arc::clone(count);
        let fired = Arc::clone(fired);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            fired.lock().push(Instant::now());
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_after_last_call() {
        let gate = DebounceGate::current();
        let (count, fired) = counter();
        let delay = Duration::from_millis(300);

        gate.schedule("x", delay, action(&count, &fired));
        sleep(Duration::from_millis(100)).await;
        gate.schedule("x", delay, action(&count, &fired));
        sleep(Duration::from_millis(100)).await;
        gate.schedule("x", delay, action(&count, &fired));
        let last_call = Instant::now();

        sleep(Duration::from_millis(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let fired_at = fired.lock()[0];
        let waited = fired_at - last_call;
        assert!(waited >= delay && waited < Duration::from_millis(310), "{waited:?}");

        // nothing left behind
        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let gate = DebounceGate::current();
        let (count, fired) = counter();
        let delay = Duration::from_millis(50);

        gate.schedule("a", delay, action(&count, &fired));
        gate.schedule("b", delay, action(&count, &fired));
        assert_eq!(gate.pending(), 2);

        sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_each_fire() {
        let gate = DebounceGate::current();
        let (count, fired) = counter();
        let delay = Duration::from_millis(50);

        gate.schedule(1u32, delay, action(&count, &fired));
        sleep(Duration::from_millis(80)).await;
        gate.schedule(1u32, delay, action(&count, &fired));
        sleep(Duration::from_millis(80)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let gate = DebounceGate::current();
        let (count, fired) = counter();

        gate.schedule("x", Duration::from_millis(50), action(&count, &fired));
        assert!(gate.cancel(&"x"));
        assert!(!gate.cancel(&"x"));

        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_gate_cancels_everything() {
        let (count, fired) = counter();
        {
            let gate = DebounceGate::current();
            gate.schedule("a", Duration::from_millis(50), action(&count, &fired));
            gate.schedule("b", Duration::from_millis(50), action(&count, &fired));
        }

        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn many_reschedules_do_not_pile_up() {
        let gate = DebounceGate::current();
        let (count, fired) = counter();

        for _ in 0..1000 {
            gate.schedule("typing", Duration::from_millis(20), action(&count, &fired));
        }
        assert_eq!(gate.pending(), 1);

        sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
