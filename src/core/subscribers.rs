//! Observer registry used to tell hosts that ledger or notification state changed.
//!
//! Contract: callbacks take no arguments, run synchronously on the thread that
//! performed the successful mutation, in registration order, and must not panic.
//! The registry lock is released before callbacks run, so a callback may
//! subscribe or unsubscribe without deadlocking.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Fan-out list of change listeners.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns the handle that removes it again.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = lock(&self.inner);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, Arc::new(callback)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invokes every registered listener once.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = lock(&self.inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the listener registered;
/// call [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the listener. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut guard = lock(&registry);
        let before = guard.entries.len();
        guard.entries.retain(|(id, _)| *id != self.id);
        guard.entries.len() != before
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn notify_reaches_every_listener() {
        let listeners = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            listeners.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        listeners.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let listeners = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let first = {
            let hits = Arc::clone(&hits);
            listeners.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _second = {
            let hits = Arc::clone(&hits);
            listeners.subscribe(move || {
                hits.fetch_add(10, Ordering::SeqCst);
            })
        };
        assert!(first.unsubscribe());
        listeners.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn listener_may_subscribe_during_notify() {
        let listeners = Listeners::new();
        let inner = listeners.clone();
        listeners.subscribe(move || {
            inner.subscribe(|| {});
        });
        listeners.notify();
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn unsubscribe_after_registry_dropped_is_harmless() {
        let listeners = Listeners::new();
        let subscription = listeners.subscribe(|| {});
        drop(listeners);
        assert!(!subscription.unsubscribe());
    }
}
