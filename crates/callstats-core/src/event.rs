//! Typed event channels.
//!
//! An entity exposes one `EventChannel` per notification it emits (a size
//! change, a terminal event). Observers attach with [`EventChannel::on`] or
//! [`EventChannel::once`] and receive a [`Subscription`] handle; dropping or
//! cancelling the handle detaches the listener.
//!
//! Dispatch is synchronous on the emitting thread. `emit` snapshots the
//! listener table before invoking anything, so a listener may cancel other
//! subscriptions (or its own) while it runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type OnceListener<T> = Box<dyn FnOnce(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: AtomicU64,
    repeating: DashMap<u64, Listener<T>>,
    once: DashMap<u64, OnceListener<T>>,
}

impl<T> Listeners<T> {
    fn remove(&self, id: u64) {
        self.repeating.remove(&id);
        self.once.remove(&id);
    }
}

/// A typed notification channel owned by the emitting entity.
pub struct EventChannel<T> {
    inner: Arc<Listeners<T>>,
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Listeners {
                next_id: AtomicU64::new(1),
                repeating: DashMap::new(),
                once: DashMap::new(),
            }),
        }
    }

    /// Attach a listener invoked on every emission until cancelled.
    pub fn on<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.repeating.insert(id, Arc::new(f));
        Subscription::new(Arc::downgrade(&self.inner), id)
    }

    /// Attach a listener invoked at most once.
    ///
    /// The listener is removed from the table before it runs; concurrent or
    /// repeated emissions race on that removal and exactly one of them wins.
    pub fn once<F>(&self, f: F) -> Subscription
    where
        F: FnOnce(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.once.insert(id, Box::new(f));
        Subscription::new(Arc::downgrade(&self.inner), id)
    }

    /// Deliver `value` to every attached listener.
    pub fn emit(&self, value: &T) {
        let repeating: Vec<Listener<T>> = self
            .inner
            .repeating
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        for listener in repeating {
            listener(value);
        }

        let once_ids: Vec<u64> = self.inner.once.iter().map(|e| *e.key()).collect();
        for id in once_ids {
            if let Some((_, listener)) = self.inner.once.remove(&id) {
                listener(value);
            }
        }
    }

    /// Number of listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.inner.repeating.len() + self.inner.once.len()
    }
}

/// Handle to an attached listener.
///
/// Dropping the handle detaches the listener. Use [`Subscription::disarm`] to
/// leave it attached for the lifetime of the channel instead.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<T: 'static>(listeners: Weak<Listeners<T>>, id: u64) -> Self {
        Self {
            detach: Some(Box::new(move || {
                if let Some(l) = listeners.upgrade() {
                    l.remove(id);
                }
            })),
        }
    }

    /// Detach the listener now. No-op if the channel is already gone.
    pub fn cancel(mut self) {
        self.run_detach();
    }

    /// Give up the handle without detaching the listener.
    pub fn disarm(mut self) {
        self.detach = None;
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.detach.is_some())
            .finish()
    }
}
