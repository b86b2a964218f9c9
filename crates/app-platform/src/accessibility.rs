//! Reduce-motion accessibility preference
//!
//! The platform reports the preference once at startup and then on every
//! change. Consumers either poll [`ReduceMotion::is_enabled`] or register a
//! listener and detach it when they go away.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Read access to the reduce-motion preference
pub trait ReduceMotion: Send + Sync {
    /// Whether the user asked for reduced motion
    fn is_enabled(&self) -> bool;
}

/// A preference that never changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedReduceMotion(pub bool);

impl ReduceMotion for FixedReduceMotion {
    fn is_enabled(&self) -> bool {
        self.0
    }
}

/// Handle returned by [`ReduceMotionSignal::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Live reduce-motion preference fed by the platform
///
/// Clones share the same underlying value and listener set.
#[derive(Clone)]
pub struct ReduceMotionSignal {
    sender: Arc<watch::Sender<bool>>,
    listeners: Arc<Mutex<BTreeMap<ListenerId, Listener>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for ReduceMotionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReduceMotionSignal")
            .field("enabled", &*self.sender.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Default for ReduceMotionSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReduceMotionSignal {
    /// Create a signal with the value the platform reported at startup
    pub fn new(initial: bool) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            listeners: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Publish a change from the platform. Listeners only fire when the value
    /// actually changes.
    pub fn set(&self, enabled: bool) {
        let previous = self.sender.send_replace(enabled);
        if previous == enabled {
            return;
        }

        tracing::debug!(enabled, "reduce motion preference changed");
        let listeners: Vec<Listener> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener(enabled);
        }
    }

    /// Register a change listener
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::new(listener));
        id
    }

    /// Detach a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Async change stream for consumers that await updates
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl ReduceMotion for ReduceMotionSignal {
    fn is_enabled(&self) -> bool {
        *self.sender.borrow()
    }
}
