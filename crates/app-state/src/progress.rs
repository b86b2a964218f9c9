//! Reactive lesson progress
//!
//! Screens hold a [`ProgressState`] instead of talking to the store directly.
//! It tracks whether the initial load has resolved, keeps the latest
//! snapshot for synchronous reads, and notifies subscribers after every
//! successful write.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storage::progress::{ProgressBackend, ProgressError, ProgressSnapshot};
use thiserror::Error;

/// Progress state errors
#[derive(Debug, Error)]
pub enum ProgressStateError {
    /// The backing store rejected the write
    #[error("Progress backend error: {0}")]
    Backend(#[from] ProgressError),
}

/// Result type for progress state operations
pub type Result<T> = std::result::Result<T, ProgressStateError>;

/// Handle returned by [`ProgressState::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

#[derive(Debug)]
struct Inner {
    loading: bool,
    snapshot: Option<ProgressSnapshot>,
}

/// Progress as seen by screens
pub struct ProgressState {
    backend: Arc<dyn ProgressBackend>,
    inner: RwLock<Inner>,
    listeners: Mutex<BTreeMap<SubscriptionId, Listener>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ProgressState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressState")
            .field("inner", &*self.inner.read())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

impl ProgressState {
    /// Create a state that has not loaded yet
    pub fn new(backend: Arc<dyn ProgressBackend>) -> Self {
        Self {
            backend,
            inner: RwLock::new(Inner { loading: true, snapshot: None }),
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether the initial load is still pending
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// Latest snapshot, `None` until loaded
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.inner.read().snapshot.clone()
    }

    /// Resolve the initial load. A failing backend reads as "no progress yet".
    pub async fn load(&self) -> ProgressSnapshot {
        let snapshot = match self.backend.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load progress, starting empty");
                ProgressSnapshot::default()
            }
        };
        self.publish(snapshot.clone());
        snapshot
    }

    /// Mark a lesson complete
    pub async fn complete_lesson(&self, lesson_id: &str) -> Result<ProgressSnapshot> {
        let snapshot = self.backend.mark_complete(lesson_id).await?;
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Replace progress wholesale
    pub async fn set(&self, snapshot: ProgressSnapshot) -> Result<ProgressSnapshot> {
        let saved = self.backend.save(snapshot).await?;
        self.publish(saved.clone());
        Ok(saved)
    }

    /// Clear all progress
    pub async fn reset(&self) -> Result<ProgressSnapshot> {
        let snapshot = self.backend.reset().await?;
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Register a listener called after every change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ProgressSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::new(listener));
        id
    }

    /// Detach a listener
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    fn publish(&self, snapshot: ProgressSnapshot) {
        {
            let mut inner = self.inner.write();
            inner.loading = false;
            inner.snapshot = Some(snapshot.clone());
        }

        // listeners may subscribe or unsubscribe from inside the callback
        let listeners: Vec<Listener> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
