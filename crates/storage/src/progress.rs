//! Lesson progress store
//!
//! Persists the set of completed lesson ids. The store is the only place that
//! touches disk for progress; screens talk to it through [`ProgressBackend`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::persistence::{PersistedState, PersistenceConfig, PersistenceError};

/// Default file stem for the progress file
pub const PROGRESS_STORAGE_KEY: &str = "babble.progress.v1";

/// Progress store errors
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Underlying persistence failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type for progress operations
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Persisted lesson progress
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Completed lesson ids, in completion order
    #[serde(default)]
    pub completed_lesson_ids: Vec<String>,
}

impl ProgressSnapshot {
    /// Build a snapshot from ids, dropping duplicates
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completed_lesson_ids: ids.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    /// Remove duplicate ids, keeping the first occurrence
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.completed_lesson_ids.retain(|id| seen.insert(id.clone()));
        self
    }

    /// Whether a lesson has been completed
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lesson_ids.iter().any(|id| id == lesson_id)
    }

    /// Completed ids as a set
    pub fn completed_set(&self) -> HashSet<String> {
        self.completed_lesson_ids.iter().cloned().collect()
    }
}

/// Storage contract for lesson progress
#[async_trait]
pub trait ProgressBackend: Send + Sync {
    /// Load the current progress, writing back the normalized form
    async fn load(&self) -> Result<ProgressSnapshot>;

    /// Replace the stored progress
    async fn save(&self, snapshot: ProgressSnapshot) -> Result<ProgressSnapshot>;

    /// Mark a lesson complete. Re-marking a completed lesson changes nothing.
    async fn mark_complete(&self, lesson_id: &str) -> Result<ProgressSnapshot>;

    /// Forget all progress
    async fn reset(&self) -> Result<ProgressSnapshot>;
}

/// File-backed progress store
///
/// Operations run one at a time, so a lazy first load and concurrent
/// completions never interleave.
pub struct ProgressStore {
    state: PersistedState<ProgressSnapshot>,
    ops: Mutex<()>,
}

impl ProgressStore {
    /// Create a store writing to `dir/babble.progress.v1.json`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(format!("{PROGRESS_STORAGE_KEY}.json"));
        Self::new(PersistenceConfig::new(path))
    }

    /// Create a store with an explicit persistence configuration
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            state: PersistedState::new(config),
            ops: Mutex::new(()),
        }
    }

    async fn ensure_loaded(&self) -> Result<()> {
        if !self.state.is_initialized().await {
            self.load_locked().await?;
        }
        Ok(())
    }

    // caller holds `ops`
    async fn load_locked(&self) -> Result<ProgressSnapshot> {
        match self.state.init().await {
            Ok(()) => {}
            Err(e @ (PersistenceError::Serialization(_) | PersistenceError::Corruption(_))) => {
                tracing::warn!(
                    path = %self.state.path().display(),
                    error = %e,
                    "unreadable progress file, starting fresh"
                );
                self.state.set(ProgressSnapshot::default()).await?;
                return Ok(ProgressSnapshot::default());
            }
            Err(e) => return Err(e.into()),
        }

        let normalized = self.state.get().await?.normalized();
        self.state.set(normalized.clone()).await?;
        Ok(normalized)
    }
}

#[async_trait]
impl ProgressBackend for ProgressStore {
    async fn load(&self) -> Result<ProgressSnapshot> {
        let _guard = self.ops.lock().await;
        self.load_locked().await
    }

    async fn save(&self, snapshot: ProgressSnapshot) -> Result<ProgressSnapshot> {
        let _guard = self.ops.lock().await;
        let normalized = snapshot.normalized();
        self.state.set(normalized.clone()).await?;
        Ok(normalized)
    }

    async fn mark_complete(&self, lesson_id: &str) -> Result<ProgressSnapshot> {
        let _guard = self.ops.lock().await;
        self.ensure_loaded().await?;

        let updated = self
            .state
            .update_if(|s| {
                if s.is_completed(lesson_id) {
                    return false;
                }
                s.completed_lesson_ids.push(lesson_id.to_string());
                tracing::info!(lesson_id, "lesson completed");
                true
            })
            .await?;
        Ok(updated)
    }

    async fn reset(&self) -> Result<ProgressSnapshot> {
        let _guard = self.ops.lock().await;
        tracing::info!("progress reset");
        self.state.set(ProgressSnapshot::default()).await?;
        Ok(ProgressSnapshot::default())
    }
}

/// In-memory backend for tests and previews
#[derive(Debug, Default, Clone)]
pub struct MemoryProgressBackend {
    inner: Arc<RwLock<ProgressSnapshot>>,
}

impl MemoryProgressBackend {
    /// Create a backend seeded with completed ids
    pub fn with_completed<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(RwLock::new(ProgressSnapshot::from_ids(ids))),
        }
    }
}

#[async_trait]
impl ProgressBackend for MemoryProgressBackend {
    async fn load(&self) -> Result<ProgressSnapshot> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, snapshot: ProgressSnapshot) -> Result<ProgressSnapshot> {
        let normalized = snapshot.normalized();
        *self.inner.write().await = normalized.clone();
        Ok(normalized)
    }

    async fn mark_complete(&self, lesson_id: &str) -> Result<ProgressSnapshot> {
        let mut inner = self.inner.write().await;
        if !inner.is_completed(lesson_id) {
            inner.completed_lesson_ids.push(lesson_id.to_string());
        }
        Ok(inner.clone())
    }

    async fn reset(&self) -> Result<ProgressSnapshot> {
        *self.inner.write().await = ProgressSnapshot::default();
        Ok(ProgressSnapshot::default())
    }
}
