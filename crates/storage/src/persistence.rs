//! Versioned JSON persistence
//!
//! A single value is stored per file inside an envelope carrying the schema
//! version and an md5 checksum of the serialized payload. Writes go through a
//! temp file followed by a rename so a crash never leaves a half-written file.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State not initialized
    #[error("State not initialized")]
    NotInitialized,

    /// Checksum did not match the stored payload
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Stored schema version differs from the configured one
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    checksum: String,
    data: T,
}

fn checksum_of<T: Serialize>(data: &T) -> Result<String> {
    let json = serde_json::to_string(data)?;
    Ok(format!("{:x}", md5::compute(json)))
}

impl<T: Serialize> Envelope<T> {
    fn seal(version: u32, data: T) -> Result<Self> {
        let checksum = checksum_of(&data)?;
        Ok(Self { version, checksum, data })
    }

    fn verify(&self) -> Result<()> {
        let computed = checksum_of(&self.data)?;
        if computed != self.checksum {
            return Err(PersistenceError::Corruption(format!(
                "Checksum mismatch: expected {}, got {}",
                self.checksum, computed
            )));
        }
        Ok(())
    }
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the persistence file
    pub path: PathBuf,
    /// Current schema version
    pub version: u32,
    /// Write through a temp file and rename
    pub atomic_writes: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state.json"),
            version: 1,
            atomic_writes: true,
        }
    }
}

impl PersistenceConfig {
    /// Create a new configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set schema version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Enable or disable atomic writes
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }
}

/// A value mirrored in memory and on disk
pub struct PersistedState<T> {
    config: PersistenceConfig,
    state: Arc<RwLock<Option<T>>>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    /// Create a new persisted state manager
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Load from disk. A missing file initializes the default value.
    pub async fn init(&self) -> Result<()> {
        let data = match self.read_from_disk().await {
            Ok(data) => data,
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.config.path.display(), "no persisted state, using default");
                T::default()
            }
            Err(e) => return Err(e),
        };
        *self.state.write().await = Some(data);
        Ok(())
    }

    /// Whether `init` has completed
    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Get the current value
    pub async fn get(&self) -> Result<T> {
        let state = self.state.read().await;
        state.clone().ok_or(PersistenceError::NotInitialized)
    }

    /// Mutate the value in place and persist it, returning the new value
    pub async fn update<F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;
        let current = state.as_mut().ok_or(PersistenceError::NotInitialized)?;
        f(current);
        self.write_to_disk(current).await?;
        Ok(current.clone())
    }

    /// Mutate the value under the write lock, persisting only when `f`
    /// reports a change. Returns the current value either way.
    pub async fn update_if<F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut state = self.state.write().await;
        let current = state.as_mut().ok_or(PersistenceError::NotInitialized)?;
        if f(current) {
            self.write_to_disk(current).await?;
        }
        Ok(current.clone())
    }

    /// Replace the value and persist it
    pub async fn set(&self, value: T) -> Result<()> {
        let mut state = self.state.write().await;
        self.write_to_disk(&value).await?;
        *state = Some(value);
        Ok(())
    }

    /// Reset to the default value and remove the file
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        *state = Some(T::default());

        match fs::remove_file(&self.config.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_from_disk(&self) -> Result<T> {
        let contents = fs::read_to_string(&self.config.path).await?;
        let envelope: Envelope<T> = serde_json::from_str(&contents)?;
        envelope.verify()?;

        if envelope.version != self.config.version {
            return Err(PersistenceError::VersionMismatch {
                expected: self.config.version,
                found: envelope.version,
            });
        }

        Ok(envelope.data)
    }

    async fn write_to_disk(&self, data: &T) -> Result<()> {
        let envelope = Envelope::seal(self.config.version, data)?;
        let json = serde_json::to_string_pretty(&envelope)?;

        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if self.config.atomic_writes {
            let temp_path = self.config.path.with_extension("tmp");
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(json.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &self.config.path).await?;
        } else {
            fs::write(&self.config.path, json).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
    struct Counter {
        value: i32,
        label: String,
    }

    fn config_in(dir: &TempDir, name: &str) -> PersistenceConfig {
        PersistenceConfig::new(dir.path().join(name))
    }

    #[tokio::test]
    async fn test_init_missing_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let state: PersistedState<Counter> = PersistedState::new(config_in(&dir, "init.json"));

        assert!(!state.is_initialized().await);
        state.init().await.unwrap();

        assert!(state.is_initialized().await);
        assert_eq!(state.get().await.unwrap(), Counter::default());
    }

    #[tokio::test]
    async fn test_get_before_init_fails() {
        let dir = TempDir::new().unwrap();
        let state: PersistedState<Counter> = PersistedState::new(config_in(&dir, "none.json"));

        assert!(matches!(state.get().await, Err(PersistenceError::NotInitialized)));
        assert!(matches!(
            state.update(|c| c.value = 1).await,
            Err(PersistenceError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_update_survives_reload() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "reload.json");

        {
            let state: PersistedState<Counter> = PersistedState::new(config.clone());
            state.init().await.unwrap();
            let updated = state
                .update(|c| {
                    c.value = 99;
                    c.label = "persisted".to_string();
                })
                .await
                .unwrap();
            assert_eq!(updated.value, 99);
        }

        let state: PersistedState<Counter> = PersistedState::new(config);
        state.init().await.unwrap();
        let current = state.get().await.unwrap();
        assert_eq!(current.value, 99);
        assert_eq!(current.label, "persisted");
    }

    #[tokio::test]
    async fn test_update_if_skips_write_when_unchanged() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "update_if.json");

        let state: PersistedState<Counter> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        let value = state.update_if(|_| false).await.unwrap();
        assert_eq!(value, Counter::default());
        assert!(!config.path.exists());

        let value = state
            .update_if(|c| {
                c.value = 7;
                true
            })
            .await
            .unwrap();
        assert_eq!(value.value, 7);

        let reloaded: PersistedState<Counter> = PersistedState::new(config);
        reloaded.init().await.unwrap();
        assert_eq!(reloaded.get().await.unwrap().value, 7);
    }

    #[tokio::test]
    async fn test_corruption_detected() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "corrupt.json");

        let state: PersistedState<Counter> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state.update(|c| c.value = 42).await.unwrap();

        let contents = fs::read_to_string(&config.path).await.unwrap();
        fs::write(&config.path, contents.replace("42", "43")).await.unwrap();

        let reloaded: PersistedState<Counter> = PersistedState::new(config);
        assert!(matches!(reloaded.init().await, Err(PersistenceError::Corruption(_))));
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "version.json");

        let v1: PersistedState<Counter> = PersistedState::new(config.clone());
        v1.init().await.unwrap();
        v1.set(Counter { value: 1, label: String::new() }).await.unwrap();

        let v2: PersistedState<Counter> = PersistedState::new(config.version(2));
        assert!(matches!(
            v2.init().await,
            Err(PersistenceError::VersionMismatch { expected: 2, found: 1 })
        ));
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "atomic.json").atomic_writes(true);

        let state: PersistedState<Counter> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state.update(|c| c.value = 123).await.unwrap();

        assert!(config.path.exists());
        assert!(!config.path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "clear.json");

        let state: PersistedState<Counter> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state.update(|c| c.value = 5).await.unwrap();
        state.clear().await.unwrap();

        assert!(!config.path.exists());
        assert_eq!(state.get().await.unwrap(), Counter::default());
        // clearing twice is fine
        state.clear().await.unwrap();
    }
}
