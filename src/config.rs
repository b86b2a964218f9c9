//! Application configuration
//!
//! Loaded from a JSON file; every key is optional.
//!
//! ```json
//! {
//!   "progressPath": "data/babble.progress.v1.json",
//!   "logFilter": "babble=debug,info",
//!   "map": { "dragThreshold": 8 }
//! }
//! ```

use app_ui::{MapConfig, MapConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storage::{PersistenceConfig, ProgressStore, PROGRESS_STORAGE_KEY};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for [`AppConfig`]
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Map settings are unusable
    #[error("Invalid map config: {0}")]
    Map(#[from] MapConfigError),
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Progress file location
    pub progress_path: PathBuf,
    /// Default log directive when `RUST_LOG` is unset
    pub log_filter: String,
    /// Lesson map tunables
    pub map: MapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            progress_path: PathBuf::from(format!("{PROGRESS_STORAGE_KEY}.json")),
            log_filter: "info".to_string(),
            map: MapConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate config JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.map.validate()?;
        Ok(config)
    }

    /// Set the progress file location
    pub fn progress_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.progress_path = path.into();
        self
    }

    /// Set the default log directive
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the map tunables
    pub fn map(mut self, map: MapConfig) -> Self {
        self.map = map;
        self
    }

    /// Progress store backed by the configured file
    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::new(PersistenceConfig::new(self.progress_path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.progress_path, PathBuf::from("babble.progress.v1.json"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.map, MapConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = AppConfig::from_json(r#"{"map": {"dragThreshold": 8}}"#).unwrap();
        assert_eq!(config.map.drag_threshold, 8.0);
        assert_eq!(config.map.columns, 4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_map_rejected() {
        let err = AppConfig::from_json(r#"{"map": {"columns": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Map(MapConfigError::NoColumns)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(AppConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("babble.json");
        std::fs::write(&path, r#"{"progressPath": "/tmp/p.json", "logFilter": "debug"}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.progress_path, PathBuf::from("/tmp/p.json"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .progress_path("x.json")
            .log_filter("warn")
            .map(MapConfig { columns: 3, ..Default::default() });
        assert_eq!(config.progress_path, PathBuf::from("x.json"));
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.map.columns, 3);
    }
}
