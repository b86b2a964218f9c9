//! Storage layer for Babble
//!
//! This crate provides versioned file persistence and the lesson
//! progress store built on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod persistence;
pub mod progress;

pub use persistence::{PersistedState, PersistenceConfig, PersistenceError};
pub use progress::{
    MemoryProgressBackend, ProgressBackend, ProgressError, ProgressSnapshot, ProgressStore,
    PROGRESS_STORAGE_KEY,
};
