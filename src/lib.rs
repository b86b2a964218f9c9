//! Babble
//!
//! Newborn-care lessons laid out on an interactive map. This crate wires the
//! workspace together: application configuration, logging setup, and
//! re-exports of the pieces a host needs to show the lesson map.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError};

pub use app_core::{is_lesson_unlocked, lesson_modules, LessonCatalog, LessonSummary};
pub use app_platform::{FixedReduceMotion, ReduceMotion, ReduceMotionSignal};
pub use app_state::ProgressState;
pub use app_ui::{
    LessonNavigator, LessonsMapScreen, MapConfig, MapView, Route, StackNavigator, Viewport,
};
pub use storage::{ProgressBackend, ProgressSnapshot, ProgressStore};
