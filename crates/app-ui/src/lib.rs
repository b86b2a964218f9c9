//! User interface for Babble
//!
//! This crate provides the UI layer: navigation, design tokens, animation
//! primitives and the lesson map screen.
//!
//! # Modules
//!
//! - [`tokens`] - Design tokens (map sizing, grid, durations, colors)
//! - [`geometry`] - Points and viewports
//! - [`animation`] - Easing curves and tweens
//! - [`navigation`] - Routes, router, stack and the lesson navigator
//! - [`lesson_map`] - The lesson map and its screen controller
//!
//! # Example
//!
//! ```rust
//! use app_ui::lesson_map::{compute_bounds, render_markers};
//!
//! // Content wider than the viewport can be panned, taller content fits
//! let bounds = compute_bounds(1000.0, 300.0, 400.0, 600.0, 40.0);
//! assert_eq!((bounds.min_x, bounds.max_x), (-640.0, 40.0));
//! assert_eq!(bounds.min_y, bounds.max_y);
//!
//! // 200px apart gives five footprints
//! assert_eq!(render_markers(0.0, 0.0, 200.0, 0.0).count(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animation;
pub mod geometry;
pub mod lesson_map;
pub mod navigation;
pub mod tokens;

// Re-export commonly used types
pub use animation::{ease_out, ease_out_cubic, linear, EasingFn, Tween};
pub use geometry::{Point, Viewport};

pub use lesson_map::{
    CameraController, FocusOutcome, LessonNode, LessonStatus, LessonsMapScreen, LockedNotice,
    MapConfig, MapConfigError, MapFrame, MapView, PanBounds, PanGesture, PressOutcome,
};

pub use navigation::{
    CallbackNavigator, LessonNavigator, NavigationStack, Route, RouteParams, Router, StackEntry,
    StackNavigator,
};
