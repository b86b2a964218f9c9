//! Lesson map
//!
//! An interactive, pannable map that lays lessons out along a zig-zag path,
//! draws footprint connectors between them, and opens lessons on tap.
//!
//! - [`layout`] - node placement, statuses and bounds
//! - [`path`] - connectors and footprint markers
//! - [`camera`] - the content translation and focus transitions
//! - [`gesture`] - drag-to-pan recognition
//! - [`nodes`] - pressable node models and press routing
//! - [`screen`] - the screen controller tying them together

pub mod camera;
pub mod config;
pub mod gesture;
pub mod layout;
pub mod nodes;
pub mod path;
pub mod screen;

pub use camera::{CameraController, FocusOutcome};
pub use config::{MapConfig, MapConfigError};
pub use gesture::{GestureOutcome, GesturePhase, PanGesture};
pub use layout::{
    build_nodes, clamp, compute_bounds, compute_content_bounds, compute_node_centers,
    node_position, zigzag_cell, ContentBounds, LessonNode, LessonStatus, PanBounds,
};
pub use nodes::{hit_test, node_buttons, press_node, LockedNotice, NodeButton, PressOutcome};
pub use path::{
    build_segments, layout_paths, render_markers, Marker, Markers, PathSegment, PathView,
    SegmentStyle,
};
pub use screen::{LessonsMapScreen, MapFrame, MapView};
