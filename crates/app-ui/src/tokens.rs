//! Design tokens for Babble
//!
//! Fixed sizes, timings and colors used by the lesson map. [`MapConfig`]
//! defaults are built from these values.
//!
//! [`MapConfig`]: crate::lesson_map::MapConfig

// =============================================================================
// Map Sizing Tokens
// =============================================================================

/// Node and content sizing on the lesson map
pub mod map_sizing {
    /// Lesson node width
    pub const NODE_WIDTH: f64 = 210.0;
    /// Lesson node height
    pub const NODE_HEIGHT: f64 = 76.0;
    /// Padding around the node bounding box inside the content layer
    pub const CONTENT_PADDING: f64 = 140.0;
    /// How far content may be dragged past a viewport edge
    pub const EDGE_PADDING: f64 = 40.0;
    /// Extra touch area around a node
    pub const HIT_SLOP: f64 = 8.0;
}

// =============================================================================
// Grid Tokens
// =============================================================================

/// Zig-zag grid placement
pub mod grid {
    /// Columns per row before the path turns around
    pub const COLUMNS: usize = 4;
    /// X of the first column
    pub const ORIGIN_X: f64 = 120.0;
    /// Y of the first row
    pub const ORIGIN_Y: f64 = 140.0;
    /// Horizontal distance between columns
    pub const COLUMN_SPACING: f64 = 255.0;
    /// Vertical distance between rows
    pub const ROW_SPACING: f64 = 165.0;
    /// Downward nudge applied to odd columns
    pub const ODD_COLUMN_STAGGER: f64 = 26.0;
}

// =============================================================================
// Gesture Tokens
// =============================================================================

/// Gesture recognition
pub mod gesture {
    /// Movement in px before a touch becomes a pan
    pub const DRAG_THRESHOLD: f64 = 6.0;
}

// =============================================================================
// Duration Tokens
// =============================================================================

/// Animation durations in milliseconds
pub mod duration {
    /// Camera focus transition
    pub const FOCUS: u64 = 420;
}

// =============================================================================
// Path Tokens
// =============================================================================

/// Footprint markers along path segments
pub mod markers {
    /// Distance covered by one marker
    pub const STEP: f64 = 38.0;
    /// Minimum markers on any segment
    pub const MIN_COUNT: usize = 3;
    /// Radius of even markers
    pub const RADIUS_LARGE: f64 = 4.5;
    /// Radius of odd markers
    pub const RADIUS_SMALL: f64 = 3.6;
}

/// Path colors per segment status
pub mod path_colors {
    /// Stroke for completed segments
    pub const COMPLETED: &str = "#f7b4a8";
    /// Stroke for available segments
    pub const AVAILABLE: &str = "#9ad5d6";
    /// Stroke for locked segments
    pub const LOCKED: &str = "#e7d9d4";
}

/// Emoji shown on lesson nodes, picked by index
pub const LESSON_ICONS: [&str; 10] = [
    "👶", "🧠", "🌙", "🏠", "🤱", "🍼", "🧼", "📈", "🩺", "❤️",
];
