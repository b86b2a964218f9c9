//! Lesson map configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::tokens::{duration, gesture, grid, map_sizing, markers};

/// Invalid map configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapConfigError {
    /// The grid needs at least one column
    #[error("column count must be at least 1")]
    NoColumns,

    /// Neighbouring nodes would overlap
    #[error("{axis} spacing {spacing} does not clear node size {node}")]
    SpacingTooSmall {
        /// "column" or "row"
        axis: &'static str,
        /// Configured spacing
        spacing: f64,
        /// Node extent on that axis
        node: f64,
    },

    /// Sizes must be finite and non-negative
    #[error("{0} must be a finite, non-negative number")]
    InvalidValue(&'static str),
}

/// Tunables for layout, gestures and camera motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Node width
    pub node_width: f64,
    /// Node height
    pub node_height: f64,
    /// Padding around the node bounding box
    pub content_padding: f64,
    /// How far content may pass a viewport edge when fully panned
    pub edge_padding: f64,
    /// Extra touch area around nodes
    pub hit_slop: f64,
    /// Columns per zig-zag row
    pub columns: usize,
    /// X of the first column
    pub origin_x: f64,
    /// Y of the first row
    pub origin_y: f64,
    /// Distance between columns
    pub column_spacing: f64,
    /// Distance between rows
    pub row_spacing: f64,
    /// Downward nudge for odd columns
    pub odd_column_stagger: f64,
    /// Movement before a touch becomes a pan
    pub drag_threshold: f64,
    /// Camera focus animation length in ms
    pub focus_duration_ms: u64,
    /// Distance covered by one footprint marker
    pub marker_step: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            node_width: map_sizing::NODE_WIDTH,
            node_height: map_sizing::NODE_HEIGHT,
            content_padding: map_sizing::CONTENT_PADDING,
            edge_padding: map_sizing::EDGE_PADDING,
            hit_slop: map_sizing::HIT_SLOP,
            columns: grid::COLUMNS,
            origin_x: grid::ORIGIN_X,
            origin_y: grid::ORIGIN_Y,
            column_spacing: grid::COLUMN_SPACING,
            row_spacing: grid::ROW_SPACING,
            odd_column_stagger: grid::ODD_COLUMN_STAGGER,
            drag_threshold: gesture::DRAG_THRESHOLD,
            focus_duration_ms: duration::FOCUS,
            marker_step: markers::STEP,
        }
    }
}

impl MapConfig {
    /// Focus animation length
    pub fn focus_duration(&self) -> Duration {
        Duration::from_millis(self.focus_duration_ms)
    }

    /// Check that nodes cannot overlap and all sizes are usable
    pub fn validate(&self) -> Result<(), MapConfigError> {
        let sizes = [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
            ("contentPadding", self.content_padding),
            ("edgePadding", self.edge_padding),
            ("hitSlop", self.hit_slop),
            ("oddColumnStagger", self.odd_column_stagger),
            ("dragThreshold", self.drag_threshold),
            ("markerStep", self.marker_step),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(MapConfigError::InvalidValue(name));
            }
        }

        if self.columns == 0 {
            return Err(MapConfigError::NoColumns);
        }
        if self.columns > 1 && self.column_spacing < self.node_width {
            return Err(MapConfigError::SpacingTooSmall {
                axis: "column",
                spacing: self.column_spacing,
                node: self.node_width,
            });
        }
        let row_extent = self.node_height + self.odd_column_stagger;
        if self.row_spacing < row_extent {
            return Err(MapConfigError::SpacingTooSmall {
                axis: "row",
                spacing: self.row_spacing,
                node: row_extent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MapConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.focus_duration(), Duration::from_millis(420));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MapConfig = serde_json::from_str(r#"{"columns": 3, "dragThreshold": 10}"#).unwrap();
        assert_eq!(config.columns, 3);
        assert_eq!(config.drag_threshold, 10.0);
        assert_eq!(config.node_width, 210.0);
    }

    #[test]
    fn test_rejects_overlapping_columns() {
        let config = MapConfig { column_spacing: 100.0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(MapConfigError::SpacingTooSmall { axis: "column", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_columns() {
        let config = MapConfig { columns: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(MapConfigError::NoColumns));
    }

    #[test]
    fn test_rejects_nan() {
        let config = MapConfig { edge_padding: f64::NAN, ..Default::default() };
        assert_eq!(config.validate(), Err(MapConfigError::InvalidValue("edgePadding")));
    }
}
