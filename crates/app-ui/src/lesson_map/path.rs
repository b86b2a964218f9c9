//! Path connectors between lessons
//!
//! Every node with a successor gets one segment. A segment is drawn as a
//! dashed line plus a row of footprint markers, both styled by the segment
//! status:
//!
//! - into a locked lesson: `Locked`, whatever the source state
//! - out of a completed lesson: `Completed`
//! - otherwise: `Available`

use serde::Serialize;
use std::collections::HashMap;

use super::layout::{LessonNode, LessonStatus};
use crate::geometry::Point;
use crate::tokens::{markers, path_colors};

/// Connector between two consecutive lessons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSegment {
    /// Source lesson id
    pub from: String,
    /// Destination lesson id
    pub to: String,
    /// Visual tier
    pub status: LessonStatus,
}

/// Derive segments for every `node -> next_id` edge.
///
/// Works for any successor list, not just a single chain. Edges pointing at
/// ids with no node are treated as locked.
pub fn build_segments(nodes: &[LessonNode]) -> Vec<PathSegment> {
    let status_by_id: HashMap<&str, LessonStatus> =
        nodes.iter().map(|n| (n.id.as_str(), n.status)).collect();

    nodes
        .iter()
        .flat_map(|node| {
            let status_by_id = &status_by_id;
            node.next_ids.iter().map(move |next_id| {
                let next_status = status_by_id
                    .get(next_id.as_str())
                    .copied()
                    .unwrap_or(LessonStatus::Locked);
                let status = match (node.status, next_status) {
                    (_, LessonStatus::Locked) => LessonStatus::Locked,
                    (LessonStatus::Completed, _) => LessonStatus::Completed,
                    _ => LessonStatus::Available,
                };
                PathSegment {
                    from: node.id.clone(),
                    to: next_id.clone(),
                    status,
                }
            })
        })
        .collect()
}

/// Stroke and opacity for a segment tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentStyle {
    /// Line and marker color
    pub stroke: &'static str,
    /// Line opacity
    pub opacity: f64,
    /// Marker opacity
    pub marker_opacity: f64,
}

impl SegmentStyle {
    /// Style for a segment status
    pub fn for_status(status: LessonStatus) -> Self {
        match status {
            LessonStatus::Completed => Self {
                stroke: path_colors::COMPLETED,
                opacity: 1.0,
                marker_opacity: 0.7,
            },
            LessonStatus::Available => Self {
                stroke: path_colors::AVAILABLE,
                opacity: 0.9,
                marker_opacity: 0.55,
            },
            LessonStatus::Locked => Self {
                stroke: path_colors::LOCKED,
                opacity: 0.5,
                marker_opacity: 0.35,
            },
        }
    }
}

/// One footprint along a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Circle radius
    pub radius: f64,
}

/// Evenly spaced markers between two points, excluding the endpoints.
///
/// Finite and restartable: clone it to walk the same markers again.
#[derive(Debug, Clone)]
pub struct Markers {
    start: Point,
    end: Point,
    count: usize,
    next: usize,
}

impl Markers {
    /// Markers between `start` and `end`, one per `step` px with a floor of
    /// three
    pub fn between(start: Point, end: Point, step: f64) -> Self {
        let distance = start.distance(end);
        let per_step = if step > 0.0 && distance.is_finite() {
            (distance / step).floor() as usize
        } else {
            0
        };
        Self {
            start,
            end,
            count: per_step.max(markers::MIN_COUNT),
            next: 0,
        }
    }

    /// Total number of markers, including ones already yielded
    pub fn total(&self) -> usize {
        self.count
    }
}

impl Iterator for Markers {
    type Item = Marker;

    fn next(&mut self) -> Option<Marker> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let t = (index + 1) as f64 / (self.count + 1) as f64;
        let at = self.start.lerp(self.end, t);
        let radius = if index % 2 == 0 {
            markers::RADIUS_LARGE
        } else {
            markers::RADIUS_SMALL
        };
        Some(Marker { x: at.x, y: at.y, radius })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Markers {}

/// Markers between two coordinates using the default step
pub fn render_markers(x1: f64, y1: f64, x2: f64, y2: f64) -> Markers {
    Markers::between(Point::new(x1, y1), Point::new(x2, y2), markers::STEP)
}

/// A segment resolved to screen geometry, ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathView {
    /// The logical segment
    pub segment: PathSegment,
    /// Start point (source node center)
    pub start: Point,
    /// End point (destination node center)
    pub end: Point,
    /// Colors
    pub style: SegmentStyle,
    /// Footprints
    pub markers: Vec<Marker>,
}

/// Resolve segments against node centers. Segments with a missing endpoint
/// are skipped.
pub fn layout_paths(
    segments: &[PathSegment],
    centers: &HashMap<String, Point>,
    marker_step: f64,
) -> Vec<PathView> {
    segments
        .iter()
        .filter_map(|segment| {
            let start = *centers.get(&segment.from)?;
            let end = *centers.get(&segment.to)?;
            Some(PathView {
                segment: segment.clone(),
                start,
                end,
                style: SegmentStyle::for_status(segment.status),
                markers: Markers::between(start, end, marker_step).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, status: LessonStatus, next: &[&str]) -> LessonNode {
        LessonNode {
            id: id.to_string(),
            title: id.to_uppercase(),
            status,
            position: Point::ZERO,
            icon: "⭐️",
            next_ids: next.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_segment_tiers() {
        let nodes = vec![
            node("a", LessonStatus::Completed, &["b"]),
            node("b", LessonStatus::Completed, &["c"]),
            node("c", LessonStatus::Locked, &[]),
        ];
        let segments = build_segments(&nodes);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].status, LessonStatus::Completed);
        assert_eq!(segments[1].status, LessonStatus::Locked);
    }

    #[test]
    fn test_segment_from_available() {
        let nodes = vec![
            node("a", LessonStatus::Completed, &["b"]),
            node("b", LessonStatus::Available, &["c"]),
            node("c", LessonStatus::Locked, &[]),
        ];
        let segments = build_segments(&nodes);
        assert_eq!(segments[0].status, LessonStatus::Completed);
        assert_eq!(segments[1].status, LessonStatus::Locked);

        // available source into a completed lesson
        let nodes = vec![
            node("a", LessonStatus::Available, &["b"]),
            node("b", LessonStatus::Completed, &[]),
        ];
        assert_eq!(build_segments(&nodes)[0].status, LessonStatus::Available);
    }

    #[test]
    fn test_segments_branching() {
        let nodes = vec![
            node("a", LessonStatus::Completed, &["b", "c"]),
            node("b", LessonStatus::Available, &[]),
            node("c", LessonStatus::Locked, &[]),
        ];
        let segments = build_segments(&nodes);
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].to.as_str(), segments[0].status), ("b", LessonStatus::Completed));
        assert_eq!((segments[1].to.as_str(), segments[1].status), ("c", LessonStatus::Locked));
    }

    #[test]
    fn test_dangling_edge_is_locked() {
        let nodes = vec![node("a", LessonStatus::Completed, &["ghost"])];
        assert_eq!(build_segments(&nodes)[0].status, LessonStatus::Locked);
    }

    #[test]
    fn test_marker_count() {
        assert_eq!(render_markers(0.0, 0.0, 200.0, 0.0).total(), 5);
        assert_eq!(render_markers(0.0, 0.0, 10.0, 0.0).total(), 3);
        assert_eq!(render_markers(0.0, 0.0, 0.0, 0.0).total(), 3);
        assert_eq!(render_markers(0.0, 0.0, 120.0, 160.0).total(), 5);
    }

    #[test]
    fn test_marker_positions_and_radii() {
        let markers: Vec<Marker> = render_markers(0.0, 0.0, 200.0, 0.0).collect();
        assert_eq!(markers.len(), 5);
        let xs: Vec<f64> = markers.iter().map(|m| m.x).collect();
        let step = 200.0 / 6.0;
        for (i, x) in xs.iter().enumerate() {
            assert!((x - step * (i + 1) as f64).abs() < 1e-9);
        }
        assert!(markers.iter().all(|m| m.y == 0.0));
        assert_eq!(markers[0].radius, 4.5);
        assert_eq!(markers[1].radius, 3.6);
        assert_eq!(markers[2].radius, 4.5);
    }

    #[test]
    fn test_markers_restartable() {
        let markers = render_markers(10.0, 20.0, 300.0, 400.0);
        let first: Vec<Marker> = markers.clone().collect();
        let second: Vec<Marker> = markers.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_markers_exact_size() {
        let mut markers = render_markers(0.0, 0.0, 200.0, 0.0);
        assert_eq!(markers.len(), 5);
        markers.next();
        assert_eq!(markers.len(), 4);
    }

    #[test]
    fn test_non_positive_step_uses_floor() {
        let markers = Markers::between(Point::ZERO, Point::new(500.0, 0.0), 0.0);
        assert_eq!(markers.total(), 3);
    }

    #[test]
    fn test_styles() {
        assert_eq!(SegmentStyle::for_status(LessonStatus::Completed).stroke, "#f7b4a8");
        assert_eq!(SegmentStyle::for_status(LessonStatus::Available).opacity, 0.9);
        assert_eq!(SegmentStyle::for_status(LessonStatus::Locked).marker_opacity, 0.35);
    }

    #[test]
    fn test_layout_paths_skips_missing_centers() {
        let segments = vec![
            PathSegment { from: "a".into(), to: "b".into(), status: LessonStatus::Available },
            PathSegment { from: "b".into(), to: "c".into(), status: LessonStatus::Locked },
        ];
        let centers: HashMap<String, Point> = [
            ("a".to_string(), Point::new(0.0, 0.0)),
            ("b".to_string(), Point::new(200.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let paths = layout_paths(&segments, &centers, 38.0);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].end, Point::new(200.0, 0.0));
        assert_eq!(paths[0].markers.len(), 5);
        assert_eq!(paths[0].style.stroke, "#9ad5d6");
    }
}
