//! Lesson map layout
//!
//! Pure functions from the lesson list and completion set to node positions,
//! content bounds, pan bounds and node centers. Nothing here holds state; the
//! screen recomputes (and memoizes) these on every completion change.
//!
//! Placement is a serpentine walk over a fixed-width grid: even rows run
//! left to right, odd rows right to left, so consecutive lessons are always
//! neighbours on screen.

use app_core::LessonSummary;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::config::MapConfig;
use crate::geometry::{Point, Viewport};
use crate::tokens::LESSON_ICONS;

/// Lock state of a lesson on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    /// Previous lesson not completed yet
    Locked,
    /// Ready to start
    Available,
    /// Done
    Completed,
}

impl LessonStatus {
    /// Label shown under the node title
    pub fn label(&self) -> &'static str {
        match self {
            LessonStatus::Locked => "Locked",
            LessonStatus::Available => "Available",
            LessonStatus::Completed => "Completed",
        }
    }

    /// Lowercase name used in accessibility labels
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Locked => "locked",
            LessonStatus::Available => "available",
            LessonStatus::Completed => "completed",
        }
    }
}

/// A lesson placed on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonNode {
    /// Lesson id
    pub id: String,
    /// Lesson title
    pub title: String,
    /// Derived lock state
    pub status: LessonStatus,
    /// Top-left corner in map coordinates (before the content offset)
    pub position: Point,
    /// Node emoji
    pub icon: &'static str,
    /// Successor lesson ids
    pub next_ids: Vec<String>,
}

/// Size of the content layer and the shift that makes all node
/// coordinates non-negative
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentBounds {
    /// Content layer width
    pub content_width: f64,
    /// Content layer height
    pub content_height: f64,
    /// Added to every node x
    pub offset_x: f64,
    /// Added to every node y
    pub offset_y: f64,
}

/// Allowed range for the camera translation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanBounds {
    /// Smallest allowed x translation
    pub min_x: f64,
    /// Largest allowed x translation
    pub max_x: f64,
    /// Smallest allowed y translation
    pub min_y: f64,
    /// Largest allowed y translation
    pub max_y: f64,
}

impl PanBounds {
    /// Clamp a translation into the bounds
    pub fn clamp(&self, translation: Point) -> Point {
        Point::new(
            clamp(translation.x, self.min_x, self.max_x),
            clamp(translation.y, self.min_y, self.max_y),
        )
    }

    /// Whether a translation already lies inside the bounds
    pub fn contains(&self, translation: Point) -> bool {
        translation.x >= self.min_x
            && translation.x <= self.max_x
            && translation.y >= self.min_y
            && translation.y <= self.max_y
    }
}

/// Clamp that maps NaN to `min`. Bounds can be briefly inconsistent during a
/// resize, so this never panics on `min > max` either.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Grid cell for the lesson at `index`: `(row, column)` after the zig-zag
pub fn zigzag_cell(index: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    let row = index / columns;
    let col = index % columns;
    let zigzag_col = if row % 2 == 0 { col } else { columns - 1 - col };
    (row, zigzag_col)
}

/// Map position of the lesson at `index`. Depends on the index only.
pub fn node_position(index: usize, config: &MapConfig) -> Point {
    let (row, col) = zigzag_cell(index, config.columns);
    let stagger = if col % 2 == 1 { config.odd_column_stagger } else { 0.0 };
    Point::new(
        config.origin_x + col as f64 * config.column_spacing,
        config.origin_y + row as f64 * config.row_spacing + stagger,
    )
}

/// Place every lesson and derive its status from the completion set.
pub fn build_nodes(
    lessons: &[LessonSummary],
    completed: &HashSet<String>,
    config: &MapConfig,
) -> Vec<LessonNode> {
    lessons
        .iter()
        .enumerate()
        .map(|(index, lesson)| {
            let status = if completed.contains(&lesson.id) {
                LessonStatus::Completed
            } else if index == 0 || completed.contains(&lessons[index - 1].id) {
                LessonStatus::Available
            } else {
                LessonStatus::Locked
            };

            LessonNode {
                id: lesson.id.clone(),
                title: lesson.title.clone(),
                status,
                position: node_position(index, config),
                icon: LESSON_ICONS[index % LESSON_ICONS.len()],
                next_ids: lessons
                    .get(index + 1)
                    .map(|next| vec![next.id.clone()])
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Bounding box of all nodes plus padding
pub fn compute_content_bounds(nodes: &[LessonNode], config: &MapConfig) -> ContentBounds {
    if nodes.is_empty() {
        return ContentBounds::default();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for node in nodes {
        min_x = min_x.min(node.position.x);
        max_x = max_x.max(node.position.x);
        min_y = min_y.min(node.position.y);
        max_y = max_y.max(node.position.y);
    }

    ContentBounds {
        content_width: max_x - min_x + config.node_width + config.content_padding * 2.0,
        content_height: max_y - min_y + config.node_height + config.content_padding * 2.0,
        offset_x: config.content_padding - min_x,
        offset_y: config.content_padding - min_y,
    }
}

/// Translation range for content of the given size inside the viewport.
///
/// An axis where the content fits is pinned to the centered offset. An axis
/// where it does not may be panned until the far edge sits `edge_padding`
/// inside the viewport. A zero-area viewport yields all-zero bounds.
pub fn compute_bounds(
    content_width: f64,
    content_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    edge_padding: f64,
) -> PanBounds {
    if Viewport::new(viewport_width, viewport_height).is_empty() {
        return PanBounds::default();
    }

    let (min_x, max_x) = axis_bounds(content_width, viewport_width, edge_padding);
    let (min_y, max_y) = axis_bounds(content_height, viewport_height, edge_padding);
    PanBounds { min_x, max_x, min_y, max_y }
}

fn axis_bounds(content: f64, viewport: f64, edge_padding: f64) -> (f64, f64) {
    if content <= viewport {
        let centered = (viewport - content) / 2.0;
        (centered, centered)
    } else {
        (viewport - content - edge_padding, edge_padding)
    }
}

/// Visual center of every node in content-layer coordinates
pub fn compute_node_centers(
    nodes: &[LessonNode],
    offset_x: f64,
    offset_y: f64,
    config: &MapConfig,
) -> HashMap<String, Point> {
    nodes
        .iter()
        .map(|node| {
            let center = Point::new(
                node.position.x + offset_x + config.node_width / 2.0,
                node.position.y + offset_y + config.node_height / 2.0,
            );
            (node.id.clone(), center)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lessons(n: usize) -> Vec<LessonSummary> {
        (1..=n)
            .map(|i| LessonSummary::new(format!("lesson-{i}"), format!("Lesson {i}")))
            .collect()
    }

    fn completed(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn rank(status: LessonStatus) -> u8 {
        match status {
            LessonStatus::Locked => 0,
            LessonStatus::Available => 1,
            LessonStatus::Completed => 2,
        }
    }

    fn statuses(nodes: &[LessonNode]) -> Vec<LessonStatus> {
        nodes.iter().map(|n| n.status).collect()
    }

    #[test]
    fn test_zigzag_cells() {
        let cells: Vec<_> = (0..10).map(|i| zigzag_cell(i, 4)).collect();
        assert_eq!(
            cells,
            vec![
                (0, 0), (0, 1), (0, 2), (0, 3),
                (1, 3), (1, 2), (1, 1), (1, 0),
                (2, 0), (2, 1),
            ]
        );
    }

    #[test]
    fn test_node_positions() {
        let config = MapConfig::default();
        assert_eq!(node_position(0, &config), Point::new(120.0, 140.0));
        assert_eq!(node_position(1, &config), Point::new(375.0, 166.0));
        assert_eq!(node_position(3, &config), Point::new(885.0, 166.0));
        // second row turns around under the last column
        assert_eq!(node_position(4, &config), Point::new(885.0, 331.0));
        assert_eq!(node_position(7, &config), Point::new(120.0, 305.0));
    }

    #[test]
    fn test_statuses_follow_completion() {
        let config = MapConfig::default();
        let list = lessons(3);

        let nodes = build_nodes(&list, &completed(&["lesson-1"]), &config);
        assert_eq!(
            statuses(&nodes),
            vec![LessonStatus::Completed, LessonStatus::Available, LessonStatus::Locked]
        );

        let nodes = build_nodes(&list, &completed(&["lesson-1", "lesson-2"]), &config);
        assert_eq!(
            statuses(&nodes),
            vec![LessonStatus::Completed, LessonStatus::Completed, LessonStatus::Available]
        );

        let nodes = build_nodes(&list, &HashSet::new(), &config);
        assert_eq!(
            statuses(&nodes),
            vec![LessonStatus::Available, LessonStatus::Locked, LessonStatus::Locked]
        );
    }

    #[test]
    fn test_next_ids_chain() {
        let nodes = build_nodes(&lessons(3), &HashSet::new(), &MapConfig::default());
        assert_eq!(nodes[0].next_ids, vec!["lesson-2"]);
        assert_eq!(nodes[1].next_ids, vec!["lesson-3"]);
        assert!(nodes[2].next_ids.is_empty());
    }

    #[test]
    fn test_icons_cycle() {
        let nodes = build_nodes(&lessons(12), &HashSet::new(), &MapConfig::default());
        assert_eq!(nodes[0].icon, LESSON_ICONS[0]);
        assert_eq!(nodes[10].icon, LESSON_ICONS[0]);
        assert_eq!(nodes[11].icon, LESSON_ICONS[1]);
    }

    #[test]
    fn test_build_nodes_deterministic() {
        let config = MapConfig::default();
        let list = lessons(9);
        let done = completed(&["lesson-1", "lesson-2"]);
        assert_eq!(build_nodes(&list, &done, &config), build_nodes(&list, &done, &config));
    }

    #[test]
    fn test_content_bounds() {
        let config = MapConfig::default();
        let nodes = build_nodes(&lessons(6), &HashSet::new(), &config);
        let bounds = compute_content_bounds(&nodes, &config);

        // x spans columns 0..=3, y spans rows 0..=1 including the stagger
        assert_eq!(bounds.content_width, 765.0 + 210.0 + 280.0);
        assert_eq!(bounds.content_height, 191.0 + 76.0 + 280.0);
        assert_eq!(bounds.offset_x, 20.0);
        assert_eq!(bounds.offset_y, 0.0);
    }

    #[test]
    fn test_content_bounds_empty() {
        assert_eq!(compute_content_bounds(&[], &MapConfig::default()), ContentBounds::default());
    }

    #[test]
    fn test_bounds_zero_viewport() {
        assert_eq!(compute_bounds(1000.0, 800.0, 0.0, 600.0, 40.0), PanBounds::default());
        assert_eq!(compute_bounds(1000.0, 800.0, 400.0, 0.0, 40.0), PanBounds::default());
    }

    #[test]
    fn test_bounds_content_fits_is_centered() {
        let bounds = compute_bounds(200.0, 100.0, 400.0, 300.0, 40.0);
        assert_eq!(bounds, PanBounds { min_x: 100.0, max_x: 100.0, min_y: 100.0, max_y: 100.0 });
    }

    #[test]
    fn test_bounds_content_larger_pans_with_padding() {
        let bounds = compute_bounds(1000.0, 800.0, 400.0, 300.0, 40.0);
        assert_eq!(bounds, PanBounds { min_x: -640.0, max_x: 40.0, min_y: -540.0, max_y: 40.0 });
    }

    #[test]
    fn test_bounds_mixed_axes() {
        let bounds = compute_bounds(1000.0, 100.0, 400.0, 300.0, 40.0);
        assert_eq!((bounds.min_x, bounds.max_x), (-640.0, 40.0));
        assert_eq!((bounds.min_y, bounds.max_y), (100.0, 100.0));
    }

    #[test]
    fn test_node_centers() {
        let config = MapConfig::default();
        let nodes = build_nodes(&lessons(2), &HashSet::new(), &config);
        let centers = compute_node_centers(&nodes, 20.0, 0.0, &config);
        assert_eq!(centers["lesson-1"], Point::new(120.0 + 20.0 + 105.0, 140.0 + 38.0));
        assert_eq!(centers["lesson-2"], Point::new(375.0 + 20.0 + 105.0, 166.0 + 38.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(50.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f64::NAN, -3.0, 10.0), -3.0);
        // inconsistent bounds resolve to max instead of panicking
        assert_eq!(clamp(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_pan_bounds_clamp_point() {
        let bounds = PanBounds { min_x: -100.0, max_x: 40.0, min_y: -50.0, max_y: 40.0 };
        assert_eq!(bounds.clamp(Point::new(100.0, -100.0)), Point::new(40.0, -50.0));
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(!bounds.contains(Point::new(41.0, 0.0)));
    }

    proptest! {
        #[test]
        fn bounds_are_ordered(
            cw in 0.0f64..5000.0,
            ch in 0.0f64..5000.0,
            vw in 0.0f64..3000.0,
            vh in 0.0f64..3000.0,
            pad in 0.0f64..200.0,
        ) {
            let b = compute_bounds(cw, ch, vw, vh, pad);
            prop_assert!(b.min_x <= b.max_x);
            prop_assert!(b.min_y <= b.max_y);
        }

        #[test]
        fn clamp_is_idempotent(v in proptest::num::f64::ANY, lo in -1e6f64..1e6, span in 0.0f64..1e6) {
            let hi = lo + span;
            let once = clamp(v, lo, hi);
            prop_assert_eq!(clamp(once, lo, hi), once);
            prop_assert!(once >= lo && once <= hi);
        }

        #[test]
        fn locked_is_sequential(n in 1usize..24, mask in any::<u32>()) {
            let list = lessons(n);
            let done: HashSet<String> = (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| list[i].id.clone())
                .collect();
            let nodes = build_nodes(&list, &done, &MapConfig::default());

            for pair in nodes.windows(2) {
                if pair[0].status == LessonStatus::Locked {
                    prop_assert_ne!(pair[1].status, LessonStatus::Available);
                }
            }
        }

        #[test]
        fn completing_a_lesson_only_raises_it_and_its_successor(
            (n, prefix, k) in (1usize..24).prop_flat_map(|n| (Just(n), 0..=n, 0..n)),
        ) {
            let list = lessons(n);
            let config = MapConfig::default();
            let before_done: HashSet<String> = list[..prefix].iter().map(|l| l.id.clone()).collect();
            let mut after_done = before_done.clone();
            after_done.insert(list[k].id.clone());

            let before = statuses(&build_nodes(&list, &before_done, &config));
            let after = statuses(&build_nodes(&list, &after_done, &config));

            for i in 0..n {
                if i == k || i == k + 1 {
                    prop_assert!(rank(after[i]) >= rank(before[i]));
                } else {
                    prop_assert_eq!(after[i], before[i]);
                }
            }
            prop_assert_eq!(after[k], LessonStatus::Completed);
            if k == prefix && k + 1 < n {
                prop_assert_eq!(before[k + 1], LessonStatus::Locked);
                prop_assert_eq!(after[k + 1], LessonStatus::Available);
            }
        }

        #[test]
        fn locked_is_followed_by_locked_when_completed_in_order(n in 1usize..24, prefix in 0usize..24) {
            let list = lessons(n);
            let prefix = prefix.min(n);
            let done: HashSet<String> = list[..prefix].iter().map(|l| l.id.clone()).collect();
            let nodes = statuses(&build_nodes(&list, &done, &MapConfig::default()));

            for pair in nodes.windows(2) {
                if pair[0] == LessonStatus::Locked {
                    prop_assert_eq!(pair[1], LessonStatus::Locked);
                }
            }
            if prefix < n {
                prop_assert_eq!(nodes[prefix], LessonStatus::Available);
            }
        }

        #[test]
        fn consecutive_nodes_are_neighbours(n in 2usize..40) {
            let config = MapConfig::default();
            for i in 0..n - 1 {
                let (r0, c0) = zigzag_cell(i, config.columns);
                let (r1, c1) = zigzag_cell(i + 1, config.columns);
                let dr = r1 - r0;
                let dc = c0.abs_diff(c1);
                prop_assert!((dr == 0 && dc == 1) || (dr == 1 && dc == 0));
            }
        }
    }
}
