//! Node interaction layer
//!
//! Turns placed lessons into pressable buttons and routes presses: locked
//! lessons produce a notice, everything else opens through the navigator.
//! Pressing never touches layout or camera state.

use serde::Serialize;

use super::config::MapConfig;
use super::layout::{LessonNode, LessonStatus};
use crate::geometry::Point;
use crate::navigation::LessonNavigator;

/// Message shown when a locked lesson is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockedNotice {
    /// Alert title
    pub title: &'static str,
    /// Alert body
    pub message: &'static str,
}

impl LockedNotice {
    /// The standard notice
    pub const DEFAULT: LockedNotice = LockedNotice {
        title: "Locked",
        message: "Complete the previous lesson to unlock!",
    };
}

impl Default for LockedNotice {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a node press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Navigation to the lesson was requested
    Opened(String),
    /// Lesson is locked; the notice was raised instead
    Rejected(LockedNotice),
}

/// Route a press on `node`. Locked nodes call `on_locked` and never
/// navigate.
pub fn press_node(
    node: &LessonNode,
    navigator: &dyn LessonNavigator,
    on_locked: &dyn Fn(&LockedNotice),
) -> PressOutcome {
    if node.status == LessonStatus::Locked {
        tracing::debug!(lesson = %node.id, "locked lesson pressed");
        let notice = LockedNotice::DEFAULT;
        on_locked(&notice);
        return PressOutcome::Rejected(notice);
    }

    navigator.open_lesson(&node.id);
    PressOutcome::Opened(node.id.clone())
}

/// Render model for one lesson button
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeButton {
    /// Lesson id
    pub id: String,
    /// Left edge in content-layer coordinates
    pub left: f64,
    /// Top edge in content-layer coordinates
    pub top: f64,
    /// Button width
    pub width: f64,
    /// Button height
    pub height: f64,
    /// Lesson title
    pub title: String,
    /// Status line under the title
    pub status_label: &'static str,
    /// Lock state
    pub status: LessonStatus,
    /// Emoji shown in the icon bubble
    pub icon: &'static str,
    /// Screen reader label
    pub accessibility_label: String,
    /// Reported as disabled to assistive tech
    pub disabled: bool,
}

impl NodeButton {
    /// Build the button for a node shifted by the content offset
    pub fn new(node: &LessonNode, offset: Point, config: &MapConfig) -> Self {
        Self {
            id: node.id.clone(),
            left: node.position.x + offset.x,
            top: node.position.y + offset.y,
            width: config.node_width,
            height: config.node_height,
            title: node.title.clone(),
            status_label: node.status.label(),
            status: node.status,
            icon: node.icon,
            accessibility_label: format!("Lesson: {}, {}", node.title, node.status.as_str()),
            disabled: node.status == LessonStatus::Locked,
        }
    }

    /// Whether `point` (content coordinates) hits this button, with
    /// `slop` extra px on every side
    pub fn contains(&self, point: Point, slop: f64) -> bool {
        point.x >= self.left - slop
            && point.x <= self.left + self.width + slop
            && point.y >= self.top - slop
            && point.y <= self.top + self.height + slop
    }
}

/// Buttons for every node
pub fn node_buttons(nodes: &[LessonNode], offset: Point, config: &MapConfig) -> Vec<NodeButton> {
    nodes
        .iter()
        .map(|node| NodeButton::new(node, offset, config))
        .collect()
}

/// Topmost button under `point`. Later buttons draw above earlier ones.
pub fn hit_test<'a>(buttons: &'a [NodeButton], point: Point, slop: f64) -> Option<&'a NodeButton> {
    buttons.iter().rev().find(|button| button.contains(point, slop))
}
