//! Lessons map screen
//!
//! Wires progress, layout, paths, camera, gesture and node presses into one
//! controller the host drives with lifecycle, layout, pointer and frame
//! events. Rendering produces a plain [`MapView`] model; drawing it is up to
//! the host.

use app_core::LessonCatalog;
use app_platform::{ListenerId, ReduceMotion, ReduceMotionSignal};
use app_state::{ProgressState, SubscriptionId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::camera::{CameraController, FocusOutcome};
use super::config::{MapConfig, MapConfigError};
use super::gesture::{GestureOutcome, PanGesture};
use super::layout::{
    build_nodes, compute_bounds, compute_content_bounds, compute_node_centers, ContentBounds,
    LessonNode, LessonStatus,
};
use super::nodes::{hit_test, node_buttons, press_node, LockedNotice, NodeButton, PressOutcome};
use super::path::{build_segments, layout_paths, PathView};
use crate::geometry::{Point, Viewport};
use crate::navigation::{LessonNavigator, Route};

type LockedCallback = Box<dyn Fn(&LockedNotice) + Send + Sync>;

/// What the host should draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MapView {
    /// Progress has not resolved yet
    Loading,
    /// The map
    Ready(MapFrame),
}

/// One frame of the map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFrame {
    /// Header title
    pub title: &'static str,
    /// Header subtitle
    pub subtitle: String,
    /// Content layer width
    pub content_width: f64,
    /// Content layer height
    pub content_height: f64,
    /// Translation applied to the content layer
    pub translation: Point,
    /// Lesson buttons
    pub nodes: Vec<NodeButton>,
    /// Connectors, drawn under the nodes
    pub paths: Vec<PathView>,
    /// Node the recenter action goes to
    pub start_node_id: Option<String>,
}

/// Layout derived from one completion set
#[derive(Debug)]
struct MapLayout {
    key: Vec<String>,
    nodes: Vec<LessonNode>,
    content: ContentBounds,
    centers: HashMap<String, Point>,
    buttons: Vec<NodeButton>,
    paths: Vec<PathView>,
}

impl MapLayout {
    fn build(catalog: &LessonCatalog, key: Vec<String>, config: &MapConfig) -> Self {
        let completed: HashSet<String> = key.iter().cloned().collect();
        let nodes = build_nodes(catalog.all_lessons(), &completed, config);
        let content = compute_content_bounds(&nodes, config);
        let centers = compute_node_centers(&nodes, content.offset_x, content.offset_y, config);
        let offset = Point::new(content.offset_x, content.offset_y);
        let buttons = node_buttons(&nodes, offset, config);
        let paths = layout_paths(&build_segments(&nodes), &centers, config.marker_step);
        Self { key, nodes, content, centers, buttons, paths }
    }

    fn start_node_id(&self, preferred: Option<&str>) -> Option<String> {
        preferred
            .map(str::to_string)
            .or_else(|| {
                self.nodes
                    .iter()
                    .find(|node| node.status == LessonStatus::Available)
                    .map(|node| node.id.clone())
            })
            .or_else(|| self.nodes.first().map(|node| node.id.clone()))
    }
}

/// Controller for the lessons map screen
pub struct LessonsMapScreen {
    config: MapConfig,
    catalog: LessonCatalog,
    progress: Arc<ProgressState>,
    navigator: Arc<dyn LessonNavigator>,
    on_locked: LockedCallback,
    reduce_motion: ReduceMotionSignal,
    start_node: Option<String>,

    viewport: Viewport,
    layout: Option<MapLayout>,
    layout_builds: usize,
    camera: CameraController,
    gesture: PanGesture,
    press_origin: Option<Point>,
    // start node and viewport of the last automatic focus
    auto_focused: Option<(String, Viewport)>,

    progress_subscription: Option<SubscriptionId>,
    motion_subscription: Option<ListenerId>,
    progress_dirty: Arc<AtomicBool>,
    motion_reduced: Arc<AtomicBool>,
}

impl std::fmt::Debug for LessonsMapScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonsMapScreen")
            .field("viewport", &self.viewport)
            .field("camera", &self.camera)
            .field("gesture", &self.gesture)
            .field("start_node", &self.start_node)
            .field("mounted", &self.progress_subscription.is_some())
            .finish()
    }
}

impl LessonsMapScreen {
    /// Screen over the built-in catalog with default configuration
    pub fn new(progress: Arc<ProgressState>, navigator: Arc<dyn LessonNavigator>) -> Self {
        let config = MapConfig::default();
        let reduce_motion = ReduceMotionSignal::default();
        Self {
            camera: Self::camera_for(&config, &reduce_motion),
            gesture: PanGesture::new(config.drag_threshold),
            config,
            catalog: LessonCatalog::builtin().clone(),
            progress,
            navigator,
            on_locked: Box::new(|notice| {
                tracing::info!(title = notice.title, message = notice.message, "locked lesson notice");
            }),
            reduce_motion,
            start_node: None,
            viewport: Viewport::default(),
            layout: None,
            layout_builds: 0,
            press_origin: None,
            auto_focused: None,
            progress_subscription: None,
            motion_subscription: None,
            progress_dirty: Arc::new(AtomicBool::new(true)),
            motion_reduced: Arc::new(AtomicBool::new(false)),
        }
    }

    fn camera_for(config: &MapConfig, reduce_motion: &ReduceMotionSignal) -> CameraController {
        let capability: Arc<dyn ReduceMotion> = Arc::new(reduce_motion.clone());
        CameraController::new(capability, config.focus_duration())
    }

    /// Use a validated configuration
    pub fn with_config(mut self, config: MapConfig) -> Result<Self, MapConfigError> {
        config.validate()?;
        self.camera = Self::camera_for(&config, &self.reduce_motion);
        self.gesture = PanGesture::new(config.drag_threshold);
        self.config = config;
        self.layout = None;
        Ok(self)
    }

    /// Use a different lesson catalog
    pub fn with_catalog(mut self, catalog: LessonCatalog) -> Self {
        self.catalog = catalog;
        self.layout = None;
        self
    }

    /// Use the platform's reduce-motion signal
    pub fn with_reduce_motion(mut self, signal: ReduceMotionSignal) -> Self {
        self.camera = Self::camera_for(&self.config, &signal);
        self.reduce_motion = signal;
        self
    }

    /// Always treat `lesson_id` as the start node
    pub fn with_start_node(mut self, lesson_id: impl Into<String>) -> Self {
        self.start_node = Some(lesson_id.into());
        self
    }

    /// Called when a locked lesson is pressed
    pub fn on_locked<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LockedNotice) + Send + Sync + 'static,
    {
        self.on_locked = Box::new(callback);
        self
    }

    /// Route this screen lives at
    pub fn route(&self) -> Route {
        Route::LessonsMap
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Attach listeners and resolve the initial progress load
    pub async fn mount(&mut self) {
        if self.progress_subscription.is_none() {
            let dirty = Arc::clone(&self.progress_dirty);
            self.progress_subscription = Some(
                self.progress
                    .subscribe(move |_| dirty.store(true, Ordering::Release)),
            );
        }
        if self.motion_subscription.is_none() {
            let reduced = Arc::clone(&self.motion_reduced);
            self.motion_subscription = Some(self.reduce_motion.subscribe(move |enabled| {
                if enabled {
                    reduced.store(true, Ordering::Release);
                }
            }));
        }

        if self.progress.is_loading() {
            self.progress.load().await;
        }
        self.progress_dirty.store(true, Ordering::Release);
        self.refresh();
        tracing::debug!(lessons = self.catalog.len(), "lessons map mounted");
    }

    /// Stop motion and detach every listener. Safe to call twice.
    pub fn unmount(&mut self) {
        self.camera.cancel_animation();
        self.gesture.on_cancel();
        self.press_origin = None;

        if let Some(id) = self.progress_subscription.take() {
            self.progress.unsubscribe(id);
        }
        if let Some(id) = self.motion_subscription.take() {
            self.reduce_motion.unsubscribe(id);
        }
    }

    /// Whether the map is still waiting on progress
    pub fn is_loading(&self) -> bool {
        self.progress.is_loading()
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Report the viewport size from the host's layout pass
    pub fn on_layout(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport changed");
        self.viewport = viewport;
        self.refresh();
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Node the screen focuses on layout and on recenter
    pub fn start_node_id(&mut self) -> Option<String> {
        self.sync_layout();
        self.layout
            .as_ref()
            .and_then(|layout| layout.start_node_id(self.start_node.as_deref()))
    }

    fn refresh(&mut self) {
        self.sync_layout();
        self.apply_bounds();
        self.auto_focus();
    }

    /// Rebuild the layout when the completion set changed
    fn sync_layout(&mut self) {
        let dirty = self.progress_dirty.swap(false, Ordering::AcqRel);
        if self.layout.is_some() && !dirty {
            return;
        }
        let Some(snapshot) = self.progress.snapshot() else {
            return;
        };

        let mut key = snapshot.completed_lesson_ids;
        key.sort();
        key.dedup();
        if self.layout.as_ref().is_some_and(|layout| layout.key == key) {
            return;
        }

        let layout = MapLayout::build(&self.catalog, key, &self.config);
        self.layout_builds += 1;
        tracing::debug!(
            nodes = layout.nodes.len(),
            completed = layout.key.len(),
            "lesson map layout rebuilt"
        );
        self.layout = Some(layout);
        self.apply_bounds();
    }

    fn apply_bounds(&mut self) {
        let content = self
            .layout
            .as_ref()
            .map(|layout| layout.content)
            .unwrap_or_default();
        let bounds = compute_bounds(
            content.content_width,
            content.content_height,
            self.viewport.width,
            self.viewport.height,
            self.config.edge_padding,
        );
        self.camera.set_layout(self.viewport, bounds);
    }

    /// Jump to the start node when it or the viewport changed since the
    /// last automatic focus
    fn auto_focus(&mut self) {
        if self.viewport.is_empty() {
            return;
        }
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let Some(start) = layout.start_node_id(self.start_node.as_deref()) else {
            return;
        };

        let current = (start, self.viewport);
        if self.auto_focused.as_ref() == Some(&current) {
            return;
        }
        let outcome = self.camera.focus_on_node(&current.0, &layout.centers, false);
        tracing::debug!(node = %current.0, ?outcome, "focused start node");
        self.auto_focused = Some(current);
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Produce the current frame
    pub fn render(&mut self) -> MapView {
        if self.progress.is_loading() {
            return MapView::Loading;
        }
        self.refresh();

        let start_node_id = self.start_node_id();
        let Some(layout) = self.layout.as_ref() else {
            return MapView::Loading;
        };
        MapView::Ready(MapFrame {
            title: Route::LessonsMap.title(),
            subtitle: format!(
                "Follow the path through {} newborn-care lessons.",
                layout.nodes.len()
            ),
            content_width: layout.content.content_width,
            content_height: layout.content.content_height,
            translation: self.camera.translation(),
            nodes: layout.buttons.clone(),
            paths: layout.paths.clone(),
            start_node_id,
        })
    }

    /// Current content translation
    pub fn translation(&self) -> Point {
        self.camera.translation()
    }

    /// Camera state, read-only
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    // -------------------------------------------------------------------------
    // Camera
    // -------------------------------------------------------------------------

    /// Focus a node by id
    pub fn focus_on_node(&mut self, lesson_id: &str, animated: bool) -> FocusOutcome {
        self.sync_layout();
        match self.layout.as_ref() {
            Some(layout) => self.camera.focus_on_node(lesson_id, &layout.centers, animated),
            None => FocusOutcome::Ignored,
        }
    }

    /// Animate back to the start node
    pub fn recenter(&mut self) -> FocusOutcome {
        match self.start_node_id() {
            Some(start) => self.focus_on_node(&start, true),
            None => FocusOutcome::Ignored,
        }
    }

    /// Advance running animations by one frame
    pub fn tick(&mut self, dt: Duration) -> Point {
        if self.motion_reduced.swap(false, Ordering::AcqRel) && self.camera.is_animating() {
            tracing::debug!("reduce motion enabled mid-transition, finishing");
            self.camera.finish_animation();
        }
        self.camera.tick(dt)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Pointer went down at `point` (viewport coordinates)
    pub fn pointer_down(&mut self, point: Point) {
        self.gesture.on_cancel();
        self.press_origin = Some(point);
    }

    /// Pointer moved to `point` while down
    pub fn pointer_move(&mut self, point: Point) -> GestureOutcome {
        let Some(origin) = self.press_origin else {
            return GestureOutcome::PassThrough;
        };
        let bounds = self.camera.bounds();
        let outcome = self
            .gesture
            .on_move(point - origin, self.camera.translation(), &bounds);
        if let GestureOutcome::Pan(translation) = outcome {
            self.camera.set_translation(translation);
        }
        outcome
    }

    /// Pointer released at `point`. A touch that never became a pan is a tap
    /// on whatever node lies under it.
    pub fn pointer_up(&mut self, point: Point) -> Option<PressOutcome> {
        let pressed = self.press_origin.take().is_some();
        if self.gesture.on_release() || !pressed {
            return None;
        }

        let content_point = point - self.camera.translation();
        let lesson_id = {
            let layout = self.layout.as_ref()?;
            hit_test(&layout.buttons, content_point, self.config.hit_slop)?
                .id
                .clone()
        };
        self.press_node(&lesson_id)
    }

    /// The system took the touch away
    pub fn pointer_cancel(&mut self) {
        self.press_origin = None;
        self.gesture.on_cancel();
    }

    /// Press a node by id. Unknown ids are ignored.
    pub fn press_node(&mut self, lesson_id: &str) -> Option<PressOutcome> {
        self.sync_layout();
        let layout = self.layout.as_ref()?;
        let node = layout.nodes.iter().find(|node| node.id == lesson_id)?;
        Some(press_node(node, self.navigator.as_ref(), self.on_locked.as_ref()))
    }
}

impl Drop for LessonsMapScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}
