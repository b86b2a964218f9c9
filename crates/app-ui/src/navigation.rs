//! Navigation system for Babble
//!
//! This module provides:
//! - Route definitions with deep linking support
//! - A path router
//! - Navigation stack management
//! - The lesson navigator used by the map to open lessons

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameters for a route
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Route Definitions
// =============================================================================

/// All possible routes in the application
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    // Main tabs
    /// Home
    #[default]
    Home,
    /// Lesson list grouped by module
    Lessons,
    /// Lesson map
    LessonsMap,
    /// Progress overview
    Progress,
    /// Profile
    Profile,

    /// Lesson detail
    Lesson {
        /// Lesson id
        lesson_id: String,
    },

    /// Not found
    NotFound,
}

impl Route {
    /// Convert route to URL path
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Lessons => "/lessons".to_string(),
            Route::LessonsMap => "/lessons-map".to_string(),
            Route::Progress => "/progress".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Lesson { lesson_id } => {
                format!("/lesson/{}", urlencoding::encode(lesson_id))
            }
            Route::NotFound => "/not-found".to_string(),
        }
    }

    /// Get the screen title for this route
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Lessons => "Lessons",
            Route::LessonsMap => "Lessons Map",
            Route::Progress => "Progress",
            Route::Profile => "Profile",
            Route::Lesson { .. } => "Lesson",
            Route::NotFound => "Not Found",
        }
    }
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// A navigation stack entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The route
    pub route: Route,
    /// Unique key for this entry
    pub key: String,
}

impl StackEntry {
    /// Create a new stack entry
    pub fn new(route: Route) -> Self {
        Self {
            route,
            key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Navigation stack, root at the bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStack {
    /// Entries pushed above the root, bottom to top
    entries: Vec<StackEntry>,
    /// Root entry, kept separately so `current` never has to fail
    root: StackEntry,
}

impl NavigationStack {
    /// Create a new navigation stack with a root route
    pub fn new(root: Route) -> Self {
        Self {
            entries: Vec::new(),
            root: StackEntry::new(root),
        }
    }

    /// Push a route onto the stack
    pub fn push(&mut self, route: Route) {
        tracing::debug!(path = %route.to_path(), "push route");
        self.entries.push(StackEntry::new(route));
    }

    /// Pop the top route (returns true if popped, false if at root)
    pub fn pop(&mut self) -> bool {
        self.entries.pop().is_some()
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) {
        self.entries.clear();
    }

    /// Get the current (top) route
    pub fn current(&self) -> &Route {
        &self.current_entry().route
    }

    /// Get the current stack entry
    pub fn current_entry(&self) -> &StackEntry {
        self.entries.last().unwrap_or(&self.root)
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get stack depth, root included
    pub fn depth(&self) -> usize {
        self.entries.len() + 1
    }

    /// Iterate entries from root to top
    pub fn entries(&self) -> impl Iterator<Item = &StackEntry> {
        std::iter::once(&self.root).chain(self.entries.iter())
    }

    /// Reset to a new root
    pub fn reset(&mut self, route: Route) {
        self.root = StackEntry::new(route);
        self.entries.clear();
    }
}

// =============================================================================
// Lesson Navigator
// =============================================================================

/// Opens a lesson's detail screen
#[cfg_attr(test, mockall::automock)]
pub trait LessonNavigator: Send + Sync {
    /// Navigate to the lesson with `lesson_id`
    fn open_lesson(&self, lesson_id: &str);
}

/// Default navigator: pushes `Route::Lesson` onto a shared stack
#[derive(Debug, Clone)]
pub struct StackNavigator {
    stack: Arc<Mutex<NavigationStack>>,
}

impl StackNavigator {
    /// Navigator over an existing shared stack
    pub fn new(stack: Arc<Mutex<NavigationStack>>) -> Self {
        Self { stack }
    }

    /// Navigator with a fresh stack rooted at the lesson map
    pub fn rooted_at_map() -> Self {
        Self::new(Arc::new(Mutex::new(NavigationStack::new(Route::LessonsMap))))
    }

    /// Shared stack handle
    pub fn stack(&self) -> Arc<Mutex<NavigationStack>> {
        Arc::clone(&self.stack)
    }

    /// Current route
    pub fn current(&self) -> Route {
        self.stack.lock().current().clone()
    }
}

impl LessonNavigator for StackNavigator {
    fn open_lesson(&self, lesson_id: &str) {
        self.stack.lock().push(Route::Lesson {
            lesson_id: lesson_id.to_string(),
        });
    }
}

/// Navigator backed by a caller-supplied callback
pub struct CallbackNavigator<F> {
    on_open: F,
}

impl<F> CallbackNavigator<F>
where
    F: Fn(&str) + Send + Sync,
{
    /// Wrap a callback
    pub fn new(on_open: F) -> Self {
        Self { on_open }
    }
}

impl<F> LessonNavigator for CallbackNavigator<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn open_lesson(&self, lesson_id: &str) {
        (self.on_open)(lesson_id)
    }
}

// =============================================================================
// Router
// =============================================================================

/// Pattern segment
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

struct RoutePattern {
    segments: Vec<PatternSegment>,
    builder: fn(RouteParams) -> Option<Route>,
}

/// URL Router for parsing paths to routes
pub struct Router {
    /// Route patterns
    patterns: Vec<RoutePattern>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new router with all routes
    pub fn new() -> Self {
        let mut router = Self {
            patterns: Vec::new(),
        };

        router.add_route("/", |_| Some(Route::Home));
        router.add_route("/lessons", |_| Some(Route::Lessons));
        router.add_route("/lessons-map", |_| Some(Route::LessonsMap));
        router.add_route("/progress", |_| Some(Route::Progress));
        router.add_route("/profile", |_| Some(Route::Profile));
        router.add_route("/lesson/:lessonId", |params| {
            Some(Route::Lesson {
                lesson_id: params.get("lessonId")?.clone(),
            })
        });

        router
    }

    /// Add a route pattern
    fn add_route(&mut self, pattern: &str, builder: fn(RouteParams) -> Option<Route>) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(RoutePattern { segments, builder });
    }

    /// Match a path to a route
    pub fn match_path(&self, path: &str) -> Route {
        // Query strings carry nothing for these routes
        let pathname = path.split_once('?').map_or(path, |(p, _)| p);
        let path_segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();

        for pattern in &self.patterns {
            if let Some(params) = Self::match_pattern(&pattern.segments, &path_segments) {
                if let Some(route) = (pattern.builder)(params) {
                    return route;
                }
            }
        }

        Route::NotFound
    }

    /// Match a pattern against path segments
    fn match_pattern(pattern: &[PatternSegment], path: &[&str]) -> Option<RouteParams> {
        if pattern.len() != path.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, actual) in pattern.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != *actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(
                        name.clone(),
                        urlencoding::decode(actual).ok()?.into_owned(),
                    );
                }
            }
        }
        Some(params)
    }
}

// =============================================================================
// Tests
// =============================================================================
