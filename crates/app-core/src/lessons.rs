//! Lesson catalog
//!
//! Lessons are authored in modules. Everything downstream (the lesson map,
//! progress screens) works on the flattened order, where a lesson unlocks once
//! the lesson right before it is completed.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// A single lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Unique lesson id
    pub id: String,
    /// Display title
    pub title: String,
    /// Human readable duration, e.g. "3 min"
    pub duration: String,
    /// Authored lock flag (informational, unlock state is derived from progress)
    #[serde(default)]
    pub locked: bool,
}

/// A group of lessons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonModule {
    /// Unique module id
    pub id: String,
    /// Display title
    pub title: String,
    /// Short description
    pub description: String,
    /// Authored lock flag
    #[serde(default)]
    pub locked: bool,
    /// Lessons in order
    pub lessons: Vec<Lesson>,
}

/// The part of a lesson the map needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonSummary {
    /// Lesson id
    pub id: String,
    /// Lesson title
    pub title: String,
}

impl LessonSummary {
    /// Create a summary
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self::new(lesson.id.clone(), lesson.title.clone())
    }
}

/// Ordered, flattened lesson list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LessonCatalog {
    lessons: Vec<LessonSummary>,
    index: HashMap<String, usize>,
}

impl LessonCatalog {
    /// Flatten modules into a catalog, keeping authoring order
    pub fn new(modules: &[LessonModule]) -> Self {
        Self::from_lessons(
            modules
                .iter()
                .flat_map(|module| module.lessons.iter().map(LessonSummary::from)),
        )
    }

    /// Build a catalog from an already ordered list
    pub fn from_lessons(lessons: impl IntoIterator<Item = LessonSummary>) -> Self {
        let lessons: Vec<LessonSummary> = lessons.into_iter().collect();
        let mut index = HashMap::with_capacity(lessons.len());
        for (i, lesson) in lessons.iter().enumerate() {
            // first occurrence wins for duplicate ids
            index.entry(lesson.id.clone()).or_insert(i);
        }
        Self { lessons, index }
    }

    /// The built-in catalog
    pub fn builtin() -> &'static LessonCatalog {
        static CATALOG: OnceLock<LessonCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| LessonCatalog::new(&lesson_modules()))
    }

    /// All lessons in order
    pub fn all_lessons(&self) -> &[LessonSummary] {
        &self.lessons
    }

    /// Number of lessons
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Whether the catalog has no lessons
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Position of a lesson in the flattened order
    pub fn index_of(&self, lesson_id: &str) -> Option<usize> {
        self.index.get(lesson_id).copied()
    }

    /// Look up a lesson by id
    pub fn get(&self, lesson_id: &str) -> Option<&LessonSummary> {
        self.index_of(lesson_id).map(|i| &self.lessons[i])
    }

    /// The first lesson is always unlocked; any other lesson unlocks once the
    /// lesson right before it is completed. Unknown ids are locked.
    pub fn is_unlocked(&self, lesson_id: &str, completed: &HashSet<String>) -> bool {
        match self.index_of(lesson_id) {
            Some(0) => true,
            Some(i) => completed.contains(&self.lessons[i - 1].id),
            None => false,
        }
    }
}

/// Unlock check against the built-in catalog
pub fn is_lesson_unlocked(lesson_id: &str, completed: &HashSet<String>) -> bool {
    LessonCatalog::builtin().is_unlocked(lesson_id, completed)
}

fn lesson(id: &str, title: &str, duration: &str, locked: bool) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        duration: duration.to_string(),
        locked,
    }
}

/// Built-in lesson modules
pub fn lesson_modules() -> Vec<LessonModule> {
    vec![
        LessonModule {
            id: "module-1".to_string(),
            title: "Getting Started".to_string(),
            description: "Start with the calm basics every new parent can try today.".to_string(),
            locked: false,
            lessons: vec![
                lesson("lesson-1", "Meet your baby cues", "3 min", false),
                lesson("lesson-2", "Safe sleep setup", "4 min", false),
                lesson("lesson-3", "Swaddling basics", "3 min", false),
            ],
        },
        LessonModule {
            id: "module-2".to_string(),
            title: "Soothing & Sleep".to_string(),
            description: "Gentle ways to help baby settle and rest.".to_string(),
            locked: false,
            lessons: vec![
                lesson("lesson-4", "The five S routine", "5 min", false),
                lesson("lesson-5", "Bedtime cues", "4 min", true),
            ],
        },
        LessonModule {
            id: "module-3".to_string(),
            title: "Feeding Foundations".to_string(),
            description: "Comfortable holds and simple routines for feeding time.".to_string(),
            locked: true,
            lessons: vec![lesson("lesson-6", "Bottle basics", "4 min", true)],
        },
    ]
}
