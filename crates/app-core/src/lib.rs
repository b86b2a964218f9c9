//! Core domain for Babble
//!
//! This crate holds the lesson catalog: the module/lesson hierarchy, the
//! flattened lesson order and the unlock rule derived from it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lessons;

pub use lessons::{
    is_lesson_unlocked, lesson_modules, Lesson, LessonCatalog, LessonModule, LessonSummary,
};
