//! Platform capabilities for Babble
//!
//! This crate wraps OS-level signals the UI consumes, such as the
//! reduce-motion accessibility preference, behind injectable handles.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessibility;

pub use accessibility::{FixedReduceMotion, ListenerId, ReduceMotion, ReduceMotionSignal};
