//! Application state management for Babble
//!
//! This crate provides the reactive progress state screens read from:
//! a loading flag, the latest progress snapshot, and change notifications.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod progress;

pub use progress::{ProgressState, ProgressStateError, SubscriptionId};
