//! Kernel: the authoritative run state and the pure functions that advance it.
//!
//! # Invariants
//! - Scene index, camera mode and rate-cap index are always valid.
//! - The moving body is inside its bounds after every physics step.
//! - Animation is a pure function of explicit elapsed time; nothing here
//!   reads a clock.

pub mod animation;
pub mod physics;
pub mod rate;
pub mod state;

pub use physics::{Body, Bounds};
pub use rate::{RateCap, RateCapTable, RateCapError};
pub use state::{Scene, SceneState, StateError, Transition, SCENE_COUNT};
