//! Shared data model: vertices, colors, primitive batches and camera modes.
//!
//! # Invariants
//! - A `ColoredBatch` is immutable once built.
//! - Every batch holds a whole number of primitives for its `PrimitiveKind`.

mod batch;
mod phase;
mod types;

pub use batch::{BatchBuilder, BatchError, ColoredBatch, ColoredVertex};
pub use phase::periodic;
pub use types::{CameraMode, PrimitiveKind, Rgb};
