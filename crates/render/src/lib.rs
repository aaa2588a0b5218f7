//! Rendering Adapter: renderer-agnostic immediate-mode draw interface.
//!
//! # Invariants
//! - Backends only rasterize what they are given; they never own scene state.
//! - Every frame is bracketed by `begin_frame` / `end_frame`.
//! - Transform pushes and pops are balanced within a frame.
//!
//! The `RecordingBackend` captures draw calls instead of rasterizing them. It
//! drives headless runs and tests; the wgpu backend lives in its own crate.

mod backend;
mod camera;
mod recording;
mod transform;

pub use backend::{DrawBackend, DrawStyle, RenderError};
pub use camera::{orbit_eye, view_for_mode, Camera, Projection, RenderView};
pub use recording::{DrawCall, RecordedFrame, RecordingBackend, RECORDING_RENDERER};
pub use transform::{TransformStack, MAX_TRANSFORM_DEPTH};
