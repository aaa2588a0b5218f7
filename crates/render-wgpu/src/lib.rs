//! wgpu draw backend.
//!
//! Implements the immediate-mode `DrawBackend` on a wgpu surface: batches are
//! transformed to clip space on the CPU, flattened into point, line and
//! triangle lists, and drawn in one render pass per frame.
//!
//! # Invariants
//! - The backend never owns scene state; it only rasterizes what it is given.
//! - A lost or outdated surface is reconfigured and the frame skipped.
//!   Any other surface or device error is returned to the caller.

mod gpu;
mod shaders;
mod tessellate;

pub use gpu::WgpuBackend;
pub use tessellate::{DrawRun, FrameGeometry, GpuVertex, PipelineKind};
