use crate::camera::Camera;
use cubescape_common::{ColoredBatch, Rgb};
use glam::Mat4;

/// Errors a draw backend can raise. All of them end the run.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("draw call outside begin_frame/end_frame")]
    NotInFrame,
    #[error("begin_frame called while a frame is already open")]
    FrameAlreadyOpen,
    #[error("transform stack underflow")]
    TransformUnderflow,
    #[error("transform stack deeper than {0}")]
    TransformOverflow(usize),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("device error: {0}")]
    Device(String),
}

/// Per-draw raster state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    /// Line width in pixels. Backends without wide lines may ignore it.
    pub line_width: f32,
    /// Point size in pixels.
    pub point_size: f32,
    /// Push filled faces slightly back in depth so an outline drawn over the
    /// same geometry wins the depth test.
    pub depth_offset: bool,
}

impl DrawStyle {
    pub fn lines(width: f32) -> Self {
        Self {
            line_width: width,
            ..Self::default()
        }
    }

    pub fn points(size: f32) -> Self {
        Self {
            point_size: size,
            ..Self::default()
        }
    }

    pub fn with_depth_offset(mut self) -> Self {
        self.depth_offset = true;
        self
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            point_size: 1.0,
            depth_offset: false,
        }
    }
}

/// Immediate-mode draw backend.
///
/// Given colored batches and the current transform/camera state, the backend
/// rasterizes into the frame buffer with a standard less-or-equal depth test.
/// Consumers never see how the frame is produced.
pub trait DrawBackend {
    /// Open a frame, clearing color to `clear` and depth to far.
    fn begin_frame(&mut self, clear: Rgb) -> Result<(), RenderError>;

    /// Set projection and view for subsequent draws.
    fn set_camera(&mut self, camera: &Camera) -> Result<(), RenderError>;

    /// Multiply `transform` onto the current model transform and save the previous one.
    fn push_transform(&mut self, transform: Mat4) -> Result<(), RenderError>;

    /// Restore the model transform saved by the matching push.
    fn pop_transform(&mut self) -> Result<(), RenderError>;

    /// Submit one batch under the current transform.
    fn draw(&mut self, batch: &ColoredBatch, style: DrawStyle) -> Result<(), RenderError>;

    /// Close the frame and present it.
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Publish the human-readable status line (window caption, log, ...).
    fn set_status(&mut self, status: &str) -> Result<(), RenderError>;

    /// Name of the device doing the rasterizing, shown in the status line.
    fn renderer_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_builders() {
        let s = DrawStyle::lines(5.0);
        assert_eq!(s.line_width, 5.0);
        assert!(!s.depth_offset);
        assert!(DrawStyle::default().with_depth_offset().depth_offset);
        assert_eq!(DrawStyle::points(2.0).point_size, 2.0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            RenderError::TransformOverflow(32).to_string(),
            "transform stack deeper than 32"
        );
        assert!(RenderError::Surface("lost".into()).to_string().contains("lost"));
    }
}
