use crate::backend::{DrawBackend, DrawStyle, RenderError};
use crate::camera::Camera;
use crate::transform::TransformStack;
use cubescape_common::{ColoredBatch, ColoredVertex, PrimitiveKind, Rgb};
use glam::Mat4;
use std::fmt::Write as _;

/// One captured draw submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub kind: PrimitiveKind,
    pub vertex_count: usize,
    pub primitive_count: usize,
    pub style: DrawStyle,
    /// Model transform in effect when the batch was submitted.
    pub transform: Mat4,
    pub first_vertex: Option<ColoredVertex>,
}

/// Everything submitted between `begin_frame` and `end_frame`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub clear: Rgb,
    pub camera: Option<Camera>,
    pub draws: Vec<DrawCall>,
}

impl RecordedFrame {
    pub fn vertex_count(&self) -> usize {
        self.draws.iter().map(|d| d.vertex_count).sum()
    }

    pub fn count_kind(&self, kind: PrimitiveKind) -> usize {
        self.draws.iter().filter(|d| d.kind == kind).count()
    }
}

/// Renderer name the recording backend reports.
pub const RECORDING_RENDERER: &str = "recording";

/// Draw backend that records submissions instead of rasterizing them.
///
/// Only the last completed frame is kept, plus running totals, so long
/// headless runs stay bounded in memory.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    open: Option<RecordedFrame>,
    last_frame: Option<RecordedFrame>,
    transforms: TransformStack,
    frames_completed: u64,
    total_draws: u64,
    total_vertices: u64,
    status: String,
    fail_on_frame: Option<u64>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `end_frame` fail once `frame` frames have completed, to exercise
    /// fatal backend errors.
    pub fn failing_on_frame(frame: u64) -> Self {
        Self {
            fail_on_frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last_frame.as_ref()
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    pub fn total_vertices(&self) -> u64 {
        self.total_vertices
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Human-readable summary of the last frame.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Recorded frames: {} (draws={}, vertices={}) ===",
            self.frames_completed, self.total_draws, self.total_vertices
        );
        if let Some(frame) = &self.last_frame {
            if let Some(camera) = &frame.camera {
                let e = camera.view.eye;
                let _ = writeln!(
                    out,
                    "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0}",
                    e.x, e.y, e.z, camera.projection.fov_degrees
                );
            }
            for draw in &frame.draws {
                let _ = writeln!(
                    out,
                    "  {:?} x{} ({} vertices, line_width={:.0}{})",
                    draw.kind,
                    draw.primitive_count,
                    draw.vertex_count,
                    draw.style.line_width,
                    if draw.style.depth_offset {
                        ", depth offset"
                    } else {
                        ""
                    }
                );
            }
        }
        if !self.status.is_empty() {
            let _ = writeln!(out, "Status: {}", self.status);
        }
        out
    }

    fn frame_mut(&mut self) -> Result<&mut RecordedFrame, RenderError> {
        self.open.as_mut().ok_or(RenderError::NotInFrame)
    }
}

impl DrawBackend for RecordingBackend {
    fn begin_frame(&mut self, clear: Rgb) -> Result<(), RenderError> {
        if self.open.is_some() {
            return Err(RenderError::FrameAlreadyOpen);
        }
        self.transforms.reset();
        self.open = Some(RecordedFrame {
            clear,
            ..RecordedFrame::default()
        });
        Ok(())
    }

    fn set_camera(&mut self, camera: &Camera) -> Result<(), RenderError> {
        self.frame_mut()?.camera = Some(*camera);
        Ok(())
    }

    fn push_transform(&mut self, transform: Mat4) -> Result<(), RenderError> {
        self.frame_mut()?;
        self.transforms.push(transform)
    }

    fn pop_transform(&mut self) -> Result<(), RenderError> {
        self.frame_mut()?;
        self.transforms.pop()
    }

    fn draw(&mut self, batch: &ColoredBatch, style: DrawStyle) -> Result<(), RenderError> {
        let transform = self.transforms.current();
        self.frame_mut()?.draws.push(DrawCall {
            kind: batch.kind(),
            vertex_count: batch.len(),
            primitive_count: batch.primitive_count(),
            style,
            transform,
            first_vertex: batch.vertices().first().copied(),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let frame = self.open.take().ok_or(RenderError::NotInFrame)?;
        if self.fail_on_frame == Some(self.frames_completed) {
            return Err(RenderError::Device("simulated device loss".into()));
        }
        if self.transforms.depth() != 0 {
            tracing::warn!(depth = self.transforms.depth(), "unbalanced transform stack at end of frame");
        }
        self.frames_completed += 1;
        self.total_draws += frame.draws.len() as u64;
        self.total_vertices += frame.vertex_count() as u64;
        self.last_frame = Some(frame);
        Ok(())
    }

    fn set_status(&mut self, status: &str) -> Result<(), RenderError> {
        self.status.clear();
        self.status.push_str(status);
        Ok(())
    }

    fn renderer_name(&self) -> &str {
        RECORDING_RENDERER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubescape_common::BatchBuilder;
    use glam::Vec3;

    fn segment() -> ColoredBatch {
        let mut b = BatchBuilder::new(PrimitiveKind::Lines);
        b.line(Vec3::ZERO, Rgb::WHITE, Vec3::X, Rgb::WHITE);
        b.build().unwrap()
    }

    #[test]
    fn records_one_frame() {
        let mut backend = RecordingBackend::new();
        backend.begin_frame(Rgb::BLACK).unwrap();
        backend.push_transform(Mat4::from_translation(Vec3::Y)).unwrap();
        backend.draw(&segment(), DrawStyle::lines(2.0)).unwrap();
        backend.pop_transform().unwrap();
        backend.draw(&segment(), DrawStyle::default()).unwrap();
        backend.end_frame().unwrap();

        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].transform, Mat4::from_translation(Vec3::Y));
        assert_eq!(frame.draws[1].transform, Mat4::IDENTITY);
        assert_eq!(frame.vertex_count(), 4);
        assert_eq!(backend.frames_completed(), 1);
        assert_eq!(backend.total_vertices(), 4);
    }

    #[test]
    fn draw_outside_frame_fails() {
        let mut backend = RecordingBackend::new();
        assert!(matches!(
            backend.draw(&segment(), DrawStyle::default()),
            Err(RenderError::NotInFrame)
        ));
        assert!(matches!(backend.end_frame(), Err(RenderError::NotInFrame)));
    }

    #[test]
    fn double_begin_fails() {
        let mut backend = RecordingBackend::new();
        backend.begin_frame(Rgb::BLACK).unwrap();
        assert!(matches!(
            backend.begin_frame(Rgb::BLACK),
            Err(RenderError::FrameAlreadyOpen)
        ));
    }

    #[test]
    fn simulated_failure() {
        let mut backend = RecordingBackend::failing_on_frame(1);
        backend.begin_frame(Rgb::BLACK).unwrap();
        backend.end_frame().unwrap();
        backend.begin_frame(Rgb::BLACK).unwrap();
        assert!(matches!(backend.end_frame(), Err(RenderError::Device(_))));
    }

    #[test]
    fn summary_mentions_status() {
        let mut backend = RecordingBackend::new();
        backend.set_status("VOID | FPS:60").unwrap();
        assert_eq!(backend.renderer_name(), "recording");
        backend.begin_frame(Rgb::BLACK).unwrap();
        backend.draw(&segment(), DrawStyle::default()).unwrap();
        backend.end_frame().unwrap();
        let text = backend.summary();
        assert!(text.contains("Recorded frames: 1"));
        assert!(text.contains("Lines x1"));
        assert!(text.contains("Status: VOID | FPS:60"));
    }
}
