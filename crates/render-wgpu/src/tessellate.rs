use bytemuck::{Pod, Zeroable};
use cubescape_common::{ColoredBatch, ColoredVertex, PrimitiveKind};
use cubescape_render::DrawStyle;
use glam::Mat4;
use std::ops::Range;

/// Vertex as uploaded to the GPU: clip-space position and opaque color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub clip_position: [f32; 4],
    pub color: [f32; 4],
}

impl GpuVertex {
    fn project(vertex: &ColoredVertex, clip_from_model: Mat4) -> Self {
        let [r, g, b] = vertex.color.to_array();
        Self {
            clip_position: (clip_from_model * vertex.position.extend(1.0)).to_array(),
            color: [r, g, b, 1.0],
        }
    }
}

/// Which render pipeline a run of vertices is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Points,
    Lines,
    Triangles,
    /// Triangles pushed back in depth so coplanar lines win.
    OffsetTriangles,
}

impl PipelineKind {
    /// Depth offset only applies to filled primitives.
    pub fn for_draw(kind: PrimitiveKind, style: DrawStyle) -> Self {
        match kind {
            PrimitiveKind::Points => Self::Points,
            PrimitiveKind::Lines | PrimitiveKind::LineStrip => Self::Lines,
            PrimitiveKind::Quads if style.depth_offset => Self::OffsetTriangles,
            PrimitiveKind::Quads => Self::Triangles,
        }
    }
}

/// Contiguous vertex range drawn with one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRun {
    pub pipeline: PipelineKind,
    pub vertices: Range<u32>,
}

/// Everything submitted during one frame, flattened into list topologies.
///
/// Line strips become line lists and quads become triangle pairs, so three
/// topologies cover every primitive kind. Adjacent draws that share a
/// pipeline are merged into a single run.
#[derive(Debug, Default)]
pub struct FrameGeometry {
    vertices: Vec<GpuVertex>,
    runs: Vec<DrawRun>,
}

impl FrameGeometry {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.runs.clear();
    }

    pub fn push_batch(&mut self, batch: &ColoredBatch, style: DrawStyle, clip_from_model: Mat4) {
        let start = self.vertices.len() as u32;
        let source = batch.vertices();
        let project = |v: &ColoredVertex| GpuVertex::project(v, clip_from_model);

        match batch.kind() {
            PrimitiveKind::Points | PrimitiveKind::Lines => {
                self.vertices.extend(source.iter().map(project));
            }
            PrimitiveKind::LineStrip => {
                for pair in source.windows(2) {
                    self.vertices.push(project(&pair[0]));
                    self.vertices.push(project(&pair[1]));
                }
            }
            PrimitiveKind::Quads => {
                for quad in source.chunks_exact(4) {
                    for i in [0, 1, 2, 0, 2, 3] {
                        self.vertices.push(project(&quad[i]));
                    }
                }
            }
        }

        let end = self.vertices.len() as u32;
        if end == start {
            return;
        }
        let pipeline = PipelineKind::for_draw(batch.kind(), style);
        match self.runs.last_mut() {
            Some(run) if run.pipeline == pipeline && run.vertices.end == start => {
                run.vertices.end = end;
            }
            _ => self.runs.push(DrawRun {
                pipeline,
                vertices: start..end,
            }),
        }
    }

    pub fn vertices(&self) -> &[GpuVertex] {
        &self.vertices
    }

    pub fn runs(&self) -> &[DrawRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubescape_common::{BatchBuilder, Rgb};
    use glam::Vec3;

    fn strip(points: usize) -> ColoredBatch {
        let mut b = BatchBuilder::new(PrimitiveKind::LineStrip);
        for i in 0..points {
            b.vertex(Vec3::new(i as f32, 0.0, 0.0), Rgb::WHITE);
        }
        b.build().unwrap()
    }

    fn square() -> ColoredBatch {
        let mut b = BatchBuilder::new(PrimitiveKind::Quads);
        b.quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Rgb::new(1.0, 0.0, 0.0),
        );
        b.build().unwrap()
    }

    #[test]
    fn line_strip_becomes_segment_pairs() {
        let mut frame = FrameGeometry::default();
        frame.push_batch(&strip(4), DrawStyle::default(), Mat4::IDENTITY);
        assert_eq!(frame.vertices().len(), 6);
        assert_eq!(frame.vertices()[2].clip_position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.runs()[0].pipeline, PipelineKind::Lines);
    }

    #[test]
    fn quads_become_two_triangles() {
        let mut frame = FrameGeometry::default();
        frame.push_batch(&square(), DrawStyle::default(), Mat4::IDENTITY);
        let v = frame.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[3], v[0]);
        assert_eq!(v[4], v[2]);
        assert_eq!(v[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn depth_offset_selects_offset_pipeline() {
        let style = DrawStyle::default().with_depth_offset();
        assert_eq!(
            PipelineKind::for_draw(PrimitiveKind::Quads, style),
            PipelineKind::OffsetTriangles
        );
        assert_eq!(
            PipelineKind::for_draw(PrimitiveKind::Lines, style),
            PipelineKind::Lines
        );
    }

    #[test]
    fn adjacent_runs_merge() {
        let mut frame = FrameGeometry::default();
        frame.push_batch(&strip(3), DrawStyle::default(), Mat4::IDENTITY);
        frame.push_batch(&strip(2), DrawStyle::default(), Mat4::IDENTITY);
        frame.push_batch(&square(), DrawStyle::default(), Mat4::IDENTITY);
        assert_eq!(
            frame.runs(),
            &[
                DrawRun {
                    pipeline: PipelineKind::Lines,
                    vertices: 0..6,
                },
                DrawRun {
                    pipeline: PipelineKind::Triangles,
                    vertices: 6..12,
                },
            ]
        );
        frame.clear();
        assert!(frame.is_empty());
    }

    #[test]
    fn applies_transform() {
        let mut frame = FrameGeometry::default();
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        frame.push_batch(&strip(2), DrawStyle::default(), m);
        assert_eq!(frame.vertices()[0].clip_position, [0.0, 0.0, -5.0, 1.0]);
    }
}
