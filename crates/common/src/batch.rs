use crate::types::{PrimitiveKind, Rgb};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One vertex of a colored batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredVertex {
    pub position: Vec3,
    pub color: Rgb,
}

impl ColoredVertex {
    pub fn new(position: Vec3, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Errors from batch construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    #[error("{count} vertices do not form whole {kind:?} primitives")]
    IncompleteBatch { kind: PrimitiveKind, count: usize },
}

/// Ordered colored vertices tagged with a primitive kind.
///
/// Fields are private: once built, a batch is never mutated. The draw backend
/// groups consecutive vertices according to `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoredBatch {
    kind: PrimitiveKind,
    vertices: Vec<ColoredVertex>,
}

impl ColoredBatch {
    /// Build a batch, checking that the vertex count fits `kind`.
    pub fn from_vertices(
        kind: PrimitiveKind,
        vertices: Vec<ColoredVertex>,
    ) -> Result<Self, BatchError> {
        if !kind.accepts(vertices.len()) {
            return Err(BatchError::IncompleteBatch {
                kind,
                count: vertices.len(),
            });
        }
        Ok(Self { kind, vertices })
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn vertices(&self) -> &[ColoredVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of primitives (points, segments, quads) the backend will draw.
    pub fn primitive_count(&self) -> usize {
        match self.kind {
            PrimitiveKind::LineStrip => self.vertices.len().saturating_sub(1),
            kind => self.vertices.len() / kind.group_size(),
        }
    }
}

/// Incremental builder that appends whole primitives.
#[derive(Debug, Clone)]
pub struct BatchBuilder {
    kind: PrimitiveKind,
    vertices: Vec<ColoredVertex>,
}

impl BatchBuilder {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
        }
    }

    pub fn with_capacity(kind: PrimitiveKind, capacity: usize) -> Self {
        Self {
            kind,
            vertices: Vec::with_capacity(capacity),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a single vertex (points and line strips).
    pub fn vertex(&mut self, position: Vec3, color: Rgb) -> &mut Self {
        self.vertices.push(ColoredVertex::new(position, color));
        self
    }

    /// Append a segment with per-end colors.
    pub fn line(&mut self, a: Vec3, ca: Rgb, b: Vec3, cb: Rgb) -> &mut Self {
        self.vertex(a, ca).vertex(b, cb)
    }

    /// Append a flat-colored quad.
    pub fn quad(&mut self, corners: [Vec3; 4], color: Rgb) -> &mut Self {
        for corner in corners {
            self.vertex(corner, color);
        }
        self
    }

    pub fn build(self) -> Result<ColoredBatch, BatchError> {
        ColoredBatch::from_vertices(self.kind, self.vertices)
    }
}
