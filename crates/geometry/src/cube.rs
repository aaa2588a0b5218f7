use crate::GeometryError;
use cubescape_common::{BatchBuilder, ColoredBatch, PrimitiveKind, Rgb};
use glam::Vec3;

/// Half the cube's edge length in object space.
pub const CUBE_HALF_EXTENT: f32 = 1.0;

const CORNERS: [[f32; 3]; 8] = [
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
];

const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 4, 7, 3],
    [1, 5, 6, 2],
    [1, 0, 4, 5],
    [2, 3, 7, 6],
];

const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

fn corner(index: usize) -> Vec3 {
    Vec3::from_array(CORNERS[index]) * CUBE_HALF_EXTENT
}

/// Six flat-colored faces of the cube.
pub fn cube_faces(color: Rgb) -> Result<ColoredBatch, GeometryError> {
    let mut batch = BatchBuilder::with_capacity(PrimitiveKind::Quads, FACES.len() * 4);
    for face in FACES {
        batch.quad(face.map(corner), color);
    }
    Ok(batch.build()?)
}

/// Twelve edges of the cube, for the outline overlay.
pub fn cube_edges(color: Rgb) -> Result<ColoredBatch, GeometryError> {
    let mut batch = BatchBuilder::with_capacity(PrimitiveKind::Lines, EDGES.len() * 2);
    for [a, b] in EDGES {
        batch.line(corner(a), color, corner(b), color);
    }
    Ok(batch.build()?)
}
