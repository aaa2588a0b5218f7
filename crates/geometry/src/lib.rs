//! Geometry generators: pure functions producing colored primitive batches.
//!
//! # Invariants
//! - Generators never touch a draw backend; they only return data.
//! - Terrain generation is deterministic. The starfield is deterministic only
//!   when a seed is supplied.
//! - Time-varying backdrops take elapsed seconds as an explicit argument.

mod cube;
mod starfield;
mod terrain;
mod waves;
mod wireframe;

pub use cube::{cube_edges, cube_faces, CUBE_HALF_EXTENT};
pub use starfield::{generate_starfield, MAX_STARS};
pub use terrain::{
    generate_height_grid, generate_height_grid_with, HeightGrid, TerrainShape,
    MAX_TERRAIN_RESOLUTION,
};
pub use waves::{neon_grid, wave_grid};
pub use wireframe::{generate_wireframe_mesh, height_color};

use cubescape_common::BatchError;

/// Errors from geometry generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("height grid resolution must be at least 1")]
    EmptyGrid,
    #[error("extent must be finite and positive, got {0}")]
    InvalidExtent(f32),
    #[error("radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("{what} of {requested} exceeds the limit of {max}")]
    TooLarge {
        what: &'static str,
        requested: usize,
        max: usize,
    },
    #[error(transparent)]
    Batch(#[from] BatchError),
}
