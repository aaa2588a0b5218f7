use crate::GeometryError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shape parameters for the procedural height field.
///
/// `h = a_low sin(x f_low) cos(z f_low) + a_high sin(x f_high) sin(z f_high)`,
/// scaled by a radial falloff and lowered by `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainShape {
    pub amplitude_low: f32,
    pub frequency_low: f32,
    pub amplitude_high: f32,
    pub frequency_high: f32,
    /// Downward shift applied after falloff; the boundary sits at `-offset`.
    pub offset: f32,
}

impl Default for TerrainShape {
    fn default() -> Self {
        Self {
            amplitude_low: 4.0,
            frequency_low: 0.15,
            amplitude_high: 1.5,
            frequency_high: 0.45,
            offset: 5.0,
        }
    }
}

/// Largest resolution [`generate_height_grid_with`] accepts.
pub const MAX_TERRAIN_RESOLUTION: usize = 2048;

/// Square grid of terrain heights, `(resolution + 1)^2` samples, row-major.
///
/// Row `i` maps to world `x`, column `j` to world `z`, both spanning
/// `[-extent, extent]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    resolution: usize,
    extent: f32,
    heights: Vec<f32>,
}

impl HeightGrid {
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Samples per row (and per column).
    pub fn side(&self) -> usize {
        self.resolution + 1
    }

    pub fn height(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.side() || col >= self.side() {
            return None;
        }
        self.heights.get(row * self.side() + col).copied()
    }

    /// World coordinate of grid index `index` along either axis.
    pub fn coordinate(&self, index: usize) -> f32 {
        grid_coordinate(index, self.resolution, self.extent)
    }

    /// World position of sample `(row, col)`.
    pub fn world_position(&self, row: usize, col: usize) -> Option<Vec3> {
        let h = self.height(row, col)?;
        Some(Vec3::new(self.coordinate(row), h, self.coordinate(col)))
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Lowest and highest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}

/// Generate a height grid with the default terrain shape.
pub fn generate_height_grid(resolution: usize, extent: f32) -> Result<HeightGrid, GeometryError> {
    generate_height_grid_with(resolution, extent, &TerrainShape::default())
}

/// Generate a height grid with explicit shape parameters.
pub fn generate_height_grid_with(
    resolution: usize,
    extent: f32,
    shape: &TerrainShape,
) -> Result<HeightGrid, GeometryError> {
    if resolution == 0 {
        return Err(GeometryError::EmptyGrid);
    }
    if !extent.is_finite() || extent <= 0.0 {
        return Err(GeometryError::InvalidExtent(extent));
    }
    if resolution > MAX_TERRAIN_RESOLUTION {
        return Err(GeometryError::TooLarge {
            what: "terrain resolution",
            requested: resolution,
            max: MAX_TERRAIN_RESOLUTION,
        });
    }

    // Bounded above, so the sample count cannot overflow.
    let side = resolution + 1;
    let extent_sq = extent * extent;
    let mut heights = Vec::with_capacity(side * side);
    for i in 0..side {
        let x = grid_coordinate(i, resolution, extent);
        for j in 0..side {
            let z = grid_coordinate(j, resolution, extent);
            let raw = shape.amplitude_low
                * (x * shape.frequency_low).sin()
                * (z * shape.frequency_low).cos()
                + shape.amplitude_high
                    * (x * shape.frequency_high).sin()
                    * (z * shape.frequency_high).sin();
            // Squared distance keeps the boundary exact: |x| == extent gives a ratio >= 1.
            let falloff = (1.0 - (x * x + z * z) / extent_sq).max(0.0);
            heights.push(raw * falloff - shape.offset);
        }
    }

    tracing::debug!(resolution, extent, "height grid generated");
    Ok(HeightGrid {
        resolution,
        extent,
        heights,
    })
}

fn grid_coordinate(index: usize, resolution: usize, extent: f32) -> f32 {
    extent * (2.0 * index as f32 / resolution as f32 - 1.0)
}
