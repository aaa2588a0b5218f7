//! Time-varying backdrops. Regenerated every frame, never cached.

use crate::GeometryError;
use cubescape_common::{periodic, BatchBuilder, ColoredBatch, PrimitiveKind, Rgb};
use glam::Vec3;
use std::f64::consts::TAU;

const SEA_COLOR: Rgb = Rgb::new(0.0, 0.5, 0.8);
const SEA_HALF_CELLS: i32 = 20;
const SEA_SPACING: f32 = 2.0;
const SEA_LEVEL: f32 = -5.0;
const SEA_WAVE_SPEED: f64 = 2.0;

const NEON_FLOOR: f32 = -4.5;
const NEON_HALF_SPAN: i32 = 40;
const NEON_SEGMENT: i32 = 4;
const NEON_SCROLL_SPEED: f64 = 8.0;
const NEON_SCROLL_PERIOD: f64 = 10.0;

/// Water surface height at `(x, z)` after `t` seconds.
pub fn sea_height(t: f64, x: f32, z: f32) -> f32 {
    (periodic(t, SEA_WAVE_SPEED, TAU) + x * 0.2 + z * 0.3).sin() * 0.4 + SEA_LEVEL
}

/// Crossing line grid rippling with a travelling sine wave.
pub fn wave_grid(t: f64) -> Result<ColoredBatch, GeometryError> {
    let cells = (2 * SEA_HALF_CELLS + 1) as usize * (2 * SEA_HALF_CELLS) as usize;
    let mut batch = BatchBuilder::with_capacity(PrimitiveKind::Lines, cells * 4);
    for i in -SEA_HALF_CELLS..=SEA_HALF_CELLS {
        for j in -SEA_HALF_CELLS..SEA_HALF_CELLS {
            // Segment along z at fixed x.
            let x = i as f32 * SEA_SPACING;
            let (z1, z2) = (j as f32 * SEA_SPACING, (j + 1) as f32 * SEA_SPACING);
            batch.line(
                Vec3::new(x, sea_height(t, x, z1), z1),
                SEA_COLOR,
                Vec3::new(x, sea_height(t, x, z2), z2),
                SEA_COLOR,
            );
            // Segment along x at fixed z.
            let z = j as f32 * SEA_SPACING;
            let (x1, x2) = (i as f32 * SEA_SPACING, (i + 1) as f32 * SEA_SPACING);
            batch.line(
                Vec3::new(x1, sea_height(t, x1, z), z),
                SEA_COLOR,
                Vec3::new(x2, sea_height(t, x2, z), z),
                SEA_COLOR,
            );
        }
    }
    Ok(batch.build()?)
}

/// Scroll offset of the neon floor after `t` seconds, in `[0, 10)`.
pub fn neon_scroll(t: f64) -> f32 {
    periodic(t, NEON_SCROLL_SPEED, NEON_SCROLL_PERIOD)
}

/// Flat floor of gradient-colored lines scrolling towards the viewer.
pub fn neon_grid(t: f64) -> Result<ColoredBatch, GeometryError> {
    let m = neon_scroll(t);
    let mut batch = BatchBuilder::new(PrimitiveKind::Lines);
    for i in (-NEON_HALF_SPAN..=NEON_HALF_SPAN).step_by(2) {
        for j in (-NEON_HALF_SPAN..NEON_HALF_SPAN).step_by(NEON_SEGMENT as usize) {
            let grad = (j + NEON_HALF_SPAN) as f32 / (2 * NEON_HALF_SPAN) as f32;
            let color = Rgb::new(0.5 * grad, 0.2, 1.0 - 0.5 * grad);
            let (fi, start, end) = (i as f32, j as f32 + m, (j + NEON_SEGMENT) as f32 + m);
            batch.line(
                Vec3::new(fi, NEON_FLOOR, start),
                color,
                Vec3::new(fi, NEON_FLOOR, end),
                color,
            );
            batch.line(
                Vec3::new(start, NEON_FLOOR, fi),
                color,
                Vec3::new(end, NEON_FLOOR, fi),
                color,
            );
        }
    }
    Ok(batch.build()?)
}
