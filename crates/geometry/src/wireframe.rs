use crate::terrain::HeightGrid;
use crate::GeometryError;
use cubescape_common::{BatchBuilder, ColoredBatch, PrimitiveKind, Rgb};

/// Map a normalized height `c in [0, 1]` onto the green terrain gradient.
pub fn height_color(c: f32) -> Rgb {
    let c = c.clamp(0.0, 1.0);
    Rgb::new(0.1, 0.3 + 0.7 * c, 0.1 + 0.4 * c)
}

/// Build the crossing-lines terrain: one line strip per grid row and one per
/// grid column. Shared edges between strips are not deduplicated.
pub fn generate_wireframe_mesh(grid: &HeightGrid) -> Result<Vec<ColoredBatch>, GeometryError> {
    let side = grid.side();
    let (lo, hi) = grid.min_max();
    let span = hi - lo;
    let normalize = |h: f32| if span > 0.0 { (h - lo) / span } else { 0.0 };

    let mut strips = Vec::with_capacity(side * 2);
    for row in 0..side {
        let mut strip = BatchBuilder::with_capacity(PrimitiveKind::LineStrip, side);
        for col in 0..side {
            push_sample(&mut strip, grid, row, col, &normalize);
        }
        strips.push(strip.build()?);
    }
    for col in 0..side {
        let mut strip = BatchBuilder::with_capacity(PrimitiveKind::LineStrip, side);
        for row in 0..side {
            push_sample(&mut strip, grid, row, col, &normalize);
        }
        strips.push(strip.build()?);
    }
    Ok(strips)
}

fn push_sample(
    strip: &mut BatchBuilder,
    grid: &HeightGrid,
    row: usize,
    col: usize,
    normalize: &impl Fn(f32) -> f32,
) {
    if let Some(p) = grid.world_position(row, col) {
        strip.vertex(p, height_color(normalize(p.y)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::generate_height_grid;
    use glam::Vec3;
    use std::collections::HashSet;

    fn key(p: Vec3) -> (i64, i64) {
        ((p.x * 1000.0).round() as i64, (p.z * 1000.0).round() as i64)
    }

    #[test]
    fn one_strip_per_row_and_column() {
        let grid = generate_height_grid(12, 24.0).unwrap();
        let strips = generate_wireframe_mesh(&grid).unwrap();
        assert_eq!(strips.len(), 26);
        for s in &strips {
            assert_eq!(s.kind(), PrimitiveKind::LineStrip);
            assert_eq!(s.len(), 13);
        }
    }

    #[test]
    fn every_cell_edge_is_covered() {
        let grid = generate_height_grid(6, 6.0).unwrap();
        let strips = generate_wireframe_mesh(&grid).unwrap();
        let mut edges = HashSet::new();
        for s in &strips {
            for pair in s.vertices().windows(2) {
                let (a, b) = (key(pair[0].position), key(pair[1].position));
                edges.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        // 7 rows x 6 segments, twice (rows and columns).
        assert_eq!(edges.len(), 2 * 7 * 6);
    }

    #[test]
    fn colors_follow_height() {
        let grid = generate_height_grid(30, 40.0).unwrap();
        let strips = generate_wireframe_mesh(&grid).unwrap();
        let (lo, hi) = grid.min_max();
        for v in strips.iter().flat_map(|s| s.vertices()) {
            if v.position.y == lo {
                assert_eq!(v.color, height_color(0.0));
            }
            if v.position.y == hi {
                assert_eq!(v.color, height_color(1.0));
            }
        }
    }

    #[test]
    fn height_color_is_green_gradient() {
        let low = height_color(0.0);
        let high = height_color(1.0);
        assert!(high.g > low.g);
        assert_eq!(low.r, high.r);
        assert_eq!(height_color(2.0), high);
    }
}
