use crate::GeometryError;
use cubescape_common::{BatchBuilder, ColoredBatch, PrimitiveKind, Rgb};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Largest point count [`generate_starfield`] accepts.
pub const MAX_STARS: usize = 1_000_000;

/// Scatter `count` points uniformly over a sphere of `radius`.
///
/// Each point gets a pastel blue-white color. Without a seed the RNG is
/// seeded from OS entropy, so every run produces a different sky.
pub fn generate_starfield(
    count: usize,
    radius: f32,
    seed: Option<u64>,
) -> Result<ColoredBatch, GeometryError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::InvalidRadius(radius));
    }
    if count > MAX_STARS {
        return Err(GeometryError::TooLarge {
            what: "star count",
            requested: count,
            max: MAX_STARS,
        });
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut batch = BatchBuilder::with_capacity(PrimitiveKind::Points, count);
    for _ in 0..count {
        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(-1.0_f32..=1.0).acos();
        let direction = Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        );
        batch.vertex(direction * radius, star_color(&mut rng));
    }
    tracing::debug!(count, radius, seeded = seed.is_some(), "starfield generated");
    Ok(batch.build()?)
}

fn star_color(rng: &mut StdRng) -> Rgb {
    let brightness = rng.gen_range(0.6..=1.0);
    let tint = rng.gen_range(0.0..0.2);
    Rgb::new(brightness * 0.8, brightness * 0.85, brightness + tint).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_lie_on_sphere() {
        let stars = generate_starfield(500, 80.0, Some(1)).unwrap();
        assert_eq!(stars.kind(), PrimitiveKind::Points);
        assert_eq!(stars.len(), 500);
        for v in stars.vertices() {
            assert!((v.position.length() - 80.0).abs() < 1e-3);
        }
    }

    #[test]
    fn colors_are_pastel_blue_white() {
        let stars = generate_starfield(200, 10.0, Some(9)).unwrap();
        for v in stars.vertices() {
            let c = v.color;
            assert!(c.b >= c.g && c.g >= c.r);
            assert!(c.r >= 0.48 && c.b <= 1.0);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_starfield(64, 5.0, Some(42)).unwrap();
        let b = generate_starfield(64, 5.0, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate_starfield(64, 5.0, Some(1)).unwrap();
        let b = generate_starfield(64, 5.0, Some(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn covers_both_hemispheres() {
        let stars = generate_starfield(1000, 1.0, Some(3)).unwrap();
        let north = stars.vertices().iter().filter(|v| v.position.z > 0.0).count();
        assert!(north > 350 && north < 650, "north = {north}");
    }

    #[test]
    fn rejects_bad_radius() {
        assert_eq!(
            generate_starfield(10, 0.0, None).unwrap_err(),
            GeometryError::InvalidRadius(0.0)
        );
        assert!(generate_starfield(10, f32::NAN, None).is_err());
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(generate_starfield(0, 1.0, None).unwrap().is_empty());
    }

    #[test]
    fn oversized_count_is_an_error() {
        assert_eq!(
            generate_starfield(usize::MAX, 1.0, Some(1)).unwrap_err(),
            GeometryError::TooLarge {
                what: "star count",
                requested: usize::MAX,
                max: MAX_STARS,
            }
        );
        assert_eq!(generate_starfield(MAX_STARS, 1.0, Some(1)).unwrap().len(), MAX_STARS);
    }
}
