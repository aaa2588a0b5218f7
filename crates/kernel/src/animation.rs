//! Time-driven decoration. Every function takes elapsed seconds explicitly.

use cubescape_common::{periodic, Rgb};
use glam::{Mat4, Quat, Vec3};
use std::f64::consts::TAU;

const BOB_AMPLITUDE: f32 = 1.2;
const BOB_ANGULAR_SPEED: f64 = 2.0;
const BOB_OFFSET: f32 = 2.0;
const SPIN_DEGREES_PER_SECOND: f64 = 80.0;

/// Vertical hover of the cube outside the bouncing scene.
pub fn bob_height(t: f64) -> f32 {
    BOB_AMPLITUDE * periodic(t, BOB_ANGULAR_SPEED, TAU).sin() + BOB_OFFSET
}

/// Axis the cube spins around.
pub fn spin_axis() -> Vec3 {
    Vec3::new(1.0, 1.0, 0.0).normalize()
}

/// Spin angle in radians after `t` seconds, in `[0, 2pi)`.
pub fn spin_angle(t: f64) -> f32 {
    periodic(t, SPIN_DEGREES_PER_SECOND, 360.0).to_radians()
}

/// Fill color from three phase-shifted sinusoids, each mapped into `[0, 1]`.
pub fn cube_color(t: f64) -> Rgb {
    let channel = |phase: f64| (periodic(t + phase, 1.0, TAU).sin() + 1.0) / 2.0;
    Rgb::new(channel(0.0), channel(2.0), channel(4.0))
}

/// Model transform: translate to `position`, then spin.
pub fn cube_transform(position: Vec3, t: f64) -> Mat4 {
    let spin = Quat::from_axis_angle(spin_axis(), spin_angle(t));
    Mat4::from_translation(position) * Mat4::from_quat(spin)
}
