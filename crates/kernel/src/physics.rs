use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position and velocity of the bouncing object, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::new(4.2, 3.2),
        }
    }
}

/// Axis-aligned box centred on the origin, given as half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub half_extents: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(6.5, 4.5),
        }
    }
}

impl Bounds {
    pub fn new(half_x: f32, half_y: f32) -> Self {
        Self {
            half_extents: Vec2::new(half_x, half_y),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_extents.x && p.y.abs() <= self.half_extents.y
    }
}

/// Advance `body` by `dt` seconds and reflect off the bounds.
///
/// Each axis integrates independently. A coordinate past a bound is clamped
/// to exactly that bound and its velocity component negated: a perfectly
/// elastic bounce with no sub-stepping.
pub fn step(body: Body, dt: f32, bounds: &Bounds) -> Body {
    let (px, vx) = reflect_axis(
        body.position.x + body.velocity.x * dt,
        body.velocity.x,
        bounds.half_extents.x,
    );
    let (py, vy) = reflect_axis(
        body.position.y + body.velocity.y * dt,
        body.velocity.y,
        bounds.half_extents.y,
    );
    Body {
        position: Vec2::new(px, py),
        velocity: Vec2::new(vx, vy),
    }
}

/// In-place form of [`step`].
pub fn step_in_place(body: &mut Body, dt: f32, bounds: &Bounds) {
    *body = step(*body, dt, bounds);
}

fn reflect_axis(position: f32, velocity: f32, bound: f32) -> (f32, f32) {
    if position > bound {
        (bound, -velocity)
    } else if position < -bound {
        (-bound, -velocity)
    } else {
        (position, velocity)
    }
}
