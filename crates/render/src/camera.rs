use cubescape_common::{periodic, CameraMode};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const ORBIT_RADIUS: f32 = 25.0;
const ORBIT_HEIGHT: f32 = 8.0;
const ORBIT_ANGULAR_SPEED: f64 = 0.3;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 1000.0 / 700.0,
            near: 0.1,
            far: 150.0,
        }
    }
}

impl Projection {
    /// Match the aspect ratio to a `width` x `height` surface. A zero-sized
    /// surface (minimized window) leaves the projection unchanged.
    pub fn fit_to(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

/// Eye placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 15.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl RenderView {
    pub fn looking_at_origin(eye: Vec3) -> Self {
        Self {
            eye,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Projection plus view: everything a backend needs to place geometry on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub view: RenderView,
}

impl Camera {
    pub fn new(projection: Projection, view: RenderView) -> Self {
        Self { projection, view }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view.matrix()
    }
}

/// Eye position on the orbit circle after `t` seconds.
pub fn orbit_eye(t: f64) -> Vec3 {
    let angle = periodic(t, ORBIT_ANGULAR_SPEED, TAU);
    Vec3::new(
        ORBIT_RADIUS * angle.sin(),
        ORBIT_HEIGHT,
        ORBIT_RADIUS * angle.cos(),
    )
}

/// View for `mode` at elapsed time `t`. Only the orbit depends on time.
pub fn view_for_mode(mode: CameraMode, t: f64) -> RenderView {
    let eye = match mode {
        CameraMode::FixedNear => Vec3::new(0.0, 0.0, 15.0),
        CameraMode::FixedOverview => Vec3::new(0.0, 30.0, 40.0),
        CameraMode::Orbit => orbit_eye(t),
        CameraMode::FixedElevated => Vec3::new(0.0, 18.0, 22.0),
    };
    RenderView::looking_at_origin(eye)
}
