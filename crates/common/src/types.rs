use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear RGB color, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamp every channel into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How the draw backend groups consecutive vertices of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// One vertex per point.
    Points,
    /// Independent segments, two vertices each.
    Lines,
    /// One connected polyline through every vertex.
    LineStrip,
    /// Four vertices per quad, wound consistently.
    Quads,
}

impl PrimitiveKind {
    /// Vertices consumed by one primitive. A line strip needs at least two.
    pub fn group_size(self) -> usize {
        match self {
            Self::Points => 1,
            Self::Lines | Self::LineStrip => 2,
            Self::Quads => 4,
        }
    }

    /// Whether `count` vertices form a whole number of primitives.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::LineStrip => count >= 2,
            kind => count % kind.group_size() == 0,
        }
    }
}

/// Strategy for placing the viewpoint each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Close, head-on view of the origin.
    FixedNear,
    /// High view over the whole backdrop.
    FixedOverview,
    /// Circular path around the origin driven by elapsed time.
    #[default]
    Orbit,
    /// Raised static view.
    FixedElevated,
}

impl CameraMode {
    pub const ALL: [CameraMode; 4] = [
        CameraMode::FixedNear,
        CameraMode::FixedOverview,
        CameraMode::Orbit,
        CameraMode::FixedElevated,
    ];

    /// Short lowercase name, also accepted by the event script parser.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::FixedNear => "near",
            Self::FixedOverview => "overview",
            Self::Orbit => "orbit",
            Self::FixedElevated => "elevated",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.short_name() == name)
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FixedNear => "FIXED NEAR",
            Self::FixedOverview => "OVERVIEW",
            Self::Orbit => "ORBIT",
            Self::FixedElevated => "ELEVATED",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_clamped() {
        let c = Rgb::new(-0.5, 0.5, 1.5).clamped();
        assert_eq!(c, Rgb::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn primitive_grouping() {
        assert!(PrimitiveKind::Points.accepts(7));
        assert!(PrimitiveKind::Lines.accepts(4));
        assert!(!PrimitiveKind::Lines.accepts(3));
        assert!(PrimitiveKind::Quads.accepts(24));
        assert!(!PrimitiveKind::Quads.accepts(6));
        assert!(PrimitiveKind::LineStrip.accepts(3));
        assert!(!PrimitiveKind::LineStrip.accepts(1));
    }

    #[test]
    fn camera_mode_names_round_trip() {
        for mode in CameraMode::ALL {
            assert_eq!(CameraMode::from_short_name(mode.short_name()), Some(mode));
        }
        assert_eq!(CameraMode::from_short_name("sideways"), None);
    }

    #[test]
    fn camera_default_is_orbit() {
        assert_eq!(CameraMode::default(), CameraMode::Orbit);
    }
}
