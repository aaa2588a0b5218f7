use cubescape_assets::GeometrySpec;
use cubescape_common::CameraMode;
use cubescape_geometry::{TerrainShape, MAX_STARS, MAX_TERRAIN_RESOLUTION};
use cubescape_kernel::{Body, Bounds, RateCapTable, SCENE_COUNT};
use cubescape_render::Projection;
use cubescape_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on telemetry buffer sizes accepted from a config file.
pub const MAX_TELEMETRY_SAMPLES: usize = 1 << 20;

/// Errors from loading or validating a [`StageConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Cached point cloud drawn behind the VOID scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    pub radius: f32,
    /// Fixed seed for a reproducible sky. Unset draws from OS entropy.
    pub seed: Option<u64>,
    pub point_size: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            radius: 60.0,
            seed: None,
            point_size: 2.0,
        }
    }
}

impl StarfieldConfig {
    pub fn spec(&self) -> GeometrySpec {
        GeometrySpec::Starfield {
            count: self.count,
            radius: self.radius,
            seed: self.seed,
        }
    }
}

/// Cached wireframe terrain drawn behind the FAR HILLS scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub resolution: usize,
    pub extent: f32,
    pub shape: TerrainShape,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 40,
            extent: 50.0,
            shape: TerrainShape::default(),
        }
    }
}

impl TerrainConfig {
    pub fn spec(&self) -> GeometrySpec {
        GeometrySpec::Terrain {
            resolution: self.resolution,
            extent: self.extent,
            shape: self.shape,
        }
    }
}

/// Everything needed to start a run. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub bounds: Bounds,
    pub body: Body,
    pub telemetry: TelemetryConfig,
    pub starfield: StarfieldConfig,
    pub terrain: TerrainConfig,
    pub projection: Projection,
    pub rate_caps: RateCapTable,
    pub initial_scene: usize,
    pub initial_camera: CameraMode,
    /// Index into `rate_caps`. Unset starts at the unbounded entry.
    pub initial_rate_cap: Option<usize>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            body: Body::default(),
            telemetry: TelemetryConfig::default(),
            starfield: StarfieldConfig::default(),
            terrain: TerrainConfig::default(),
            projection: Projection::default(),
            rate_caps: RateCapTable::default(),
            initial_scene: 1,
            initial_camera: CameraMode::Orbit,
            initial_rate_cap: None,
        }
    }
}

impl StageConfig {
    /// Read a JSON config file. The result is not validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Rate-cap index the run starts at.
    pub fn initial_rate_cap_index(&self) -> usize {
        self.initial_rate_cap.unwrap_or_else(|| {
            self.rate_caps
                .unbounded_index()
                .unwrap_or(self.rate_caps.len().saturating_sub(1))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let half = self.bounds.half_extents;
        if !(half.x.is_finite() && half.y.is_finite() && half.x > 0.0 && half.y > 0.0) {
            return invalid(format!("bounds must be positive, got {half}"));
        }
        if !self.bounds.contains(self.body.position) {
            return invalid(format!(
                "body starts at {} outside bounds {half}",
                self.body.position
            ));
        }
        let telemetry = &self.telemetry;
        if !(1..=MAX_TELEMETRY_SAMPLES).contains(&telemetry.history_capacity) {
            return invalid(format!(
                "telemetry history capacity must be in 1..={MAX_TELEMETRY_SAMPLES}, got {}",
                telemetry.history_capacity
            ));
        }
        if !(1..=MAX_TELEMETRY_SAMPLES).contains(&telemetry.smoothing_window) {
            return invalid(format!(
                "telemetry smoothing window must be in 1..={MAX_TELEMETRY_SAMPLES}, got {}",
                telemetry.smoothing_window
            ));
        }
        if self.rate_caps.is_empty() {
            return invalid("rate-cap table is empty");
        }
        if self.initial_scene >= SCENE_COUNT {
            return invalid(format!(
                "initial scene {} out of range (0..{SCENE_COUNT})",
                self.initial_scene
            ));
        }
        let rate_index = self.initial_rate_cap_index();
        if rate_index >= self.rate_caps.len() {
            return invalid(format!(
                "initial rate cap {rate_index} out of range (0..{})",
                self.rate_caps.len()
            ));
        }
        if !(self.starfield.radius.is_finite() && self.starfield.radius > 0.0) {
            return invalid(format!(
                "starfield radius must be positive, got {}",
                self.starfield.radius
            ));
        }
        if self.starfield.count > MAX_STARS {
            return invalid(format!(
                "starfield count must be at most {MAX_STARS}, got {}",
                self.starfield.count
            ));
        }
        if !(1..=MAX_TERRAIN_RESOLUTION).contains(&self.terrain.resolution) {
            return invalid(format!(
                "terrain resolution must be in 1..={MAX_TERRAIN_RESOLUTION}, got {}",
                self.terrain.resolution
            ));
        }
        if !(self.terrain.extent.is_finite() && self.terrain.extent > 0.0) {
            return invalid(format!(
                "terrain extent must be positive, got {}",
                self.terrain.extent
            ));
        }
        let p = &self.projection;
        if !(p.aspect > 0.0 && p.near > 0.0 && p.far > p.near) {
            return invalid(format!(
                "projection needs aspect > 0 and 0 < near < far, got aspect {} near {} far {}",
                p.aspect, p.near, p.far
            ));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(reason.into()))
}
