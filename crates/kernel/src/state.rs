use crate::rate::{RateCap, RateCapTable};
use cubescape_common::CameraMode;
use cubescape_input::InputEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of backdrops the demo cycles through.
pub const SCENE_COUNT: usize = 4;

/// Backdrop the cube is rendered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    /// Starfield; the cube bounces inside a box.
    Void,
    /// Rippling wave grid.
    WavySea,
    /// Scrolling neon floor.
    NeonGrid,
    /// Wireframe terrain.
    FarHills,
}

impl Scene {
    pub const ALL: [Scene; SCENE_COUNT] =
        [Scene::Void, Scene::WavySea, Scene::NeonGrid, Scene::FarHills];

    pub fn index(self) -> usize {
        self as usize
    }

    /// `None` when `index >= SCENE_COUNT`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Void => "VOID",
            Self::WavySea => "WAVY SEA",
            Self::NeonGrid => "NEON GRID",
            Self::FarHills => "FAR HILLS",
        }
    }

    fn offset(self, delta: isize) -> Self {
        let n = SCENE_COUNT as isize;
        let next = (self.index() as isize + delta).rem_euclid(n) as usize;
        Self::ALL[next]
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an applied event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    SceneChanged(Scene),
    CameraChanged(CameraMode),
    RateCapChanged(RateCap),
    /// Event had no effect (out-of-range scene selection).
    Ignored,
    /// Terminal: the run loop must stop.
    Quit,
}

/// Errors from constructing a state with explicit initial values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("scene index {0} out of range (0..{max})", max = SCENE_COUNT)]
    SceneOutOfRange(usize),
    #[error("rate-cap index {index} out of range (0..{len})")]
    RateCapOutOfRange { index: usize, len: usize },
}

/// Scene selector, camera mode and rate-cap setting.
///
/// Fully determined by the events applied so far; there is no hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    scene: Scene,
    camera: CameraMode,
    rate_cap_index: usize,
    rate_caps: RateCapTable,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(RateCapTable::default())
    }
}

impl SceneState {
    /// Start on the wave grid, orbiting, at the table's unbounded entry
    /// (or its last entry when none is unbounded).
    pub fn new(rate_caps: RateCapTable) -> Self {
        let rate_cap_index = rate_caps
            .unbounded_index()
            .unwrap_or(rate_caps.len().saturating_sub(1));
        Self {
            scene: Scene::WavySea,
            camera: CameraMode::Orbit,
            rate_cap_index,
            rate_caps,
        }
    }

    /// Start from explicit values, validating both indices.
    pub fn with_initial(
        rate_caps: RateCapTable,
        scene_index: usize,
        camera: CameraMode,
        rate_cap_index: usize,
    ) -> Result<Self, StateError> {
        let scene =
            Scene::from_index(scene_index).ok_or(StateError::SceneOutOfRange(scene_index))?;
        if rate_cap_index >= rate_caps.len() {
            return Err(StateError::RateCapOutOfRange {
                index: rate_cap_index,
                len: rate_caps.len(),
            });
        }
        Ok(Self {
            scene,
            camera,
            rate_cap_index,
            rate_caps,
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn camera(&self) -> CameraMode {
        self.camera
    }

    pub fn rate_cap_index(&self) -> usize {
        self.rate_cap_index
    }

    pub fn rate_cap(&self) -> RateCap {
        self.rate_caps
            .get(self.rate_cap_index)
            .unwrap_or(RateCap::Unbounded)
    }

    pub fn rate_caps(&self) -> &RateCapTable {
        &self.rate_caps
    }

    /// Apply one event. This is the whole transition table.
    pub fn apply(&mut self, event: InputEvent) -> Transition {
        let transition = match event {
            InputEvent::NextScene => {
                self.scene = self.scene.offset(1);
                Transition::SceneChanged(self.scene)
            }
            InputEvent::PrevScene => {
                self.scene = self.scene.offset(-1);
                Transition::SceneChanged(self.scene)
            }
            InputEvent::SelectScene(n) => match Scene::from_index(n) {
                Some(scene) => {
                    self.scene = scene;
                    Transition::SceneChanged(scene)
                }
                None => Transition::Ignored,
            },
            InputEvent::SelectCamera(mode) => {
                self.camera = mode;
                Transition::CameraChanged(mode)
            }
            InputEvent::RaiseRateCap => {
                self.rate_cap_index = (self.rate_cap_index + 1) % self.rate_caps.len();
                Transition::RateCapChanged(self.rate_cap())
            }
            InputEvent::LowerRateCap => {
                let len = self.rate_caps.len();
                self.rate_cap_index = (self.rate_cap_index + len - 1) % len;
                Transition::RateCapChanged(self.rate_cap())
            }
            InputEvent::Quit => Transition::Quit,
        };
        tracing::debug!(%event, ?transition, "input applied");
        transition
    }
}
