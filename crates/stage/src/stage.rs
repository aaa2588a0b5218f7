use crate::config::{ConfigError, StageConfig};
use crate::source::EventSource;
use crate::status::format_status;
use cubescape_assets::{CacheError, GeometryCache, GeometryHandle};
use cubescape_common::{ColoredBatch, Rgb};
use cubescape_geometry::{cube_edges, cube_faces, neon_grid, wave_grid, GeometryError};
use cubescape_input::InputEvent;
use cubescape_kernel::animation::{bob_height, cube_color, cube_transform};
use cubescape_kernel::physics::step_in_place;
use cubescape_kernel::{Body, Bounds, Scene, SceneState, StateError, Transition};
use cubescape_render::{view_for_mode, Camera, DrawBackend, DrawStyle, Projection, RenderError};
use cubescape_telemetry::{Clock, FramePacer, FrameTick, Telemetry, TelemetrySnapshot};
use glam::Vec3;

const CLEAR_COLOR: Rgb = Rgb::BLACK;
const OUTLINE_WIDTH: f32 = 5.0;
const SEA_LINE_WIDTH: f32 = 1.0;
const NEON_LINE_WIDTH: f32 = 2.0;
const TERRAIN_LINE_WIDTH: f32 = 1.0;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result of one [`Stage::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A frame was drawn and presented.
    Rendered(FrameTick),
    /// A quit event arrived; nothing was drawn.
    Quit,
}

/// The run state plus everything needed to draw it.
///
/// One `Stage` exists per run. It exclusively owns the scene state, the body,
/// telemetry and the geometry cache.
pub struct Stage<C: Clock> {
    state: SceneState,
    body: Body,
    bounds: Bounds,
    projection: Projection,
    point_size: f32,
    clock: C,
    pacer: FramePacer,
    telemetry: Telemetry,
    cache: GeometryCache,
    starfield: GeometryHandle,
    terrain: GeometryHandle,
    outline: ColoredBatch,
    status: String,
    frames: u64,
}

impl<C: Clock> Stage<C> {
    /// Validate `config`, build the cached backdrops and start the clock.
    pub fn new(config: StageConfig, clock: C) -> Result<Self, StageError> {
        config.validate()?;
        let state = SceneState::with_initial(
            config.rate_caps.clone(),
            config.initial_scene,
            config.initial_camera,
            config.initial_rate_cap_index(),
        )?;

        let mut cache = GeometryCache::new();
        let starfield = cache.build(&config.starfield.spec())?;
        let terrain = cache.build(&config.terrain.spec())?;
        tracing::info!(
            scene = %state.scene(),
            camera = %state.camera(),
            rate_cap = %state.rate_cap(),
            cached_vertices = cache.vertex_count(),
            "stage ready"
        );

        Ok(Self {
            state,
            body: config.body,
            bounds: config.bounds,
            projection: config.projection,
            point_size: config.starfield.point_size,
            pacer: FramePacer::new(&clock),
            clock,
            telemetry: Telemetry::new(config.telemetry),
            cache,
            starfield,
            terrain,
            outline: cube_edges(Rgb::BLACK)?,
            status: String::new(),
            frames: 0,
        })
    }

    /// Run one frame: pace, apply `events`, draw, publish status.
    ///
    /// A quit event returns [`TickOutcome::Quit`] before anything is drawn.
    /// Any backend failure is returned as-is and should end the run.
    pub fn tick(
        &mut self,
        backend: &mut dyn DrawBackend,
        events: impl IntoIterator<Item = InputEvent>,
    ) -> Result<TickOutcome, StageError> {
        let _span = tracing::debug_span!("tick", frame = self.frames).entered();

        let frame = self
            .pacer
            .tick(&mut self.clock, self.state.rate_cap().frame_budget());
        self.telemetry.record(frame.dt, frame.now);

        for event in events {
            if self.state.apply(event) == Transition::Quit {
                tracing::info!(frames = self.frames, "quit requested");
                return Ok(TickOutcome::Quit);
            }
        }

        let t = frame.elapsed_seconds();
        backend.begin_frame(CLEAR_COLOR)?;
        let camera = Camera::new(self.projection, view_for_mode(self.state.camera(), t));
        backend.set_camera(&camera)?;
        self.draw_backdrop(backend, t)?;
        self.draw_cube(backend, frame.dt_seconds(), t)?;
        backend.end_frame()?;

        self.status = format_status(
            self.state.scene(),
            self.state.camera(),
            backend.renderer_name(),
            &self.telemetry.snapshot(),
            self.state.rate_cap(),
        );
        backend.set_status(&self.status)?;
        self.frames += 1;
        Ok(TickOutcome::Rendered(frame))
    }

    /// Tick until a quit event or until `max_frames` frames have been drawn.
    /// Returns the number of frames drawn.
    pub fn run(
        &mut self,
        backend: &mut dyn DrawBackend,
        source: &mut dyn EventSource,
        max_frames: Option<u64>,
    ) -> Result<u64, StageError> {
        let start = self.frames;
        loop {
            if max_frames.is_some_and(|max| self.frames - start >= max) {
                break;
            }
            let events = source.poll_events();
            if self.tick(backend, events)? == TickOutcome::Quit {
                break;
            }
        }
        Ok(self.frames - start)
    }

    fn draw_backdrop(&self, backend: &mut dyn DrawBackend, t: f64) -> Result<(), StageError> {
        match self.state.scene() {
            Scene::Void => {
                self.cache
                    .replay(self.starfield, backend, DrawStyle::points(self.point_size))?;
            }
            Scene::WavySea => backend.draw(&wave_grid(t)?, DrawStyle::lines(SEA_LINE_WIDTH))?,
            Scene::NeonGrid => backend.draw(&neon_grid(t)?, DrawStyle::lines(NEON_LINE_WIDTH))?,
            Scene::FarHills => {
                self.cache
                    .replay(self.terrain, backend, DrawStyle::lines(TERRAIN_LINE_WIDTH))?;
            }
        }
        Ok(())
    }

    fn draw_cube(&mut self, backend: &mut dyn DrawBackend, dt: f32, t: f64) -> Result<(), StageError> {
        let position = match self.state.scene() {
            Scene::Void => {
                step_in_place(&mut self.body, dt, &self.bounds);
                self.body.position.extend(0.0)
            }
            _ => Vec3::new(0.0, bob_height(t), 0.0),
        };

        backend.push_transform(cube_transform(position, t))?;
        let faces = cube_faces(cube_color(t))?;
        backend.draw(&faces, DrawStyle::default().with_depth_offset())?;
        backend.draw(&self.outline, DrawStyle::lines(OUTLINE_WIDTH))?;
        backend.pop_transform()?;
        Ok(())
    }

    /// Follow a resized output surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.fit_to(width, height);
        tracing::debug!(width, height, aspect = self.projection.aspect, "projection resized");
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Last published status line. Empty until the first frame is drawn.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
