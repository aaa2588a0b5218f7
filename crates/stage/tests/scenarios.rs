//! End-to-end runs of the stage against the recording backend and a manual clock.

use cubescape_common::{CameraMode, ColoredBatch, PrimitiveKind, Rgb};
use cubescape_input::{EventQueue, InputEvent};
use cubescape_kernel::{RateCap, Scene};
use cubescape_render::{
    Camera, DrawBackend, DrawStyle, RecordingBackend, RenderError, RECORDING_RENDERER,
};
use cubescape_stage::{ScriptedEvents, Stage, StageConfig, StageError, TickOutcome};
use cubescape_telemetry::{Clock, ManualClock};
use glam::Mat4;
use std::time::Duration;

fn small_config() -> StageConfig {
    let mut config = StageConfig::default();
    config.starfield.count = 64;
    config.starfield.seed = Some(42);
    config.terrain.resolution = 8;
    config
}

fn stage() -> Stage<ManualClock> {
    Stage::new(small_config(), ManualClock::new()).unwrap()
}

#[test]
fn out_of_range_scene_selection_is_a_no_op() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    let before = stage.state().clone();
    stage
        .tick(&mut backend, [InputEvent::SelectScene(5)])
        .unwrap();
    assert_eq!(stage.state(), &before);
    assert_eq!(stage.state().scene(), Scene::WavySea);
}

#[test]
fn void_replays_cached_starfield() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    for _ in 0..3 {
        stage.clock_mut().advance(Duration::from_millis(10));
        stage
            .tick(&mut backend, [InputEvent::SelectScene(0)])
            .unwrap();
    }

    let frame = backend.last_frame().unwrap();
    assert_eq!(frame.draws[0].kind, PrimitiveKind::Points);
    assert_eq!(frame.draws[0].vertex_count, 64);
    assert_eq!(frame.draws[0].style.point_size, 2.0);
    assert_eq!(stage.cache().len(), 2);
    assert!(stage.status().starts_with("VOID | "));
}

#[test]
fn seeded_starfield_is_reproducible() {
    let first_star = || {
        let mut stage = stage();
        let mut backend = RecordingBackend::new();
        stage
            .tick(&mut backend, [InputEvent::SelectScene(0)])
            .unwrap();
        backend.last_frame().unwrap().draws[0].first_vertex
    };
    assert_eq!(first_star(), first_star());
}

#[test]
fn far_hills_replays_cached_terrain() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    stage
        .tick(&mut backend, [InputEvent::SelectScene(3)])
        .unwrap();

    let frame = backend.last_frame().unwrap();
    // One strip per row and per column of a 9x9 grid, then faces and outline.
    assert_eq!(frame.count_kind(PrimitiveKind::LineStrip), 18);
    assert_eq!(frame.draws.len(), 20);
    let faces = &frame.draws[18];
    assert_eq!(faces.kind, PrimitiveKind::Quads);
    assert!(faces.style.depth_offset);
    let outline = &frame.draws[19];
    assert_eq!(outline.kind, PrimitiveKind::Lines);
    assert_eq!(outline.primitive_count, 12);
    assert_eq!(outline.style.line_width, 5.0);
    assert_eq!(outline.transform, faces.transform);
}

#[test]
fn neon_and_sea_are_regenerated_inline() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    stage.tick(&mut backend, []).unwrap();
    let sea = backend.last_frame().unwrap().draws[0].clone();
    assert_eq!(sea.primitive_count, 41 * 40 * 2);

    stage.clock_mut().advance(Duration::from_millis(100));
    stage.tick(&mut backend, [InputEvent::NextScene]).unwrap();
    let neon = &backend.last_frame().unwrap().draws[0];
    assert_eq!(neon.primitive_count, 41 * 20 * 2);
    assert_eq!(neon.style.line_width, 2.0);
}

#[test]
fn quit_stops_before_drawing() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    let mut source = ScriptedEvents::parse("quit,next,next").unwrap();

    let frames = stage.run(&mut backend, &mut source, Some(10)).unwrap();
    assert_eq!(frames, 0);
    assert_eq!(backend.frames_completed(), 0);
    assert!(backend.last_frame().is_none());
    assert_eq!(stage.status(), "");
    assert_eq!(source.remaining(), 2);
}

#[test]
fn quit_mid_tick_discards_later_events() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    let mut queue = EventQueue::new();
    queue.extend([InputEvent::NextScene, InputEvent::Quit, InputEvent::NextScene]);
    let outcome = stage.tick(&mut backend, queue.drain()).unwrap();
    assert_eq!(outcome, TickOutcome::Quit);
    assert_eq!(stage.state().scene(), Scene::NeonGrid);
}

#[test]
fn run_honors_frame_limit() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    let mut source = ScriptedEvents::parse("next,,camera:near").unwrap();
    let frames = stage.run(&mut backend, &mut source, Some(5)).unwrap();
    assert_eq!(frames, 5);
    assert_eq!(backend.frames_completed(), 5);
    assert_eq!(stage.state().camera(), CameraMode::FixedNear);
    assert_eq!(backend.status(), stage.status());
}

#[test]
fn rate_cap_sleeps_the_rest_of_the_budget() {
    let mut config = small_config();
    config.initial_rate_cap = Some(1);
    let mut stage = Stage::new(config, ManualClock::new()).unwrap();
    let mut backend = RecordingBackend::new();
    let budget = RateCap::Fps(60).frame_budget().unwrap();

    for _ in 0..10 {
        stage.clock_mut().advance(Duration::from_millis(5));
        match stage.tick(&mut backend, []).unwrap() {
            TickOutcome::Rendered(frame) => {
                assert_eq!(frame.dt, budget);
                assert_eq!(frame.slept, budget - Duration::from_millis(5));
            }
            TickOutcome::Quit => panic!("unexpected quit"),
        }
    }
    assert_eq!(stage.clock().now(), budget * 10);
    assert!(stage.status().ends_with("LIM:60"));
}

#[test]
fn unbounded_cap_never_sleeps() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    for _ in 0..10 {
        stage.clock_mut().advance(Duration::from_millis(3));
        stage.tick(&mut backend, []).unwrap();
    }
    assert_eq!(stage.clock().slept(), Duration::ZERO);
    assert!(stage.status().ends_with("LIM:INF"));
}

#[test]
fn backend_failure_is_fatal() {
    let mut stage = stage();
    let mut backend = RecordingBackend::failing_on_frame(2);
    let mut source = ScriptedEvents::default();

    let err = stage.run(&mut backend, &mut source, Some(10)).unwrap_err();
    assert!(matches!(err, StageError::Render(RenderError::Device(_))));
    assert_eq!(backend.frames_completed(), 2);
    assert_eq!(stage.frames(), 2);
}

#[test]
fn steady_sixty_hz_telemetry() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    for _ in 0..150 {
        stage.clock_mut().advance(Duration::from_micros(16_600));
        stage.tick(&mut backend, []).unwrap();
    }

    let snap = stage.telemetry();
    assert_eq!(snap.samples, 150);
    assert!((snap.fps - 60.24).abs() < 0.01);
    assert!((snap.low_1 - 60.24).abs() < 0.01);
    assert!((snap.low_01 - 60.24).abs() < 0.01);
    assert_eq!(
        stage.status(),
        "WAVY SEA | ORBIT | recording | FPS:60 | 1%:60 | 0.1%:60 | LIM:INF"
    );
}

#[test]
fn bouncing_body_stays_in_bounds() {
    let mut stage = stage();
    let mut backend = RecordingBackend::new();
    stage
        .tick(&mut backend, [InputEvent::SelectScene(0)])
        .unwrap();
    for _ in 0..400 {
        stage.clock_mut().advance(Duration::from_millis(33));
        stage.tick(&mut backend, []).unwrap();
        let p = stage.body().position;
        assert!(p.x.abs() <= 6.5 && p.y.abs() <= 4.5, "escaped at {p}");
    }
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = small_config();
    config.initial_scene = 9;
    assert!(matches!(
        Stage::new(config, ManualClock::new()),
        Err(StageError::Config(_))
    ));
}

#[test]
fn oversized_geometry_config_is_an_error() {
    let config: StageConfig =
        serde_json::from_str(r#"{ "terrain": { "resolution": 18446744073709551615 } }"#).unwrap();
    assert!(matches!(
        Stage::new(config, ManualClock::new()),
        Err(StageError::Config(_))
    ));
}

/// Records like [`RecordingBackend`] under its own device name, and can
/// refuse the status line.
struct NamedBackend {
    inner: RecordingBackend,
    name: &'static str,
    reject_status: bool,
}

impl NamedBackend {
    fn new(name: &'static str) -> Self {
        Self {
            inner: RecordingBackend::new(),
            name,
            reject_status: false,
        }
    }
}

impl DrawBackend for NamedBackend {
    fn begin_frame(&mut self, clear: Rgb) -> Result<(), RenderError> {
        self.inner.begin_frame(clear)
    }

    fn set_camera(&mut self, camera: &Camera) -> Result<(), RenderError> {
        self.inner.set_camera(camera)
    }

    fn push_transform(&mut self, transform: Mat4) -> Result<(), RenderError> {
        self.inner.push_transform(transform)
    }

    fn pop_transform(&mut self) -> Result<(), RenderError> {
        self.inner.pop_transform()
    }

    fn draw(&mut self, batch: &ColoredBatch, style: DrawStyle) -> Result<(), RenderError> {
        self.inner.draw(batch, style)
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.inner.end_frame()
    }

    fn set_status(&mut self, status: &str) -> Result<(), RenderError> {
        if self.reject_status {
            return Err(RenderError::Surface("caption unavailable".into()));
        }
        self.inner.set_status(status)
    }

    fn renderer_name(&self) -> &str {
        self.name
    }
}

#[test]
fn status_names_the_renderer() {
    let mut stage = stage();
    let mut recording = RecordingBackend::new();
    stage.tick(&mut recording, []).unwrap();
    assert!(stage.status().starts_with(&format!("WAVY SEA | ORBIT | {RECORDING_RENDERER} | ")));

    let mut named = NamedBackend::new("GeForce GTX 1080");
    stage.tick(&mut named, [InputEvent::NextScene]).unwrap();
    assert!(stage.status().starts_with("NEON GRID | ORBIT | GeForce GTX 1080 | FPS:"));
    assert_eq!(named.inner.status(), stage.status());
}

#[test]
fn status_failure_is_fatal() {
    let mut stage = stage();
    let mut backend = NamedBackend::new("offscreen");
    backend.reject_status = true;
    let err = stage.tick(&mut backend, []).unwrap_err();
    assert!(matches!(err, StageError::Render(RenderError::Surface(_))));
    assert_eq!(backend.inner.frames_completed(), 1);
    assert_eq!(stage.frames(), 0);
}
