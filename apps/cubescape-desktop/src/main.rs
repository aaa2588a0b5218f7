use anyhow::{Context, Result};
use clap::Parser;
use cubescape_common::CameraMode;
use cubescape_input::{EventQueue, InputEvent};
use cubescape_render_wgpu::WgpuBackend;
use cubescape_stage::{Stage, StageConfig, TickOutcome};
use cubescape_telemetry::SystemClock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubescape-desktop", about = "Spinning cube over switchable backdrops")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON stage configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the starfield (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width in pixels
    #[arg(long, default_value = "1000")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "700")]
    height: u32,
}

/// Translate a key press into a stage event.
fn map_key(key: KeyCode) -> Option<InputEvent> {
    let event = match key {
        KeyCode::ArrowRight => InputEvent::NextScene,
        KeyCode::ArrowLeft => InputEvent::PrevScene,
        KeyCode::ArrowUp => InputEvent::RaiseRateCap,
        KeyCode::ArrowDown => InputEvent::LowerRateCap,
        KeyCode::Digit1 => InputEvent::SelectScene(0),
        KeyCode::Digit2 => InputEvent::SelectScene(1),
        KeyCode::Digit3 => InputEvent::SelectScene(2),
        KeyCode::Digit4 => InputEvent::SelectScene(3),
        KeyCode::F1 => InputEvent::SelectCamera(CameraMode::FixedNear),
        KeyCode::F2 => InputEvent::SelectCamera(CameraMode::FixedOverview),
        KeyCode::F3 => InputEvent::SelectCamera(CameraMode::Orbit),
        KeyCode::F4 => InputEvent::SelectCamera(CameraMode::FixedElevated),
        KeyCode::Escape => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

struct DesktopApp {
    stage: Stage<SystemClock>,
    size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    events: EventQueue,
    error: Option<anyhow::Error>,
}

impl DesktopApp {
    fn new(stage: Stage<SystemClock>, size: PhysicalSize<u32>) -> Self {
        Self {
            stage,
            size,
            window: None,
            backend: None,
            events: EventQueue::new(),
            error: None,
        }
    }

    /// Record a fatal error and leave the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(backend)) = (&self.window, &mut self.backend) else {
            return;
        };

        let outcome = self.stage.tick(backend, self.events.drain());
        match outcome {
            Ok(TickOutcome::Rendered(_)) => {
                if let Some(status) = backend.take_status() {
                    window.set_title(status);
                }
                window.request_redraw();
            }
            Ok(TickOutcome::Quit) => event_loop.exit(),
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("frame failed")),
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("cubescape")
            .with_inner_size(self.size);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("create window"));
                return;
            }
        };

        let size = window.inner_size();
        self.stage.resize(size.width, size.height);
        match WgpuBackend::new(window.clone(), size.width, size.height) {
            Ok(backend) => {
                tracing::info!(adapter = backend.adapter_name(), "renderer ready");
                self.backend = Some(backend);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("initialize renderer")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(backend) = &mut self.backend {
                    backend.resize(new_size.width, new_size.height);
                }
                self.stage.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(event) = map_key(key) {
                    self.events.push(event);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubescape-desktop starting");

    let mut config = match &cli.config {
        Some(path) => StageConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => StageConfig::default(),
    };
    if cli.seed.is_some() {
        config.starfield.seed = cli.seed;
    }
    let stage = Stage::new(config, SystemClock::new())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(stage, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => {
            tracing::info!(frames = app.stage.frames(), "cubescape-desktop exiting");
            Ok(())
        }
    }
}
