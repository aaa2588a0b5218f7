use anyhow::Context;
use clap::{Parser, Subcommand};
use cubescape_kernel::Scene;
use cubescape_render::RecordingBackend;
use cubescape_stage::{EventSource, ScriptedEvents, Stage, StageConfig, TickOutcome};
use cubescape_telemetry::{Clock, ManualClock, SystemClock};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubescape-cli", about = "Headless runs of the cube demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scenes and the default configuration
    Info,
    /// Run the stage against a recording backend
    Run {
        /// Number of frames to draw
        #[arg(short, long, default_value = "300")]
        ticks: u64,
        /// Comma-separated events, one step per frame (e.g. "next,,camera:near,quit")
        #[arg(long)]
        script: Option<String>,
        /// Seed for the starfield (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,
        /// JSON stage configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Drive a simulated clock with this much work per frame instead of wall time
        #[arg(long)]
        simulated_frame_ms: Option<f64>,
        /// Print the status line every N frames
        #[arg(long, default_value = "60")]
        report_every: u64,
    },
}

/// Tick until quit or `ticks` frames. `work` runs before each tick.
fn drive<C: Clock>(
    stage: &mut Stage<C>,
    backend: &mut RecordingBackend,
    source: &mut dyn EventSource,
    ticks: u64,
    report_every: u64,
    mut work: impl FnMut(&mut C),
) -> anyhow::Result<()> {
    while stage.frames() < ticks {
        work(stage.clock_mut());
        match stage.tick(backend, source.poll_events())? {
            TickOutcome::Rendered(_) => {
                if report_every > 0 && stage.frames() % report_every == 0 {
                    println!("{}", stage.status());
                }
            }
            TickOutcome::Quit => {
                tracing::info!(frames = stage.frames(), "quit by script");
                break;
            }
        }
    }
    println!("Final: {}", stage.status());
    print!("{}", backend.summary());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubescape-cli v{}", env!("CARGO_PKG_VERSION"));
            let scenes: Vec<String> = Scene::ALL
                .iter()
                .map(|s| format!("{}={s}", s.index()))
                .collect();
            println!("scenes: {}", scenes.join(", "));
            println!("default config:");
            println!("{}", serde_json::to_string_pretty(&StageConfig::default())?);
        }
        Commands::Run {
            ticks,
            script,
            seed,
            config,
            simulated_frame_ms,
            report_every,
        } => {
            let mut stage_config = match &config {
                Some(path) => StageConfig::load(path)
                    .with_context(|| format!("load config {}", path.display()))?,
                None => StageConfig::default(),
            };
            if seed.is_some() {
                stage_config.starfield.seed = seed;
            }
            let mut source = match &script {
                Some(script) => ScriptedEvents::parse(script).context("parse script")?,
                None => ScriptedEvents::default(),
            };
            let mut backend = RecordingBackend::new();

            match simulated_frame_ms {
                Some(ms) => {
                    anyhow::ensure!(
                        ms.is_finite() && ms >= 0.0,
                        "simulated frame time must be a non-negative number of milliseconds"
                    );
                    let work = Duration::from_secs_f64(ms / 1000.0);
                    println!("Headless run: {ticks} frames, simulated {ms} ms of work per frame");
                    let mut stage = Stage::new(stage_config, ManualClock::new())?;
                    drive(&mut stage, &mut backend, &mut source, ticks, report_every, |clock| {
                        clock.advance(work)
                    })?;
                }
                None => {
                    println!("Headless run: {ticks} frames, wall clock");
                    let mut stage = Stage::new(stage_config, SystemClock::new())?;
                    drive(&mut stage, &mut backend, &mut source, ticks, report_every, |_| {})?;
                }
            }
        }
    }

    Ok(())
}
