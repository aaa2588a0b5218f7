//! Render orchestrator: the single run-state owner that turns input events and
//! elapsed time into draw calls, once per tick.
//!
//! # Invariants
//! - Each tick runs in order: pace, apply events, clear, camera, backdrop,
//!   cube, present, status.
//! - A quit event ends the tick before anything is drawn.
//! - Cached backdrops are built once in [`Stage::new`] and only replayed after.
//! - Backend failures are fatal and propagate out of [`Stage::tick`].

mod config;
mod source;
mod stage;
mod status;

pub use config::{ConfigError, StageConfig, StarfieldConfig, TerrainConfig, MAX_TELEMETRY_SAMPLES};
pub use source::{EventSource, ScriptedEvents};
pub use stage::{Stage, StageError, TickOutcome};
pub use status::format_status;
