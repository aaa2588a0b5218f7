//! Frame pacing and frame-rate telemetry.
//!
//! # Invariants
//! - Pacing only ever delays; it never shortens a frame.
//! - Degenerate frame times (zero, or a clock running backwards) never reach
//!   the history.
//! - Percentile lows report 0 until the history holds more than
//!   `min_samples` entries.

mod clock;
mod history;
mod pacer;
mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use history::FrameHistory;
pub use pacer::{FramePacer, FrameTick};
pub use stats::{percentile_lows, Telemetry, TelemetryConfig, TelemetrySnapshot};
