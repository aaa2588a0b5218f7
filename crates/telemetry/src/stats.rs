use crate::history::FrameHistory;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Tunables for frame-rate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub history_capacity: usize,
    pub refresh_interval_ms: u64,
    /// Frames averaged into the current rate.
    pub smoothing_window: usize,
    /// Lows stay at zero until the history holds more samples than this.
    pub min_samples: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: 500,
            refresh_interval_ms: 500,
            smoothing_window: 10,
            min_samples: 100,
        }
    }
}

impl TelemetryConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// Read-only view of the current statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub fps: f32,
    pub low_1: f32,
    pub low_01: f32,
    pub samples: usize,
}

/// 1% and 0.1% lows of an ascending slice: the entries at
/// `floor(len * 0.01)` and `floor(len * 0.001)`.
pub fn percentile_lows(sorted: &[f32]) -> (f32, f32) {
    if sorted.is_empty() {
        return (0.0, 0.0);
    }
    let last = sorted.len() - 1;
    let at = |fraction: f64| {
        let i = (sorted.len() as f64 * fraction).floor() as usize;
        sorted[i.min(last)]
    };
    (at(0.01), at(0.001))
}

/// Current frame rate plus 1% / 0.1% lows over a bounded history.
#[derive(Debug, Clone)]
pub struct Telemetry {
    config: TelemetryConfig,
    history: FrameHistory,
    recent: VecDeque<Duration>,
    fps: f32,
    low_1: f32,
    low_01: f32,
    last_refresh: Option<Duration>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}

impl Telemetry {
    pub fn new(config: TelemetryConfig) -> Self {
        let window = config.smoothing_window.max(1);
        Self {
            history: FrameHistory::new(config.history_capacity),
            recent: VecDeque::with_capacity(window),
            config,
            fps: 0.0,
            low_1: 0.0,
            low_01: 0.0,
            last_refresh: None,
        }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    /// Record one frame that took `dt`, observed at clock time `now`.
    ///
    /// Returns false when the sample was discarded (zero `dt` or a rate of
    /// 1 fps or less).
    pub fn record(&mut self, dt: Duration, now: Duration) -> bool {
        let seconds = dt.as_secs_f64();
        if seconds <= 0.0 {
            tracing::trace!("zero frame time discarded");
            return false;
        }
        let instant_fps = (1.0 / seconds) as f32;
        if !instant_fps.is_finite() || instant_fps <= 1.0 {
            tracing::trace!(instant_fps, "frame sample discarded");
            return false;
        }

        self.history.push(instant_fps);
        if self.recent.len() == self.config.smoothing_window.max(1) {
            self.recent.pop_front();
        }
        self.recent.push_back(dt);
        let window: Duration = self.recent.iter().sum();
        self.fps = (self.recent.len() as f64 / window.as_secs_f64()) as f32;

        let due = match self.last_refresh {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.config.refresh_interval(),
        };
        if due {
            self.refresh_lows();
            self.last_refresh = Some(now);
        }
        true
    }

    fn refresh_lows(&mut self) {
        if self.history.len() > self.config.min_samples {
            let sorted = self.history.sorted_snapshot();
            (self.low_1, self.low_01) = percentile_lows(&sorted);
        } else {
            self.low_1 = 0.0;
            self.low_01 = 0.0;
        }
        tracing::trace!(
            fps = self.fps,
            low_1 = self.low_1,
            low_01 = self.low_01,
            samples = self.history.len(),
            "telemetry refreshed"
        );
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            fps: self.fps,
            low_1: self.low_1,
            low_01: self.low_01,
            samples: self.history.len(),
        }
    }
}
