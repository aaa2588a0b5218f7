use std::time::{Duration, Instant};

/// Monotonic time source the run loop reads. Injected so pacing and
/// telemetry can be driven deterministically.
pub trait Clock {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
    slept: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate `duration` of work.
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }

    /// Jump to an absolute time, possibly backwards (clock anomaly).
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Total time spent in `sleep`.
    pub fn slept(&self) -> Duration {
        self.slept
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.slept += duration;
    }
}
