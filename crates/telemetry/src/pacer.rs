use crate::clock::Clock;
use std::time::Duration;

/// Timing of one paced tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Time since the previous tick, after any pacing delay.
    pub dt: Duration,
    /// Clock time at the end of this tick's pacing.
    pub now: Duration,
    /// Delay inserted to honor the rate cap.
    pub slept: Duration,
}

impl FrameTick {
    pub fn dt_seconds(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    /// Kept in `f64`; narrow only after reducing to a phase.
    pub fn elapsed_seconds(&self) -> f64 {
        self.now.as_secs_f64()
    }
}

/// Measures time between ticks and sleeps to stay under a rate cap.
#[derive(Debug, Clone)]
pub struct FramePacer {
    last: Duration,
}

impl FramePacer {
    /// Start pacing from the clock's current time.
    pub fn new(clock: &impl Clock) -> Self {
        Self { last: clock.now() }
    }

    /// Close the current frame.
    ///
    /// With a `budget`, sleeps until at least `budget` has passed since the
    /// previous tick. `None` never throttles. A clock that ran backwards
    /// yields a zero `dt`.
    pub fn tick(&mut self, clock: &mut impl Clock, budget: Option<Duration>) -> FrameTick {
        let elapsed = clock.now().saturating_sub(self.last);
        let slept = match budget {
            Some(budget) if elapsed < budget => {
                let remaining = budget - elapsed;
                clock.sleep(remaining);
                remaining
            }
            _ => Duration::ZERO,
        };

        let now = clock.now();
        let dt = now.saturating_sub(self.last);
        self.last = now;
        tracing::trace!(dt_us = dt.as_micros() as u64, slept_us = slept.as_micros() as u64, "frame paced");
        FrameTick { dt, now, slept }
    }
}
