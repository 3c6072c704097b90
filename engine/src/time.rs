use std::time::Duration;

/// Accumulated simulation time, advanced once per frame by the host loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the clock was created
    pub total: f32,
    /// Duration of the last frame in seconds
    pub elapsed: f32,
    pub frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_seconds`. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta_seconds: f32) -> f32 {
        let delta = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };
        self.elapsed = delta;
        self.total += delta;
        self.frame += 1;
        delta
    }

    pub fn advance_duration(&mut self, delta: Duration) -> f32 {
        self.advance(delta.as_secs_f32())
    }

    /// Seconds elapsed since `timestamp`, which was read from `total` earlier.
    pub fn since(&self, timestamp: f32) -> f32 {
        self.total - timestamp
    }
}
