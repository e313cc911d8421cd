//! Wall-clock frame timing

use std::time::{Duration, Instant};

/// Measures the time between frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { started: now, last: now }
    }

    /// Seconds since the previous call (or since creation)
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
