use std::time::Instant;

/// Frame clock: animation timestamp plus per-frame delta
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    last_timestamp_ms: f64,
}

impl FrameClock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            last_timestamp_ms: 0.0,
        }
    }

    /// Milliseconds since the clock started, never decreasing
    pub fn timestamp_ms(&mut self) -> f64 {
        let elapsed = self.start.elapsed().as_secs_f64() * 1000.0;
        self.last_timestamp_ms = self.last_timestamp_ms.max(elapsed);
        self.last_timestamp_ms
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
