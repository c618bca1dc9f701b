use std::time::{Duration, Instant};

/// Monotonic process clock. Core logic works on offsets from `start`
/// so tests can hand in synthetic timestamps.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time elapsed since the clock started
    pub fn now(&self) -> Duration {
        self.start.elapsed()
    }

    /// Wall instant for an offset, for handing deadlines to the event loop
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.start + offset
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
