//! Self-contained timers over clock offsets. Each owns its schedule and
//! decides when to fire from the `now` it is handed.

use std::time::Duration;

/// Fixed cadence timer - one fire per due period, missed periods are dropped
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    period: Duration,
    next: Duration,
}

impl FixedInterval {
    /// First fire at `start`, then every `period`
    pub fn new(period: Duration, start: Duration) -> Self {
        Self { period, next: start }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Next time this timer wants to run
    pub fn deadline(&self) -> Duration {
        self.next
    }

    /// Returns true at most once per call if a deadline has passed.
    /// A stalled caller gets a single fire, not a burst of catch-up ticks.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next {
            return false;
        }

        let missed = (now - self.next).as_nanos() / self.period.as_nanos().max(1);
        let skip = u32::try_from(missed + 1).unwrap_or(u32::MAX);
        self.next += self.period.saturating_mul(skip);
        true
    }
}

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: Duration,
    last_fire: Option<Duration>,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fire: None, // Allow immediate first tick
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, now: Duration) -> bool {
        let ready = match self.last_fire {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.min_interval,
        };

        if ready {
            self.last_fire = Some(now);
        }
        ready
    }
}
