use std::time::{Duration, Instant};

/// A rate limiting gate. An event is accepted only if at least `interval`
/// has passed since the last accepted event. Rejected events are dropped,
/// never queued.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Sets a new interval and returns self for method chaining
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Checks if an event arriving at `now` would be accepted
    pub fn would_accept(&self, now: Instant) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Accepts the event if the gate is open, recording it as the last
    /// accepted event.
    pub fn try_accept_at(&mut self, now: Instant) -> bool {
        if !self.would_accept(now) {
            return false;
        }

        self.last_accepted = Some(now);
        true
    }
}
