use std::time::{Duration, Instant};

/// One-shot deadline timer driven by an externally supplied clock.
///
/// The gateway loop passes `Instant`s in rather than reading the clock here,
/// so tests can step time deterministically.
#[derive(Debug, Clone)]
pub struct Timer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, deadline: None }
    }

    /// Arm (or re-arm) the timer relative to `now`
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    /// True once the deadline has passed. A timer that was never started never expires.
    pub fn has_expired(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}
