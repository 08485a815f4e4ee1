//! Cancel-and-replace debounce on an external clock.

use crate::constants::GEOMETRY_DEBOUNCE_MS;

#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    interval: f64,
    deadline: Option<f64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(GEOMETRY_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Record a signal at `now`, replacing any pending deadline. Returns the
    /// delay a timer should be armed with.
    pub fn signal(&mut self, now: f64) -> f64 {
        self.deadline = Some(now + self.interval);
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Polling form: fire once the quiet period since the last signal elapsed.
    pub fn due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Timer form: the caller's cancel-and-replace timer already enforced the
    /// interval, so just consume the pending signal.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
