//! One-second countdown primitive used by puzzle lockouts.

/// Emitted by [`LockoutTimer::tick`] when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired;

/// Restartable countdown with one-second granularity.
///
/// The timer never goes below zero and reports expiry exactly once per `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockoutTimer {
    remaining: u32,
}

impl LockoutTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown of `seconds`, replacing any countdown already running.
    ///
    /// Starting with zero leaves the timer idle.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Option<Expired> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        (self.remaining == 0).then_some(Expired)
    }

    /// Seconds left before expiry.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }
}
