//! The 600-second session countdown and its broadcast snapshots.

use tokio::sync::watch;

use super::scoring::SESSION_SECONDS;

/// Point-in-time view of the session clock published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Seconds left in the session.
    pub remaining: u32,
    /// Whether the countdown is running.
    pub active: bool,
}

impl SessionSnapshot {
    /// Whether the session ran out of time.
    pub fn expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Emitted by [`SessionTimer::tick`] on the tick that reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionExpired;

/// Session countdown gating every puzzle stage.
///
/// Subscribers receive a [`SessionSnapshot`] after every change through a watch channel, so a
/// single clock drives every display instead of one timer per screen.
#[derive(Debug)]
pub struct SessionTimer {
    remaining: u32,
    active: bool,
    updates: watch::Sender<SessionSnapshot>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    /// Create an inactive timer holding the full session length.
    pub fn new() -> Self {
        let (updates, _rx) = watch::channel(SessionSnapshot {
            remaining: SESSION_SECONDS,
            active: false,
        });
        Self {
            remaining: SESSION_SECONDS,
            active: false,
            updates,
        }
    }

    /// Begin a fresh session with the full countdown.
    pub fn start(&mut self) {
        self.remaining = SESSION_SECONDS;
        self.active = true;
        self.publish();
    }

    /// Stop the countdown without touching the remaining time.
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.publish();
        }
    }

    /// Advance one second if the session is active and the displayed stage is timed.
    pub fn tick(&mut self, in_puzzle_window: bool) -> Option<SessionExpired> {
        if !self.active || !in_puzzle_window || self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let expired = self.remaining == 0;
        if expired {
            self.active = false;
        }
        self.publish();

        expired.then_some(SessionExpired)
    }

    /// Seconds left in the session.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds spent so far.
    pub fn elapsed(&self) -> u32 {
        SESSION_SECONDS - self.remaining
    }

    /// Whether the countdown is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the session ran out of time.
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            remaining: self.remaining,
            active: self.active,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_timer_does_not_tick() {
        let mut timer = SessionTimer::new();
        assert_eq!(timer.tick(true), None);
        assert_eq!(timer.remaining(), 600);
    }

    #[test]
    fn ticks_only_inside_puzzle_window() {
        let mut timer = SessionTimer::new();
        timer.start();
        timer.tick(true);
        timer.tick(false);
        timer.tick(true);
        assert_eq!(timer.remaining(), 598);
        assert_eq!(timer.elapsed(), 2);
    }

    #[test]
    fn expiry_freezes_at_zero() {
        let mut timer = SessionTimer::new();
        timer.start();
        let mut expiries = 0;
        for _ in 0..700 {
            if timer.tick(true).is_some() {
                expiries += 1;
            }
        }
        assert_eq!(expiries, 1);
        assert_eq!(timer.remaining(), 0);
        assert!(timer.is_expired());
        assert!(!timer.is_active());
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut timer = SessionTimer::new();
        let mut rx = timer.subscribe();
        assert!(!rx.borrow_and_update().active);

        timer.start();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            SessionSnapshot {
                remaining: 600,
                active: true
            }
        );

        timer.tick(true);
        assert_eq!(rx.borrow_and_update().remaining, 599);

        timer.stop();
        assert!(!rx.borrow_and_update().active);
    }

    #[test]
    fn restart_resets_countdown() {
        let mut timer = SessionTimer::new();
        timer.start();
        for _ in 0..10 {
            timer.tick(true);
        }
        timer.start();
        assert_eq!(timer.remaining(), 600);
    }
}
