//! Attempt throttling shared by every puzzle stage.
//!
//! Three wrong answers in a row lock the puzzle for ten seconds. Every further consecutive wrong
//! answer locks it again for five seconds longer than the previous lockout. Lockout expiry
//! clears the visible attempt counter but not the escalation, which only a correct answer
//! resets.

use std::fmt;

use super::lockout::LockoutTimer;

/// Wrong answers accepted before the puzzle locks.
pub const MAX_ATTEMPTS: u32 = 3;
/// Lockout applied on the first block.
pub const BASE_LOCKOUT_SECS: u32 = 10;
/// Extra lockout per consecutive wrong answer past the third.
pub const LOCKOUT_STEP_SECS: u32 = 5;

/// Lockout length for the `failures`-th consecutive wrong answer.
///
/// Returns `None` below the threshold: 3 → 10 s, 4 → 15 s, 5 → 20 s, and so on without cap.
pub fn lockout_duration(failures: u32) -> Option<u32> {
    (failures >= MAX_ATTEMPTS)
        .then(|| BASE_LOCKOUT_SECS + LOCKOUT_STEP_SECS * (failures - MAX_ATTEMPTS))
}

/// Whether a candidate answer matched the puzzle's literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Exact match.
    Correct,
    /// Anything else.
    Wrong,
}

/// Why a submission was dropped without touching the attempt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A lockout is running.
    Blocked,
    /// The puzzle has already been solved.
    Solved,
    /// The session clock ran out.
    SessionExpired,
    /// The candidate was empty after trimming.
    Blank,
    /// No puzzle is on screen.
    NotPlaying,
}

/// Result of a call to [`AttemptThrottle::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was correct; the puzzle is now solved.
    Solved,
    /// The answer was wrong and the puzzle is still open.
    Rejected {
        /// Wrong answers left before the next lockout.
        attempts_left: u32,
    },
    /// The answer was wrong and triggered a lockout.
    Blocked {
        /// Length of the lockout.
        seconds: u32,
    },
    /// A precondition failed; nothing changed.
    Ignored(IgnoreReason),
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Solved => write!(f, "Correct! Well done!"),
            SubmitOutcome::Rejected { attempts_left } => {
                write!(f, "Incorrect. Attempts left: {attempts_left}")
            }
            SubmitOutcome::Blocked { seconds } => {
                write!(f, "Blocked for {seconds} seconds. Try again later!")
            }
            SubmitOutcome::Ignored(IgnoreReason::SessionExpired) => write!(f, "Time's up!"),
            SubmitOutcome::Ignored(IgnoreReason::Blocked) => write!(f, "Please wait"),
            SubmitOutcome::Ignored(_) => Ok(()),
        }
    }
}

/// Emitted by [`AttemptThrottle::tick`] when a lockout ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unblocked;

/// Observable state of a throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleAttemptState {
    /// Wrong answers since the last correct answer or lockout expiry.
    pub wrong_attempts: u32,
    /// Whether submissions are currently locked out.
    pub blocked: bool,
    /// Seconds left on the lockout.
    pub block_remaining: u32,
    /// Whether the puzzle has been solved.
    pub solved: bool,
}

/// Attempt counter and lockout state for a single puzzle.
#[derive(Debug, Clone, Default)]
pub struct AttemptThrottle {
    wrong_attempts: u32,
    consecutive_failures: u32,
    lockout: LockoutTimer,
    solved: bool,
}

impl AttemptThrottle {
    /// Create a fresh throttle with no attempts recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission judged as `verdict` while the session has `session_remaining` seconds.
    pub fn submit(&mut self, verdict: Verdict, session_remaining: u32) -> SubmitOutcome {
        if let Some(reason) = self.ignore_reason(session_remaining) {
            return SubmitOutcome::Ignored(reason);
        }

        match verdict {
            Verdict::Correct => {
                self.solved = true;
                self.wrong_attempts = 0;
                self.consecutive_failures = 0;
                SubmitOutcome::Solved
            }
            Verdict::Wrong => {
                self.wrong_attempts += 1;
                self.consecutive_failures += 1;

                match lockout_duration(self.consecutive_failures) {
                    Some(seconds) => {
                        self.lockout.start(seconds);
                        SubmitOutcome::Blocked { seconds }
                    }
                    None => SubmitOutcome::Rejected {
                        attempts_left: MAX_ATTEMPTS.saturating_sub(self.wrong_attempts),
                    },
                }
            }
        }
    }

    /// Advance the lockout by one second.
    pub fn tick(&mut self) -> Option<Unblocked> {
        self.lockout.tick().map(|_| {
            self.wrong_attempts = 0;
            Unblocked
        })
    }

    /// Reason a submission would be ignored right now, if any.
    pub fn ignore_reason(&self, session_remaining: u32) -> Option<IgnoreReason> {
        if self.solved {
            Some(IgnoreReason::Solved)
        } else if self.lockout.is_running() {
            Some(IgnoreReason::Blocked)
        } else if session_remaining == 0 {
            Some(IgnoreReason::SessionExpired)
        } else {
            None
        }
    }

    /// Wrong answers counted toward the next lockout.
    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    /// Number of filled attempt dots; the indicator never shows more than three.
    pub fn attempt_dots(&self) -> u32 {
        self.wrong_attempts.min(MAX_ATTEMPTS)
    }

    /// Whether a lockout is running.
    pub fn is_blocked(&self) -> bool {
        self.lockout.is_running()
    }

    /// Seconds left on the current lockout.
    pub fn block_remaining(&self) -> u32 {
        self.lockout.remaining()
    }

    /// Whether the puzzle has been solved.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Snapshot the observable state.
    pub fn state(&self) -> PuzzleAttemptState {
        PuzzleAttemptState {
            wrong_attempts: self.wrong_attempts,
            blocked: self.is_blocked(),
            block_remaining: self.block_remaining(),
            solved: self.solved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: u32 = 600;

    fn tick_n(throttle: &mut AttemptThrottle, n: u32) -> Vec<Unblocked> {
        (0..n).filter_map(|_| throttle.tick()).collect()
    }

    #[test]
    fn lockout_duration_grows_linearly() {
        assert_eq!(lockout_duration(0), None);
        assert_eq!(lockout_duration(2), None);
        assert_eq!(lockout_duration(3), Some(10));
        assert_eq!(lockout_duration(4), Some(15));
        assert_eq!(lockout_duration(5), Some(20));
        assert_eq!(lockout_duration(23), Some(110));
    }

    #[test]
    fn third_wrong_answer_blocks_for_ten_seconds() {
        let mut throttle = AttemptThrottle::new();

        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Rejected { attempts_left: 2 }
        );
        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Rejected { attempts_left: 1 }
        );
        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Blocked { seconds: 10 }
        );

        let state = throttle.state();
        assert!(state.blocked);
        assert_eq!(state.block_remaining, 10);
        assert_eq!(state.wrong_attempts, 3);
    }

    #[test]
    fn blocked_until_lockout_expires_then_counter_resets() {
        // Wrong answers at t=0,1,2; one tick per second afterwards.
        let mut throttle = AttemptThrottle::new();
        throttle.submit(Verdict::Wrong, FULL);
        throttle.tick();
        throttle.submit(Verdict::Wrong, FULL);
        throttle.tick();
        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Blocked { seconds: 10 }
        );

        // t=3..=11: still blocked.
        assert!(tick_n(&mut throttle, 9).is_empty());
        assert!(throttle.is_blocked());
        assert_eq!(
            throttle.submit(Verdict::Correct, FULL),
            SubmitOutcome::Ignored(IgnoreReason::Blocked)
        );

        // t=12: unblocked.
        assert_eq!(throttle.tick(), Some(Unblocked));
        let state = throttle.state();
        assert!(!state.blocked);
        assert_eq!(state.block_remaining, 0);
        assert_eq!(state.wrong_attempts, 0);
        assert!(!state.solved);
    }

    #[test]
    fn escalation_survives_lockout_expiry() {
        let mut throttle = AttemptThrottle::new();
        for _ in 0..3 {
            throttle.submit(Verdict::Wrong, FULL);
        }
        tick_n(&mut throttle, 10);

        assert_eq!(throttle.wrong_attempts(), 0);

        // Fourth consecutive miss: locked again, five seconds longer.
        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Blocked { seconds: 15 }
        );
        assert_eq!(throttle.wrong_attempts(), 1);
        tick_n(&mut throttle, 15);

        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Blocked { seconds: 20 }
        );
    }

    #[test]
    fn correct_answer_resets_escalation() {
        let mut throttle = AttemptThrottle::new();
        for _ in 0..3 {
            throttle.submit(Verdict::Wrong, FULL);
        }
        tick_n(&mut throttle, 10);
        assert_eq!(throttle.submit(Verdict::Correct, FULL), SubmitOutcome::Solved);
        assert_eq!(throttle.wrong_attempts(), 0);
        assert!(!throttle.is_blocked());
    }

    #[test]
    fn correct_answer_after_two_misses_never_blocks() {
        let mut throttle = AttemptThrottle::new();
        throttle.submit(Verdict::Wrong, FULL);
        throttle.submit(Verdict::Wrong, FULL);
        assert_eq!(throttle.wrong_attempts(), 2);

        assert_eq!(throttle.submit(Verdict::Correct, FULL), SubmitOutcome::Solved);
        let state = throttle.state();
        assert_eq!(state.wrong_attempts, 0);
        assert!(!state.blocked);
        assert!(state.solved);
    }

    #[test]
    fn solved_is_terminal() {
        let mut throttle = AttemptThrottle::new();
        throttle.submit(Verdict::Correct, FULL);

        assert_eq!(
            throttle.submit(Verdict::Wrong, FULL),
            SubmitOutcome::Ignored(IgnoreReason::Solved)
        );
        assert_eq!(
            throttle.submit(Verdict::Correct, FULL),
            SubmitOutcome::Ignored(IgnoreReason::Solved)
        );
        assert!(throttle.is_solved());
        assert_eq!(throttle.wrong_attempts(), 0);
    }

    #[test]
    fn expired_session_ignores_submissions() {
        let mut throttle = AttemptThrottle::new();
        assert_eq!(
            throttle.submit(Verdict::Correct, 0),
            SubmitOutcome::Ignored(IgnoreReason::SessionExpired)
        );
        assert_eq!(
            throttle.submit(Verdict::Wrong, 0),
            SubmitOutcome::Ignored(IgnoreReason::SessionExpired)
        );
        assert_eq!(throttle.state().wrong_attempts, 0);
        assert!(!throttle.is_solved());
    }

    #[test]
    fn blocked_invariant_tracks_remaining_time() {
        let mut throttle = AttemptThrottle::new();
        for _ in 0..3 {
            throttle.submit(Verdict::Wrong, FULL);
        }
        for _ in 0..12 {
            let state = throttle.state();
            assert_eq!(state.blocked, state.block_remaining > 0);
            throttle.tick();
        }
    }

    #[test]
    fn dots_are_capped_at_three() {
        let throttle = AttemptThrottle {
            wrong_attempts: 7,
            ..AttemptThrottle::default()
        };
        assert_eq!(throttle.attempt_dots(), 3);
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            SubmitOutcome::Rejected { attempts_left: 1 }.to_string(),
            "Incorrect. Attempts left: 1"
        );
        assert_eq!(
            SubmitOutcome::Blocked { seconds: 15 }.to_string(),
            "Blocked for 15 seconds. Try again later!"
        );
    }
}
