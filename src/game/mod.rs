//! Puzzle-game core: attempt throttling, the session clock, and scoring.

pub mod clock;
pub mod lockout;
pub mod run;
pub mod scoring;
pub mod session;
pub mod stage;
pub mod throttle;

use thiserror::Error;

pub use run::{Advance, CompletedRun, GameRun, PlayerProfile, RunEvent};
pub use stage::{AnswerRule, PuzzleSpec, PuzzleStage, Stage, default_catalog};
pub use throttle::{AttemptThrottle, PuzzleAttemptState, SubmitOutcome, Verdict};

/// Errors raised when a run is driven out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No profile has been registered yet.
    #[error("the game has not started")]
    NotStarted,
    /// A profile was already registered for this run.
    #[error("the game has already started")]
    AlreadyStarted,
    /// Profile input was rejected.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    /// The displayed puzzle is still unsolved.
    #[error("puzzle `{0}` is not solved yet")]
    NotSolved(Stage),
    /// The session clock reached zero.
    #[error("time's up")]
    TimeExpired,
    /// The run already reached the leaderboard.
    #[error("the run is already finished")]
    Finished,
}
