//! A single play-through: profile entry, the timed puzzle sequence, and completion.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{
    GameError,
    scoring::score,
    session::{SessionSnapshot, SessionTimer},
    stage::{PuzzleSpec, PuzzleStage, Stage},
    throttle::{IgnoreReason, SubmitOutcome},
};

/// Who is playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Full name.
    pub name: String,
    /// Class or department.
    pub department: String,
}

impl PlayerProfile {
    /// Build a profile from raw form input, trimming both fields.
    pub fn new(name: &str, department: &str) -> Result<Self, GameError> {
        let name = name.trim();
        let department = department.trim();
        if name.is_empty() || department.is_empty() {
            return Err(GameError::InvalidProfile(
                "name and department are both required".into(),
            ));
        }

        Ok(Self {
            name: name.to_owned(),
            department: department.to_owned(),
        })
    }
}

/// Result of a run that reached the end of the puzzle sequence in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    /// Player who finished.
    pub profile: PlayerProfile,
    /// Seconds spent in the puzzle window.
    pub time_taken: u32,
    /// Score derived from `time_taken`.
    pub score: u32,
}

/// Result of [`GameRun::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the next puzzle.
    Next(Stage),
    /// The final puzzle was cleared; the run is over.
    Completed(CompletedRun),
}

/// Things that happened during one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// A puzzle's lockout ended.
    Unblocked(Stage),
    /// The session ran out of time.
    SessionExpired,
}

/// Orchestrates the stage sequence for one player.
#[derive(Debug)]
pub struct GameRun {
    stage: Stage,
    profile: Option<PlayerProfile>,
    session: SessionTimer,
    puzzles: Vec<PuzzleStage>,
    completed: bool,
}

impl GameRun {
    /// Prepare a run over `catalog`, showing the home stage.
    pub fn new(catalog: Vec<PuzzleSpec>) -> Self {
        Self {
            stage: Stage::Home,
            profile: None,
            session: SessionTimer::new(),
            puzzles: catalog.into_iter().map(PuzzleStage::new).collect(),
            completed: false,
        }
    }

    /// Register the player and start the session on the first puzzle.
    pub fn start(&mut self, profile: PlayerProfile) -> Result<(), GameError> {
        if self.stage != Stage::Home {
            return Err(GameError::AlreadyStarted);
        }

        info!(name = %profile.name, department = %profile.department, "session started");
        self.profile = Some(profile);
        self.session.start();
        self.stage = Stage::FIRST_PUZZLE;
        Ok(())
    }

    /// Submit an answer to the puzzle currently displayed.
    ///
    /// Submissions outside a puzzle stage, or after the session expired, are ignored.
    pub fn submit(&mut self, fields: &[&str]) -> SubmitOutcome {
        let remaining = self.session.remaining();
        let stage = self.stage;
        let Some(puzzle) = self.current_puzzle_mut() else {
            return SubmitOutcome::Ignored(IgnoreReason::NotPlaying);
        };

        let outcome = puzzle.submit(fields, remaining);
        debug!(%stage, ?outcome, "answer submitted");
        outcome
    }

    /// Move past the current puzzle once it is solved.
    pub fn advance(&mut self) -> Result<Advance, GameError> {
        if self.completed {
            return Err(GameError::Finished);
        }
        if self.profile.is_none() {
            return Err(GameError::NotStarted);
        }
        if self.session.is_expired() {
            return Err(GameError::TimeExpired);
        }

        let solved = self
            .current_puzzle()
            .map(PuzzleStage::is_solved)
            .unwrap_or(false);
        if !solved {
            return Err(GameError::NotSolved(self.stage));
        }

        if self.stage == Stage::LAST_PUZZLE {
            return self.complete().map(Advance::Completed);
        }

        let next = self.stage.next().ok_or(GameError::Finished)?;
        self.stage = next;
        Ok(Advance::Next(next))
    }

    /// Advance every timer by one second.
    pub fn tick(&mut self) -> Vec<RunEvent> {
        let mut events = Vec::new();

        if self.session.tick(self.stage.in_puzzle_window()).is_some() {
            info!(stage = %self.stage, "session expired");
            events.push(RunEvent::SessionExpired);
        }

        for puzzle in &mut self.puzzles {
            if puzzle.throttle_mut().tick().is_some() {
                events.push(RunEvent::Unblocked(puzzle.stage()));
            }
        }

        events
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.current_puzzle().is_some_and(|puzzle| {
            puzzle
                .throttle()
                .ignore_reason(self.session.remaining())
                .is_none()
        })
    }

    /// Whether the "next" control is enabled.
    pub fn can_advance(&self) -> bool {
        !self.completed
            && !self.session.is_expired()
            && self.current_puzzle().is_some_and(PuzzleStage::is_solved)
    }

    /// Stage currently displayed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Puzzle currently displayed, if the stage has one.
    pub fn current_puzzle(&self) -> Option<&PuzzleStage> {
        self.puzzles
            .iter()
            .find(|puzzle| puzzle.stage() == self.stage)
    }

    /// Registered player, once started.
    pub fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    /// Seconds left in the session.
    pub fn remaining(&self) -> u32 {
        self.session.remaining()
    }

    /// Current session snapshot.
    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Subscribe to session clock updates.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }

    /// Whether the clock no longer needs driving.
    pub fn is_over(&self) -> bool {
        self.completed || self.session.is_expired()
    }

    fn current_puzzle_mut(&mut self) -> Option<&mut PuzzleStage> {
        let stage = self.stage;
        self.puzzles
            .iter_mut()
            .find(|puzzle| puzzle.stage() == stage)
    }

    fn complete(&mut self) -> Result<CompletedRun, GameError> {
        let profile = self.profile.clone().ok_or(GameError::NotStarted)?;
        let time_taken = self.session.elapsed();
        self.session.stop();
        self.completed = true;
        self.stage = Stage::Leaderboard;

        let run = CompletedRun {
            profile,
            time_taken,
            score: score(time_taken),
        };
        info!(time_taken, score = run.score, "run completed");
        Ok(run)
    }
}
