//! Stage sequence and the generic puzzle stage.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::throttle::{AttemptThrottle, IgnoreReason, PuzzleAttemptState, SubmitOutcome, Verdict};

/// Pages of the game, in the order the player visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Name and department entry.
    Home,
    /// Logic gate expression.
    Game,
    /// Emoji phrase.
    Emoji,
    /// Code hidden in the page source.
    Inspect,
    /// Caesar cipher.
    Caesar,
    /// Binary to ASCII digit.
    Ascii,
    /// Executable file extensions.
    Extension,
    /// Final access code.
    Secure,
    /// Results and rankings.
    Leaderboard,
}

impl Stage {
    /// Every stage in visiting order.
    pub const ORDER: [Stage; 9] = [
        Stage::Home,
        Stage::Game,
        Stage::Emoji,
        Stage::Inspect,
        Stage::Caesar,
        Stage::Ascii,
        Stage::Extension,
        Stage::Secure,
        Stage::Leaderboard,
    ];

    /// First stage covered by the session clock.
    pub const FIRST_PUZZLE: Stage = Stage::Game;
    /// Last stage covered by the session clock.
    pub const LAST_PUZZLE: Stage = Stage::Secure;

    /// Whether the session clock runs while this stage is displayed.
    pub fn in_puzzle_window(self) -> bool {
        (Self::FIRST_PUZZLE..=Self::LAST_PUZZLE).contains(&self)
    }

    /// Stage shown after this one, if any.
    pub fn next(self) -> Option<Stage> {
        let index = Self::ORDER.iter().position(|stage| *stage == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    /// Stable identifier used in configuration files.
    pub fn id(self) -> &'static str {
        match self {
            Stage::Home => "home",
            Stage::Game => "game",
            Stage::Emoji => "emoji",
            Stage::Inspect => "inspect",
            Stage::Caesar => "caesar",
            Stage::Ascii => "ascii",
            Stage::Extension => "extension",
            Stage::Secure => "secure",
            Stage::Leaderboard => "leaderboard",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How a candidate is normalized before the exact comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "answer", rename_all = "snake_case")]
pub enum AnswerRule {
    /// Byte-for-byte comparison of a single field.
    Exact(String),
    /// Single field, surrounding whitespace removed.
    Trimmed(String),
    /// Single field, trimmed and lowercased.
    TrimmedIgnoreCase(String),
    /// One field per word, each trimmed and lowercased.
    Words(Vec<String>),
}

impl AnswerRule {
    /// Judge the candidate fields against the literal.
    pub fn judge(&self, fields: &[&str]) -> Verdict {
        let matched = match (self, fields) {
            (AnswerRule::Exact(answer), [candidate]) => *candidate == answer.as_str(),
            (AnswerRule::Trimmed(answer), [candidate]) => candidate.trim() == answer.as_str(),
            (AnswerRule::TrimmedIgnoreCase(answer), [candidate]) => {
                candidate.trim().to_lowercase() == *answer
            }
            (AnswerRule::Words(words), candidates) => {
                words.len() == candidates.len()
                    && words
                        .iter()
                        .zip(candidates)
                        .all(|(word, candidate)| candidate.trim().to_lowercase() == *word)
            }
            _ => false,
        };

        if matched {
            Verdict::Correct
        } else {
            Verdict::Wrong
        }
    }

    /// Replace the literal while keeping the normalization.
    pub fn with_answer(&self, answer: &str) -> AnswerRule {
        match self {
            AnswerRule::Exact(_) => AnswerRule::Exact(answer.to_owned()),
            AnswerRule::Trimmed(_) => AnswerRule::Trimmed(answer.trim().to_owned()),
            AnswerRule::TrimmedIgnoreCase(_) => {
                AnswerRule::TrimmedIgnoreCase(answer.trim().to_lowercase())
            }
            AnswerRule::Words(_) => AnswerRule::Words(
                answer
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect(),
            ),
        }
    }
}

/// Static description of a puzzle: where it sits and how it is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSpec {
    /// Stage the puzzle is shown on.
    pub stage: Stage,
    /// Heading shown to the player.
    pub title: &'static str,
    /// Answer check.
    pub rule: AnswerRule,
}

/// Built-in puzzles, one per stage of the puzzle window.
pub fn default_catalog() -> Vec<PuzzleSpec> {
    vec![
        PuzzleSpec {
            stage: Stage::Game,
            title: "Logic Gate Puzzle",
            rule: AnswerRule::Exact("1".into()),
        },
        PuzzleSpec {
            stage: Stage::Emoji,
            title: "Emoji Riddle Puzzle",
            rule: AnswerRule::Words(vec!["run".into(), "on".into(), "web".into()]),
        },
        PuzzleSpec {
            stage: Stage::Inspect,
            title: "Inspect Till You Suspect",
            rule: AnswerRule::Trimmed("2".into()),
        },
        PuzzleSpec {
            stage: Stage::Caesar,
            title: "Caesar Cipher Decryption Quiz",
            rule: AnswerRule::TrimmedIgnoreCase("zero".into()),
        },
        PuzzleSpec {
            stage: Stage::Ascii,
            title: "Binary Decoder",
            rule: AnswerRule::Trimmed("2".into()),
        },
        PuzzleSpec {
            stage: Stage::Extension,
            title: "Extension Decoding Challenge",
            rule: AnswerRule::Trimmed("5".into()),
        },
        PuzzleSpec {
            stage: Stage::Secure,
            title: "Secure Access",
            rule: AnswerRule::TrimmedIgnoreCase("webverse".into()),
        },
    ]
}

/// A puzzle on screen together with its own attempt throttle.
#[derive(Debug, Clone)]
pub struct PuzzleStage {
    spec: PuzzleSpec,
    throttle: AttemptThrottle,
}

impl PuzzleStage {
    /// Mount a puzzle with a fresh throttle.
    pub fn new(spec: PuzzleSpec) -> Self {
        Self {
            spec,
            throttle: AttemptThrottle::new(),
        }
    }

    /// Stage this puzzle belongs to.
    pub fn stage(&self) -> Stage {
        self.spec.stage
    }

    /// Submit the candidate fields while the session has `session_remaining` seconds.
    pub fn submit(&mut self, fields: &[&str], session_remaining: u32) -> SubmitOutcome {
        if let Some(reason) = self.throttle.ignore_reason(session_remaining) {
            return SubmitOutcome::Ignored(reason);
        }
        // Word riddles have no blank guard: an empty guess costs an attempt.
        let blank = fields.iter().all(|field| field.trim().is_empty());
        if blank && !matches!(self.spec.rule, AnswerRule::Words(_)) {
            return SubmitOutcome::Ignored(IgnoreReason::Blank);
        }

        let verdict = self.spec.rule.judge(fields);
        self.throttle.submit(verdict, session_remaining)
    }

    /// Mutable access to the throttle, for clock fan-out.
    pub(crate) fn throttle_mut(&mut self) -> &mut AttemptThrottle {
        &mut self.throttle
    }

    /// Attempt throttle backing this stage.
    pub fn throttle(&self) -> &AttemptThrottle {
        &self.throttle
    }

    /// Observable attempt state.
    pub fn attempt_state(&self) -> PuzzleAttemptState {
        self.throttle.state()
    }

    /// Whether the puzzle has been solved.
    pub fn is_solved(&self) -> bool {
        self.throttle.is_solved()
    }
}
