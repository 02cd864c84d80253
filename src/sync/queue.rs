//! Scores awaiting confirmed submission, ordered by submission key.

use serde::{Deserialize, Serialize};

use crate::game::CompletedRun;

use super::transport::ScoreSubmission;

/// A finished run that the server has not acknowledged yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScore {
    /// Submission timestamp in milliseconds since the Unix epoch; unique within a queue.
    pub key: u64,
    /// Player name.
    pub name: String,
    /// Player department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
    /// Locally computed score, for display only.
    pub score: u32,
}

impl PendingScore {
    /// Wrap a completed run under `key`.
    pub fn from_run(key: u64, run: &CompletedRun) -> Self {
        Self {
            key,
            name: run.profile.name.clone(),
            department: run.profile.department.clone(),
            time_taken: run.time_taken,
            score: run.score,
        }
    }

    /// Request body sent to the server. The score is recomputed server-side.
    pub fn submission(&self) -> ScoreSubmission {
        ScoreSubmission {
            name: self.name.clone(),
            department: self.department.clone(),
            time_taken: self.time_taken,
        }
    }
}

/// Ordered queue of [`PendingScore`] entries, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingScoreQueue {
    entries: Vec<PendingScore>,
}

impl PendingScoreQueue {
    /// Insert `entry` in key order. Returns `false` when its key is already queued.
    pub fn push(&mut self, entry: PendingScore) -> bool {
        match self
            .entries
            .binary_search_by_key(&entry.key, |queued| queued.key)
        {
            Ok(_) => false,
            Err(index) => {
                self.entries.insert(index, entry);
                true
            }
        }
    }

    /// Remove the entry stored under `key`.
    pub fn remove(&mut self, key: u64) -> Option<PendingScore> {
        let index = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(index))
    }

    /// Whether an entry is stored under `key`.
    pub fn contains(&self, key: u64) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[PendingScore] {
        &self.entries
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A key not used by any queued entry, at least `now_ms`.
    pub fn next_key(&self, now_ms: u64) -> u64 {
        self.entries
            .last()
            .map_or(now_ms, |last| now_ms.max(last.key + 1))
    }
}
