use std::{cmp::Ordering, time::SystemTime};

use serde::{Deserialize, Serialize};

use crate::game::scoring::leaderboard_order;

/// A completed run persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier assigned on insert.
    pub id: String,
    /// Player name.
    pub name: String,
    /// Player class or department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
    /// Score computed server-side from `time_taken`.
    pub score: u32,
    /// Insert timestamp, used to break ties.
    pub created_at: SystemTime,
}

impl PlayerEntity {
    /// Leaderboard order: score descending, then time ascending, then earliest first.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        leaderboard_order(
            (self.score, self.time_taken),
            (other.score, other.time_taken),
        )
        .then_with(|| self.created_at.cmp(&other.created_at))
    }
}
