//! Rank annotation of fetched leaderboard records.

use serde::Serialize;

use crate::game::scoring::format_clock;

use super::transport::LeaderboardRecord;

/// A leaderboard row ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// One-based position.
    pub rank: u32,
    /// Player name.
    pub name: String,
    /// Player department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
    /// Server-computed score.
    pub score: u32,
    /// Whether this row belongs to the player on this device.
    pub is_current_player: bool,
}

impl RankedEntry {
    /// Time taken rendered as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.time_taken)
    }
}

/// Identifies the local player's row. Names alone are not unique, so the time is compared too.
#[derive(Debug, Clone, Copy)]
pub struct PlayerMatch<'a> {
    /// Player name.
    pub name: &'a str,
    /// Seconds the run took.
    pub time_taken: u32,
}

impl PlayerMatch<'_> {
    fn matches(&self, record: &LeaderboardRecord) -> bool {
        record.name == self.name && record.time_taken == self.time_taken
    }
}

/// Number the records in server order and flag the local player's rows.
///
/// Returns the rows and the rank of the first row matching `current`.
pub fn annotate(
    records: Vec<LeaderboardRecord>,
    current: Option<PlayerMatch<'_>>,
) -> (Vec<RankedEntry>, Option<u32>) {
    let mut player_rank = None;
    let entries = records
        .into_iter()
        .zip(1u32..)
        .map(|(record, rank)| {
            let is_current_player = current.is_some_and(|player| player.matches(&record));
            if is_current_player && player_rank.is_none() {
                player_rank = Some(rank);
            }
            RankedEntry {
                rank,
                name: record.name,
                department: record.department,
                time_taken: record.time_taken,
                score: record.score,
                is_current_player,
            }
        })
        .collect();

    (entries, player_rank)
}
