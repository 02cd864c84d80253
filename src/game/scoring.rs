//! Score formula and leaderboard ordering shared by the client and the server.
//!
//! Both sides must produce identical numbers, so everything here is integer arithmetic with no
//! configuration knobs.

use std::cmp::Ordering;

/// Length of a full session, in seconds.
pub const SESSION_SECONDS: u32 = 600;

/// Best possible score (a run completed in zero seconds).
pub const MAX_SCORE: u32 = SESSION_SECONDS * 3 / 2;

/// Compute the score for a run that took `time_taken` seconds.
///
/// `floor((600 - t) * 1.5)`, evaluated as `(600 - t) * 3 / 2`. Times above the session length
/// are treated as the full session.
pub fn score(time_taken: u32) -> u32 {
    let remaining = SESSION_SECONDS - time_taken.min(SESSION_SECONDS);
    remaining * 3 / 2
}

/// Order two leaderboard rows given as `(score, time_taken)`.
///
/// Higher scores come first; equal scores are broken by the faster time.
pub fn leaderboard_order(a: (u32, u32), b: (u32, u32)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

/// Render a number of seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
