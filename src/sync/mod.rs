//! Client-side leaderboard synchronisation: offline queue, bounded retries, ranked views.

pub mod engine;
pub mod environment;
pub mod queue;
pub mod rank;
pub mod transport;

use reqwest::StatusCode;
use thiserror::Error;

pub use engine::{CycleHandle, LeaderboardSync, LeaderboardView, Notice, OwnResult};
pub use environment::{EnvironmentError, FileEnvironment, MemoryEnvironment, SyncEnvironment};
pub use queue::{PendingScore, PendingScoreQueue};
pub use rank::{RankedEntry, annotate};
pub use transport::{HttpTransport, LeaderboardRecord, LeaderboardTransport, ScoreSubmission};

/// Convenient result alias returning [`SyncError`] failures.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures crossing the sync boundary.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No base URL is configured.
    #[error("no leaderboard endpoint configured")]
    NoEndpoint,
    /// Building the HTTP client failed.
    #[error("failed to build leaderboard HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or its body could not be read.
    #[error("request to `{url}` failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The request timed out.
    #[error("request to `{url}` timed out")]
    Timeout { url: String },
    /// The server answered with an unexpected status.
    #[error("unexpected status {status} from `{url}`")]
    Status { url: String, status: StatusCode },
    /// The server refused the payload; retrying the same payload will not help.
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    /// The response body was not the expected envelope.
    #[error("malformed response from `{url}`: {reason}")]
    Malformed { url: String, reason: String },
    /// The load cycle was aborted by its owner.
    #[error("sync cycle cancelled")]
    Cancelled,
}

impl SyncError {
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            SyncError::Timeout {
                url: url.to_owned(),
            }
        } else {
            SyncError::Network {
                url: url.to_owned(),
                source,
            }
        }
    }

    /// Whether the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SyncError::Network { .. }
                | SyncError::Timeout { .. }
                | SyncError::Status { .. }
                | SyncError::Malformed { .. }
        )
    }
}
