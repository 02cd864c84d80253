//! Wire types and the HTTP transport used to reach the leaderboard service.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::ClientConfig;

use super::{SyncError, SyncResult};

const PLAYERS_PATH: &str = "players";
const LEADERBOARD_PATH: &str = "leaderboard";

/// Body of `POST /players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    /// Player name.
    pub name: String,
    /// Player department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
}

/// A player record as served by the leaderboard service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRecord {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Player name.
    pub name: String,
    /// Player department.
    pub department: String,
    /// Seconds the run took.
    pub time_taken: u32,
    /// Server-computed score.
    pub score: u32,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `{success, data, error}` envelope wrapping every API response.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Network seam of the sync engine.
pub trait LeaderboardTransport: Send + Sync {
    /// Submit a finished run and return the stored record.
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'static, SyncResult<LeaderboardRecord>>;

    /// Fetch the ranked leaderboard, best first.
    fn fetch(&self) -> BoxFuture<'static, SyncResult<Vec<LeaderboardRecord>>>;
}

/// Bounded exponential backoff applied per endpoint.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    const MAX_DELAY: Duration = Duration::from_secs(5);

    fn next_delay(current: Duration) -> Duration {
        (current * 2).min(Self::MAX_DELAY)
    }
}

/// [`LeaderboardTransport`] backed by `reqwest`, walking fallback endpoints in order.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoints: Arc<[Arc<str>]>,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> SyncResult<Self> {
        if config.endpoints.is_empty() {
            return Err(SyncError::NoEndpoint);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| SyncError::ClientBuilder { source })?;

        let endpoints = config
            .endpoints
            .iter()
            .map(|base| Arc::<str>::from(base.trim_end_matches('/')))
            .collect();

        Ok(Self {
            client,
            endpoints,
            retry: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                initial_delay: config.retry_delay,
            },
        })
    }

    async fn call<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&ScoreSubmission>,
    ) -> SyncResult<T>
    where
        T: DeserializeOwned,
    {
        let mut last_error = SyncError::NoEndpoint;

        for base in self.endpoints.iter() {
            let url = format!("{base}/{path}");
            let mut delay = self.retry.initial_delay;

            for attempt in 1..=self.retry.max_attempts {
                match self.request_once(method.clone(), &url, body).await {
                    Ok(value) => {
                        debug!(%url, attempt, "leaderboard request succeeded");
                        return Ok(value);
                    }
                    Err(err) if !err.is_transient() => return Err(err),
                    Err(err) => {
                        warn!(%url, attempt, error = %err, "leaderboard request failed");
                        last_error = err;
                        if attempt < self.retry.max_attempts {
                            sleep(delay).await;
                            delay = RetryPolicy::next_delay(delay);
                        }
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn request_once<T>(
        &self,
        method: Method,
        url: &str,
        body: Option<&ScoreSubmission>,
    ) -> SyncResult<T>
    where
        T: DeserializeOwned,
    {
        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| SyncError::from_reqwest(url, source))?;
        let status = response.status();
        let payload = response
            .bytes()
            .await
            .map_err(|source| SyncError::from_reqwest(url, source))?;

        decode_envelope(url, status, &payload)
    }
}

impl LeaderboardTransport for HttpTransport {
    fn submit(&self, submission: ScoreSubmission) -> BoxFuture<'static, SyncResult<LeaderboardRecord>> {
        let transport = self.clone();
        Box::pin(async move {
            transport
                .call(Method::POST, PLAYERS_PATH, Some(&submission))
                .await
        })
    }

    fn fetch(&self) -> BoxFuture<'static, SyncResult<Vec<LeaderboardRecord>>> {
        let transport = self.clone();
        Box::pin(async move { transport.call(Method::GET, LEADERBOARD_PATH, None).await })
    }
}

/// Unwrap the `{success, data}` envelope, classifying failures by status.
///
/// `404` and `405` mean the base URL does not serve the API, so they count against the endpoint
/// rather than the payload.
fn decode_envelope<T>(url: &str, status: StatusCode, payload: &[u8]) -> SyncResult<T>
where
    T: DeserializeOwned,
{
    let wrong_endpoint = matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
    );
    if status.is_client_error() && !wrong_endpoint {
        let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(payload)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| status.to_string());
        return Err(SyncError::Rejected { status, message });
    }
    if !status.is_success() {
        return Err(SyncError::Status {
            url: url.to_owned(),
            status,
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_slice(payload).map_err(|err| SyncError::Malformed {
            url: url.to_owned(),
            reason: err.to_string(),
        })?;

    match envelope {
        ApiEnvelope {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiEnvelope { error, .. } => Err(SyncError::Malformed {
            url: url.to_owned(),
            reason: error.unwrap_or_else(|| "response carries no data".into()),
        }),
    }
}
