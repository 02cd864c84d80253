//! Application-level configuration loading for the leaderboard server and the sync client.

use std::{collections::HashMap, env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::{info, warn};

use crate::game::{PuzzleSpec, default_catalog};

/// Default location on disk where binaries look for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "WEBVERSE_CONFIG_PATH";

/// Origins the hosted game front-ends are served from.
const DEFAULT_ALLOWED_ORIGINS: [&str; 7] = [
    "http://localhost:3000",
    "https://webverse-flame.vercel.app",
    "https://webverse-production.up.railway.app",
    "http://localhost:3001",
    "http://localhost:3002",
    "http://localhost:3003",
    "http://localhost:5173",
];

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    server: ServerConfig,
    client: ClientConfig,
    puzzle_answers: HashMap<String, String>,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        endpoints = app_config.client.endpoints.len(),
                        overrides = app_config.puzzle_answers.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Server-side settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Sync client settings.
    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    /// Built-in puzzle catalog with the configured answer overrides applied.
    ///
    /// Overrides are keyed by stage id; unknown ids are logged and ignored.
    pub fn puzzle_catalog(&self) -> Vec<PuzzleSpec> {
        let mut catalog = default_catalog();
        for (stage_id, answer) in &self.puzzle_answers {
            match catalog
                .iter_mut()
                .find(|spec| spec.stage.id() == stage_id.as_str())
            {
                Some(spec) => spec.rule = spec.rule.with_answer(answer),
                None => warn!(stage = %stage_id, "ignoring answer override for unknown stage"),
            }
        }
        catalog
    }
}

/// Settings for the HTTP leaderboard service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Maximum number of records returned by the leaderboard endpoint.
    pub leaderboard_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(String::from).to_vec(),
            leaderboard_limit: 50,
        }
    }
}

/// Settings for the leaderboard sync client.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URLs, primary first, each including the `/api` prefix.
    pub endpoints: Vec<String>,
    /// Per-request timeout.
    #[serde(rename = "request_timeout_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub request_timeout: Duration,
    /// Attempts per endpoint before moving to the next one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled after each failure.
    #[serde(rename = "retry_delay_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub retry_delay: Duration,
    /// File holding scores that still await submission.
    pub queue_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://localhost:5000/api".into()],
            request_timeout: Duration::from_secs(5),
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
            queue_path: PathBuf::from("pending-scores.json"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    server: ServerConfig,
    client: ClientConfig,
    puzzles: HashMap<String, RawPuzzle>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single puzzle override.
struct RawPuzzle {
    answer: String,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let puzzle_answers = value
            .puzzles
            .into_iter()
            .map(|(stage, puzzle)| (stage, puzzle.answer))
            .collect();
        Self {
            server: value.server,
            client: value.client,
            puzzle_answers,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
