use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "OK" while the process answers.
    pub status: String,
    /// Storage connectivity ("Connected" or "Disconnected").
    pub database: String,
}

impl HealthResponse {
    /// Storage is reachable.
    pub fn connected() -> Self {
        Self {
            status: "OK".to_string(),
            database: "Connected".to_string(),
        }
    }

    /// The backend runs in degraded mode without storage.
    pub fn disconnected() -> Self {
        Self {
            status: "OK".to_string(),
            database: "Disconnected".to_string(),
        }
    }
}
