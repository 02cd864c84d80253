use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report storage connectivity, logging failed pings.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_score_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
                return HealthResponse::disconnected();
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::disconnected()
    } else {
        HealthResponse::connected()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::score_store::memory::MemoryScoreStore, state::AppState,
    };

    #[tokio::test]
    async fn reports_database_connectivity() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.database, "Disconnected");

        let store = MemoryScoreStore::new();
        state.set_score_store(Arc::new(store.clone())).await;
        let health = health_status(&state).await;
        assert_eq!(health.status, "OK");
        assert_eq!(health.database, "Connected");

        store.set_available(false);
        assert_eq!(health_status(&state).await.database, "Disconnected");
    }
}
