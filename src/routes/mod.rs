use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod leaderboard;
pub mod players;

/// Prefix under which the game API is served.
pub const API_PREFIX: &str = "/api";

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = players::router().merge(leaderboard::router());

    health::router()
        .nest(API_PREFIX, api_router)
        .merge(docs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Arc, time::Duration};

    use tokio::net::TcpListener;

    use super::*;
    use crate::{
        config::{AppConfig, ClientConfig},
        dao::score_store::memory::MemoryScoreStore,
        game::{CompletedRun, PlayerProfile, scoring},
        state::AppState,
        sync::{
            HttpTransport, LeaderboardSync, LeaderboardTransport, MemoryEnvironment,
            ScoreSubmission, SyncError,
        },
    };

    async fn spawn_server() -> SocketAddr {
        let state = AppState::new(AppConfig::default());
        state.set_score_store(Arc::new(MemoryScoreStore::new())).await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        addr
    }

    fn client_config(endpoints: Vec<String>) -> ClientConfig {
        ClientConfig {
            endpoints,
            request_timeout: Duration::from_secs(2),
            max_attempts: 1,
            retry_delay: Duration::from_millis(10),
            ..ClientConfig::default()
        }
    }

    fn completed(name: &str, time_taken: u32) -> CompletedRun {
        CompletedRun {
            profile: PlayerProfile::new(name, "CS").unwrap(),
            time_taken,
            score: scoring::score(time_taken),
        }
    }

    #[tokio::test]
    async fn sync_client_submits_and_ranks_against_live_server() {
        let addr = spawn_server().await;
        let config = client_config(vec![format!("http://{addr}{API_PREFIX}")]);
        let transport = Arc::new(HttpTransport::new(&config).unwrap());

        transport
            .submit(ScoreSubmission {
                name: "Grace".into(),
                department: "EE".into(),
                time_taken: 400,
            })
            .await
            .unwrap();

        let environment = Arc::new(MemoryEnvironment::default());
        let mut sync = LeaderboardSync::new(transport, environment.clone());
        sync.set_completed_run(&completed("Ada", 120));

        let (cycle, _handle) = sync.start_cycle();
        let view = cycle.await.unwrap();

        assert!(!view.offline);
        assert_eq!(view.pending, 0);
        assert_eq!(view.player_rank, Some(1));
        assert_eq!(view.entries.len(), 2);
        assert!(view.entries[0].is_current_player);
        assert_eq!(view.entries[0].score, scoring::score(120));
        assert_eq!(view.entries[1].name, "Grace");
        assert!(environment.persisted().await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_primary_falls_back_to_secondary() {
        let addr = spawn_server().await;
        let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead.local_addr().unwrap();
        drop(dead);

        let transport = HttpTransport::new(&client_config(vec![
            format!("http://{dead_addr}{API_PREFIX}"),
            format!("http://{addr}{API_PREFIX}"),
        ]))
        .unwrap();

        let records = transport.fetch().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_validation_errors_are_not_retried() {
        let addr = spawn_server().await;
        let transport =
            HttpTransport::new(&client_config(vec![format!("http://{addr}{API_PREFIX}")])).unwrap();

        let err = transport
            .submit(ScoreSubmission {
                name: "Ada".into(),
                department: "CS".into(),
                time_taken: 9_000,
            })
            .await
            .unwrap_err();

        match err {
            SyncError::Rejected { status, .. } => assert_eq!(status, 400),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn primary_without_the_api_falls_back_to_secondary() {
        let addr = spawn_server().await;
        let transport = HttpTransport::new(&client_config(vec![
            format!("http://{addr}/not-the-api"),
            format!("http://{addr}{API_PREFIX}"),
        ]))
        .unwrap();

        let record = transport
            .submit(ScoreSubmission {
                name: "Ada".into(),
                department: "CS".into(),
                time_taken: 60,
            })
            .await
            .unwrap();
        assert_eq!(record.score, scoring::score(60));
        assert_eq!(transport.fetch().await.unwrap().len(), 1);
    }
}
