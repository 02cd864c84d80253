//! Process-local score store for tests and database-less deployments.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dao::{
    models::PlayerEntity,
    score_store::ScoreStore,
    storage::{StorageError, StorageResult},
};

#[derive(Debug, Error)]
#[error("in-memory store switched offline")]
struct Offline;

/// [`ScoreStore`] keeping every player in a vector.
#[derive(Clone)]
pub struct MemoryScoreStore {
    players: Arc<RwLock<Vec<PlayerEntity>>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self {
            players: Arc::default(),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MemoryScoreStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every operation fails until switched back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable(Offline.to_string(), Offline))
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            store.players.write().await.push(player);
            Ok(())
        })
    }

    fn top_players(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            let mut players = store.players.read().await.clone();
            players.sort_by(PlayerEntity::rank_cmp);
            players.truncate(limit as usize);
            Ok(players)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check() })
    }
}
