//! Device-side collaborators of the sync engine: durable queue storage, connectivity, reload.

use std::{
    io::ErrorKind,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::queue::PendingScoreQueue;

/// Failures reading or writing the persisted queue.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Reading or writing the queue file failed.
    #[error("failed to access pending queue at `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The queue file does not hold a valid queue.
    #[error("pending queue at `{path}` is corrupt")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The queue could not be serialized.
    #[error("failed to encode pending queue")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// Convenient result alias returning [`EnvironmentError`] failures.
pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Host environment the sync engine runs in.
pub trait SyncEnvironment: Send + Sync {
    /// Read the persisted queue; a missing queue is empty.
    fn load_queue(&self) -> BoxFuture<'static, EnvironmentResult<PendingScoreQueue>>;

    /// Persist the queue, replacing the previous copy.
    fn store_queue(&self, queue: &PendingScoreQueue) -> BoxFuture<'static, EnvironmentResult<()>>;

    /// Whether the device reports network connectivity.
    fn is_online(&self) -> bool;

    /// Ask the host to reload the whole client.
    fn request_reload(&self);
}

/// Queue persisted as a JSON file, with a manually toggled connectivity flag.
#[derive(Clone)]
pub struct FileEnvironment {
    path: Arc<PathBuf>,
    online: Arc<AtomicBool>,
    reload_requested: Arc<AtomicBool>,
}

impl FileEnvironment {
    /// Store the queue at `path`; the environment starts online.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            online: Arc::new(AtomicBool::new(true)),
            reload_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the connectivity flag.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Whether a reload was requested since construction.
    pub fn reload_requested(&self) -> bool {
        self.reload_requested.load(Ordering::SeqCst)
    }
}

impl SyncEnvironment for FileEnvironment {
    fn load_queue(&self) -> BoxFuture<'static, EnvironmentResult<PendingScoreQueue>> {
        let path = self.path.clone();
        Box::pin(async move {
            let contents = match tokio::fs::read(path.as_path()).await {
                Ok(contents) => contents,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    return Ok(PendingScoreQueue::default());
                }
                Err(source) => {
                    return Err(EnvironmentError::Io {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };

            serde_json::from_slice(&contents).map_err(|source| EnvironmentError::Decode {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    fn store_queue(&self, queue: &PendingScoreQueue) -> BoxFuture<'static, EnvironmentResult<()>> {
        let path = self.path.clone();
        let encoded = serde_json::to_vec_pretty(queue);
        Box::pin(async move {
            let encoded = encoded.map_err(|source| EnvironmentError::Encode { source })?;
            tokio::fs::write(path.as_path(), encoded)
                .await
                .map_err(|source| EnvironmentError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!(path = %path.display(), "pending queue persisted");
            Ok(())
        })
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn request_reload(&self) {
        info!("client reload requested");
        self.reload_requested.store(true, Ordering::SeqCst);
    }
}

/// In-memory environment used by tests and embedders without durable storage.
#[derive(Clone, Default)]
pub struct MemoryEnvironment {
    queue: Arc<Mutex<PendingScoreQueue>>,
    offline: Arc<AtomicBool>,
    reloads: Arc<AtomicUsize>,
}

impl MemoryEnvironment {
    /// Start with `queue` already persisted.
    pub fn with_queue(queue: PendingScoreQueue) -> Self {
        Self {
            queue: Arc::new(Mutex::new(queue)),
            ..Self::default()
        }
    }

    /// Override the connectivity flag.
    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    /// Copy of the persisted queue.
    pub async fn persisted(&self) -> PendingScoreQueue {
        self.queue.lock().await.clone()
    }

    /// Number of reloads requested.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl SyncEnvironment for MemoryEnvironment {
    fn load_queue(&self) -> BoxFuture<'static, EnvironmentResult<PendingScoreQueue>> {
        let queue = self.queue.clone();
        Box::pin(async move { Ok(queue.lock().await.clone()) })
    }

    fn store_queue(&self, queue: &PendingScoreQueue) -> BoxFuture<'static, EnvironmentResult<()>> {
        let target = self.queue.clone();
        let queue = queue.clone();
        Box::pin(async move {
            *target.lock().await = queue;
            Ok(())
        })
    }

    fn is_online(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    fn request_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::queue::PendingScore;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("webverse-queue-{tag}-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_queue() {
        let env = FileEnvironment::new(temp_path("missing"));
        assert!(env.load_queue().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_queue_survives_a_new_environment() {
        let path = temp_path("roundtrip");
        let mut queue = PendingScoreQueue::default();
        queue.push(PendingScore {
            key: 42,
            name: "Ada".into(),
            department: "CS".into(),
            time_taken: 60,
            score: 810,
        });

        FileEnvironment::new(path.clone())
            .store_queue(&queue)
            .await
            .unwrap();
        let reloaded = FileEnvironment::new(path.clone()).load_queue().await.unwrap();
        assert_eq!(reloaded, queue);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{not json").unwrap();
        let err = FileEnvironment::new(path.clone())
            .load_queue()
            .await
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::Decode { .. }));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn connectivity_and_reload_flags() {
        let env = FileEnvironment::new(temp_path("flags"));
        assert!(env.is_online());
        env.set_online(false);
        assert!(!env.is_online());
        env.request_reload();
        assert!(env.reload_requested());

        let memory = MemoryEnvironment::default();
        assert!(memory.is_online());
        memory.request_reload();
        assert_eq!(memory.reloads(), 1);
    }
}
