use std::error::Error;
use thiserror::Error;

/// Result alias for score storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-agnostic failure reported by a [`ScoreStore`](crate::dao::score_store::ScoreStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not serve the request; callers treat the store as down.
    #[error("score storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap a backend failure, keeping it as the error source.
    pub fn unavailable(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }
}
