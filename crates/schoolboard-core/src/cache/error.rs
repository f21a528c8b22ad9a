use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the cache.
///
/// `Clone` because a single fetch outcome is handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The producer for a key failed. Displays the producer's message unchanged.
    #[error("{0:#}")]
    Fetch(Arc<anyhow::Error>),

    #[error("Unknown resource key: {0}")]
    UnknownKey(String),

    #[error("Value for {found} cannot be stored under {expected}")]
    KeyMismatch { expected: String, found: String },

    #[error("Fetch for {0} was abandoned before it settled")]
    Abandoned(String),
}

impl CacheError {
    pub fn fetch(error: anyhow::Error) -> Self {
        CacheError::Fetch(Arc::new(error))
    }

    /// The underlying producer error, if this is a fetch failure.
    /// Callers can downcast it to inspect transport-specific details.
    pub fn producer_error(&self) -> Option<&anyhow::Error> {
        match self {
            CacheError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}
