//! Storage error taxonomy.

/// Failures surfaced by [`EventStore`](crate::store::EventStore) backends.
///
/// `AlreadyExists` and `NotFound` are contract violations by the caller;
/// `Connectivity` wraps a transport failure and carries the driver's error
/// as its source, keeping this crate free of any concrete driver type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("event already exists: {0}")]
    AlreadyExists(String),

    #[error("event not found: {0}")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Connectivity(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wrap a backend driver error as a connectivity failure.
    pub fn connectivity(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connectivity(Box::new(err))
    }
}
