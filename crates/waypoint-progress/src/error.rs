//! Error types for the progress layer.

/// Errors from progress-sync operations.
///
/// Network failures are deliberately absent: a failed fetch or checkpoint
/// write degrades to a default instead of becoming an error.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The operation needs a logged-in player and there is none.
    #[error("no authenticated session")]
    NotAuthenticated,

    /// The session was replaced while a request was in flight, so its
    /// result no longer applies.
    #[error("session changed while request was in flight (started under {started}, now {current})")]
    StaleSession { started: u64, current: u64 },
}

/// Errors from a [`MarkerStore`](crate::MarkerStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("marker store I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
