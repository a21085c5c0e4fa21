//! Engine error type

use thiserror::Error;

/// Failures surfaced by [`Engine`](crate::search::Engine).
///
/// Broken tree invariants are not represented here: they panic where they are
/// detected. A panic on a worker thread is caught by the scheduler and
/// reported as [`SearchError::WorkerPanicked`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search config requires at least one worker")]
    NoWorkers,

    #[error("win ceiling must be finite and positive, got {0}")]
    InvalidCeiling(f64),

    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("search aborted, a worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("root bridge dropped before the search finished")]
    Disconnected,

    #[error("process-wide engine lock poisoned")]
    Poisoned,
}
