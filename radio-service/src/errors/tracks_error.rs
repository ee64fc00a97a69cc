//! Tracks service error types.
//!
//! Store failures are propagated unchanged inside `Persistence`; a missing
//! track is lifted out of the store error so callers can tell it apart.

use radio_repository::RepositoryError;
use thiserror::Error;

/// Errors from tracks service operations.
#[derive(Debug, Error)]
pub enum TracksError {
    /// Invalid input (e.g. empty identifiers).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The referenced track has no record in the track store.
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// A vote or track store read or write failed.
    #[error("Persistence failure: {0}")]
    Persistence(#[source] RepositoryError),

    /// The track's tally kept changing under us until the attempt budget ran out.
    #[error("Tally of track {track_id} changed concurrently on all {attempts} attempts")]
    Conflict { track_id: String, attempts: usize },
}

impl TracksError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a track not found error.
    pub fn track_not_found(track_id: impl Into<String>) -> Self {
        Self::TrackNotFound(track_id.into())
    }
}

impl From<RepositoryError> for TracksError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TrackNotFound(track_id) => Self::TrackNotFound(track_id),
            other => Self::Persistence(other),
        }
    }
}
