//! Error types for the vote and track stores.
use radio_shared::types::TallyOverflow;
use thiserror::Error;

/// Represents errors that can occur within the vote and track stores.
///
/// This enum consolidates storage failures (database, migrations) together with
/// the conditions the stores report explicitly: a missing track, a failed
/// version check, or a stored value that does not fit the domain types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Concurrency conflict on track {track_id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        track_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),

    #[error("Invalid stored value for {field}: {value}")]
    InvalidValue { field: &'static str, value: i64 },

    #[error("Tally error: {0}")]
    TallyOverflow(#[from] TallyOverflow),
}

impl RepositoryError {
    pub fn track_not_found(track_id: impl Into<String>) -> Self {
        Self::TrackNotFound(track_id.into())
    }

    pub fn conflict(track_id: impl Into<String>, expected: u64, actual: u64) -> Self {
        Self::ConcurrencyConflict {
            track_id: track_id.into(),
            expected,
            actual,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
