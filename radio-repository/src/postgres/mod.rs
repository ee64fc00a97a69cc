//! PostgreSQL implementation of the vote and track stores.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Vote upserts with `ON CONFLICT DO UPDATE` on the deterministic vote key
//! - Version-checked tally updates (compare-and-swap in a single `UPDATE`)
//! - Server-side `voted_at` timestamps and play count increments
//!
//! ## Database Tables
//!
//! - `tracks`: Track metadata, vote tallies and the tally version
//! - `votes`: One row per (user, track) pair
mod track_store;
mod vote_store;

pub use track_store::PostgresTrackStore;
pub use vote_store::PostgresVoteStore;

use crate::RepositoryError;

/// Applies the bundled schema migrations to the database.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await?;
    Ok(())
}

/// Converts a stored BIGINT into a non-negative count.
pub(crate) fn to_count(field: &'static str, value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value).map_err(|_| RepositoryError::InvalidValue { field, value })
}

/// Converts a count into a BIGINT for binding.
pub(crate) fn to_bigint(field: &'static str, value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value).map_err(|_| RepositoryError::InvalidValue { field, value: i64::MAX })
}
