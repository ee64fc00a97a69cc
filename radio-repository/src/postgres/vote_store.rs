//! PostgreSQL implementation of the vote store.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use radio_shared::types::{Ballot, Vote, VoteKey, VoteType};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::{RepositoryError, VoteStore};

/// PostgreSQL-backed vote store.
///
/// Votes live in the `votes` table with the deterministic vote key as primary key.
pub struct PostgresVoteStore {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresVoteStore {
    /// Creates a new PostgreSQL vote store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with required schema (votes table)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }
}

fn vote_type_code(vote_type: VoteType) -> i16 {
    match vote_type {
        VoteType::Up => 0,
        VoteType::Down => 1,
    }
}

fn vote_type_from_code(code: i16) -> Result<VoteType, RepositoryError> {
    match code {
        0 => Ok(VoteType::Up),
        1 => Ok(VoteType::Down),
        _ => Err(RepositoryError::InvalidVoteType(code)),
    }
}

fn vote_from_row(row: &PgRow) -> Result<Vote, RepositoryError> {
    Ok(Vote {
        user_id: row.try_get("user_id")?,
        track_id: row.try_get("track_id")?,
        vote_type: vote_type_from_code(row.try_get("vote_type")?)?,
        voted_at: row.try_get("voted_at")?,
    })
}

#[async_trait]
impl VoteStore for PostgresVoteStore {
    async fn find_vote(&self, user_id: &str, track_id: &str) -> Result<Option<Vote>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, track_id, vote_type, voted_at
            FROM votes
            WHERE user_id = $1 AND track_id = $2
            "#,
        )
        .bind(user_id)
        .bind(track_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(vote_from_row).transpose()
    }

    /// Upserts the vote under its key; `voted_at` comes from the database clock.
    async fn put_vote(&self, ballot: &Ballot) -> Result<Vote, RepositoryError> {
        let key = ballot.key();
        let voted_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO votes (id, user_id, track_id, vote_type, voted_at)
            VALUES ($1, $2, $3, $4, clock_timestamp())
            ON CONFLICT (id)
            DO UPDATE SET
                vote_type = EXCLUDED.vote_type,
                voted_at = EXCLUDED.voted_at
            RETURNING voted_at
            "#,
        )
        .bind(key.as_str())
        .bind(&ballot.user_id)
        .bind(&ballot.track_id)
        .bind(vote_type_code(ballot.vote_type))
        .fetch_one(&self.pool)
        .await?;

        Ok(Vote {
            user_id: ballot.user_id.clone(),
            track_id: ballot.track_id.clone(),
            vote_type: ballot.vote_type,
            voted_at,
        })
    }

    async fn delete_vote(&self, key: &VoteKey) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
