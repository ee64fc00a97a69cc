//! PostgreSQL implementation of the track store.
use async_trait::async_trait;
use radio_shared::types::{OrderDirection, TallyUpdate, Track, TrackOrder, TrackQuery, TrackTally};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::debug;

use crate::postgres::{to_bigint, to_count};
use crate::{RepositoryError, TrackStore};

const TRACK_COLUMNS: &str = "id, title, artist, artist_id, genres, duration_secs, plays, uploaded_at, \
     upvotes, downvotes, total_votes, heat_score, version";

/// PostgreSQL-backed track store.
///
/// Tally writes are a single conditional `UPDATE ... WHERE version = $n`, so the
/// version check and the write are atomic on the database side.
pub struct PostgresTrackStore {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresTrackStore {
    /// Creates a new PostgreSQL track store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with required schema (tracks table)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    /// Reads the current version of a track, if it exists.
    async fn current_version(&self, track_id: &str) -> Result<Option<u64>, RepositoryError> {
        let version: Option<i64> = sqlx::query_scalar("SELECT version FROM tracks WHERE id = $1")
            .bind(track_id)
            .fetch_optional(&self.pool)
            .await?;

        version.map(|v| to_count("version", v)).transpose()
    }
}

fn track_from_row(row: &PgRow) -> Result<Track, RepositoryError> {
    let duration_secs: i32 = row.try_get("duration_secs")?;
    let heat_score: i32 = row.try_get("heat_score")?;

    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        artist_id: row.try_get("artist_id")?,
        genres: row.try_get("genres")?,
        duration_secs: u32::try_from(duration_secs).map_err(|_| RepositoryError::InvalidValue {
            field: "duration_secs",
            value: duration_secs.into(),
        })?,
        plays: to_count("plays", row.try_get("plays")?)?,
        uploaded_at: row.try_get("uploaded_at")?,
        tally: TrackTally {
            upvotes: to_count("upvotes", row.try_get("upvotes")?)?,
            downvotes: to_count("downvotes", row.try_get("downvotes")?)?,
            total_votes: to_count("total_votes", row.try_get("total_votes")?)?,
            heat_score: u32::try_from(heat_score).map_err(|_| RepositoryError::InvalidValue {
                field: "heat_score",
                value: heat_score.into(),
            })?,
        },
        version: to_count("version", row.try_get("version")?)?,
    })
}

fn order_column(order: TrackOrder) -> &'static str {
    match order {
        TrackOrder::HeatScore => "heat_score",
        TrackOrder::UploadedAt => "uploaded_at",
        TrackOrder::Plays => "plays",
    }
}

#[async_trait]
impl TrackStore for PostgresTrackStore {
    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = $1"))
            .bind(track_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(track_from_row).transpose()
    }

    /// Builds the listing query with `QueryBuilder`; the order column comes
    /// from a fixed whitelist, every value is bound.
    async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE TRUE"));

        if let Some(genre) = &query.genre {
            builder.push(" AND ").push_bind(genre.clone()).push(" = ANY(genres)");
        }
        if let Some(artist_id) = &query.artist_id {
            builder.push(" AND artist_id = ").push_bind(artist_id.clone());
        }
        match query.order_by {
            Some(order) => {
                let direction = match query.direction {
                    OrderDirection::Asc => "ASC",
                    OrderDirection::Desc => "DESC",
                };
                builder.push(format!(" ORDER BY {} {}, id ASC", order_column(order), direction));
            }
            None => {
                builder.push(" ORDER BY id ASC");
            }
        }
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(track_from_row).collect()
    }

    async fn update_tally(
        &self,
        track_id: &str,
        update: &TallyUpdate,
        expected_version: Option<u64>,
    ) -> Result<u64, RepositoryError> {
        let upvotes = update.upvotes.map(|v| to_bigint("upvotes", v)).transpose()?;
        let downvotes = update.downvotes.map(|v| to_bigint("downvotes", v)).transpose()?;
        let total_votes = update.total_votes.map(|v| to_bigint("total_votes", v)).transpose()?;
        let heat_score = update.heat_score.map(|v| v as i32);
        let expected = expected_version.map(|v| to_bigint("version", v)).transpose()?;

        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE tracks SET
                upvotes = COALESCE($2, upvotes),
                downvotes = COALESCE($3, downvotes),
                total_votes = COALESCE($4, total_votes),
                heat_score = COALESCE($5, heat_score),
                version = version + 1
            WHERE id = $1 AND ($6::BIGINT IS NULL OR version = $6)
            RETURNING version
            "#,
        )
        .bind(track_id)
        .bind(upvotes)
        .bind(downvotes)
        .bind(total_votes)
        .bind(heat_score)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(version) = new_version {
            debug!(track_id, version, "Tally updated");
            return to_count("version", version);
        }

        // Nothing updated: either the track is gone or the version moved on
        match (self.current_version(track_id).await?, expected_version) {
            (None, _) => Err(RepositoryError::track_not_found(track_id)),
            (Some(actual), Some(expected)) => Err(RepositoryError::conflict(track_id, expected, actual)),
            (Some(_), None) => Err(RepositoryError::DatabaseError(sqlx::Error::RowNotFound)),
        }
    }

    async fn increment_plays(&self, track_id: &str) -> Result<u64, RepositoryError> {
        let plays: Option<i64> =
            sqlx::query_scalar("UPDATE tracks SET plays = plays + 1 WHERE id = $1 RETURNING plays")
                .bind(track_id)
                .fetch_optional(&self.pool)
                .await?;

        match plays {
            Some(plays) => to_count("plays", plays),
            None => Err(RepositoryError::track_not_found(track_id)),
        }
    }
}
