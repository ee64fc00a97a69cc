use std::sync::Arc;

use radio_repository::postgres::run_migrations;
use radio_repository::{
    InMemoryTrackStore, InMemoryVoteStore, PostgresTrackStore, PostgresVoteStore, TrackStore,
    VoteStore,
};
use radio_service::TracksService;
use tracing::info;

use crate::config::{ApiConfig, StorageBackend, load_seed_tracks};
use crate::errors::ServerError;

/// `Dependencies` holds the wired-up components the HTTP server needs.
pub struct Dependencies {
    pub service: Arc<TracksService>,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance for the configured backend.
    ///
    /// For PostgreSQL this connects the pool and applies pending migrations;
    /// for the memory backend it loads the optional seed file.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if any dependency fails to initialize.
    pub async fn new(config: &ApiConfig) -> Result<Self, ServerError> {
        let (votes, tracks): (Arc<dyn VoteStore>, Arc<dyn TrackStore>) = match config.storage {
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| ServerError::config("DATABASE_URL must be set"))?;

                let pool = sqlx::PgPool::connect(database_url).await?;
                run_migrations(&pool).await?;
                info!("Database migrations applied");

                let votes: Arc<dyn VoteStore> = Arc::new(PostgresVoteStore::new(pool.clone()).await?);
                let tracks: Arc<dyn TrackStore> = Arc::new(PostgresTrackStore::new(pool).await?);
                (votes, tracks)
            }
            StorageBackend::Memory => {
                let tracks = InMemoryTrackStore::new();
                if let Some(path) = &config.seed_tracks_path {
                    let seeded = load_seed_tracks(path)?;
                    info!(path = %path.display(), tracks = seeded.len(), "Seeding track store");
                    for track in seeded {
                        tracks.insert_track(track).await;
                    }
                }

                let votes: Arc<dyn VoteStore> = Arc::new(InMemoryVoteStore::new());
                let tracks: Arc<dyn TrackStore> = Arc::new(tracks);
                (votes, tracks)
            }
        };

        info!(
            storage = ?config.storage,
            max_tally_attempts = config.service.max_tally_attempts,
            "Tracks service initialized"
        );

        Ok(Dependencies {
            service: Arc::new(TracksService::with_config(votes, tracks, config.service.clone())),
        })
    }
}
