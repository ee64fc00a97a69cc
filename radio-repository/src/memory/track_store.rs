use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use radio_shared::types::{TallyUpdate, Track, TrackQuery};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{RepositoryError, TrackStore};

/// In-memory track store keyed by track id.
///
/// Version checks and tally writes happen under one write lock, which makes
/// `update_tally` a true compare-and-swap.
#[derive(Clone, Default)]
pub struct InMemoryTrackStore {
    tracks: Arc<RwLock<HashMap<String, Track>>>,
}

impl InMemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given tracks.
    pub fn with_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let tracks = tracks.into_iter().map(|track| (track.id.clone(), track)).collect();
        Self {
            tracks: Arc::new(RwLock::new(tracks)),
        }
    }

    /// Inserts or replaces a track.
    pub async fn insert_track(&self, track: Track) {
        self.tracks.write().await.insert(track.id.clone(), track);
    }
}

#[async_trait]
impl TrackStore for InMemoryTrackStore {
    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, RepositoryError> {
        Ok(self.tracks.read().await.get(track_id).cloned())
    }

    async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, RepositoryError> {
        let tracks = self.tracks.read().await;
        let mut candidates: Vec<Track> = tracks.values().cloned().collect();
        // HashMap order is arbitrary; keep unordered listings stable
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(query.apply(candidates))
    }

    async fn update_tally(
        &self,
        track_id: &str,
        update: &TallyUpdate,
        expected_version: Option<u64>,
    ) -> Result<u64, RepositoryError> {
        let mut tracks = self.tracks.write().await;
        let track = tracks
            .get_mut(track_id)
            .ok_or_else(|| RepositoryError::track_not_found(track_id))?;

        if let Some(expected) = expected_version {
            if track.version != expected {
                return Err(RepositoryError::conflict(track_id, expected, track.version));
            }
        }

        update.apply_to(&mut track.tally);
        track.version += 1;
        debug!(track_id, version = track.version, "Tally updated");
        Ok(track.version)
    }

    async fn increment_plays(&self, track_id: &str) -> Result<u64, RepositoryError> {
        let mut tracks = self.tracks.write().await;
        let track = tracks
            .get_mut(track_id)
            .ok_or_else(|| RepositoryError::track_not_found(track_id))?;
        track.plays += 1;
        Ok(track.plays)
    }
}
