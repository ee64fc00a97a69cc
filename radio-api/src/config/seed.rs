use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use radio_shared::types::{TallyOverflow, Track, TrackTally};
use serde::Deserialize;

use crate::errors::ServerError;
use crate::server::RESERVED_TRACK_IDS;

/// A track as written in a seed file.
///
/// Only `id`, `title`, `artist` and `artistId` are required. Vote counts are
/// optional and the rest of the tally is derived from them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub artist_id: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub plays: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
}

impl TryFrom<SeedTrack> for Track {
    type Error = TallyOverflow;

    fn try_from(seed: SeedTrack) -> Result<Self, Self::Error> {
        let tally = TrackTally::from_counts(seed.upvotes, seed.downvotes)?;
        let mut track = Track::new(seed.id, seed.title, seed.artist, seed.artist_id)
            .with_genres(seed.genre);
        track.duration_secs = seed.duration;
        track.plays = seed.plays;
        if let Some(uploaded_at) = seed.uploaded_at {
            track.uploaded_at = uploaded_at;
        }
        track.tally = tally;
        Ok(track)
    }
}

/// Load the JSON array of tracks stored at `path`.
///
/// Fails on tracks whose id collides with a fixed `/tracks/...` route or
/// whose vote counts do not add up within `u64`.
pub fn load_seed_tracks(path: &Path) -> Result<Vec<Track>, ServerError> {
    let raw = fs::read_to_string(path)?;
    let seeds: Vec<SeedTrack> = serde_json::from_str(&raw)
        .map_err(|e| ServerError::seed(format!("{}: {}", path.display(), e)))?;

    seeds
        .into_iter()
        .map(|seed| {
            if RESERVED_TRACK_IDS.contains(&seed.id.as_str()) {
                return Err(ServerError::seed(format!(
                    "{}: track id '{}' is reserved",
                    path.display(),
                    seed.id
                )));
            }
            let id = seed.id.clone();
            Track::try_from(seed)
                .map_err(|e| ServerError::seed(format!("{}: track {}: {}", path.display(), id, e)))
        })
        .collect()
}
