use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TrackTally;

/// Represents a track together with its current vote tally.
///
/// `version` is bumped by the track store on every tally write and is used for
/// optimistic concurrency control of the read-modify-write voting sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub artist_id: String,
    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,
    /// Duration in seconds.
    #[serde(rename = "duration", default)]
    pub duration_secs: u32,
    #[serde(default)]
    pub plays: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub tally: TrackTally,
    #[serde(default)]
    pub version: u64,
}

impl Track {
    /// Creates a track without plays or votes.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        artist_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            artist_id: artist_id.into(),
            genres: Vec::new(),
            duration_secs: 0,
            plays: 0,
            uploaded_at: Utc::now(),
            tally: TrackTally::default(),
            version: 0,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
