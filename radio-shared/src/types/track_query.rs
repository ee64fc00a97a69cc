use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::Track;

/// Field a track listing can be ordered by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackOrder {
    HeatScore,
    UploadedAt,
    Plays,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

/// Filters, ordering and limit for listing tracks.
///
/// Every field is optional. Without `order_by` the store returns tracks in its
/// natural order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    /// Keep tracks whose genre list contains this genre.
    pub genre: Option<String>,
    pub artist_id: Option<String>,
    pub order_by: Option<TrackOrder>,
    #[serde(default)]
    pub direction: OrderDirection,
    pub limit: Option<usize>,
}

impl TrackQuery {
    pub fn matches(&self, track: &Track) -> bool {
        if let Some(genre) = &self.genre {
            if !track.has_genre(genre) {
                return false;
            }
        }
        if let Some(artist_id) = &self.artist_id {
            if &track.artist_id != artist_id {
                return false;
            }
        }
        true
    }

    /// Compares two tracks according to `order_by` and `direction`.
    pub fn compare(&self, a: &Track, b: &Track) -> Ordering {
        let ordering = match self.order_by {
            Some(TrackOrder::HeatScore) => a.tally.heat_score.cmp(&b.tally.heat_score),
            Some(TrackOrder::UploadedAt) => a.uploaded_at.cmp(&b.uploaded_at),
            Some(TrackOrder::Plays) => a.plays.cmp(&b.plays),
            None => Ordering::Equal,
        };
        match self.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }

    /// Applies filters, ordering and limit to an in-memory set of tracks.
    pub fn apply(&self, tracks: impl IntoIterator<Item = Track>) -> Vec<Track> {
        let mut selected: Vec<Track> = tracks.into_iter().filter(|t| self.matches(t)).collect();
        if self.order_by.is_some() {
            selected.sort_by(|a, b| self.compare(a, b).then_with(|| a.id.cmp(&b.id)));
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
