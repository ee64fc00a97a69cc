//! This module defines the `TrackStore` trait, which provides an interface for
//! reading tracks and updating their vote tallies and play counts.
use async_trait::async_trait;
use radio_shared::types::{TallyUpdate, Track, TrackQuery};

use crate::errors::RepositoryError;

/// A trait that defines the interface for interacting with the track store.
///
/// Every track carries a `version` which the store increments on each tally
/// write. Passing the version read earlier to [`TrackStore::update_tally`]
/// turns the write into a compare-and-swap, so concurrent voters on the same
/// track cannot overwrite each other's increments.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Loads a single track.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Track))` - The track and its current tally
    /// * `Ok(None)` - No track with that id exists
    /// * `Err(RepositoryError)` - If the lookup fails
    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, RepositoryError>;

    /// Lists tracks matching the query filters, in the query's order, up to its limit.
    async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, RepositoryError>;

    /// Applies a merge-style partial update to a track's tally.
    ///
    /// # Arguments
    ///
    /// * `track_id` - The track to update
    /// * `update` - Tally fields to overwrite; `None` fields are left as stored
    /// * `expected_version` - When `Some`, the update only applies if the stored
    ///   version still matches
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - The track's new version
    /// * `Err(RepositoryError::TrackNotFound)` - If the track does not exist
    /// * `Err(RepositoryError::ConcurrencyConflict)` - If the version check fails
    /// * `Err(RepositoryError)` - If the write fails
    async fn update_tally(
        &self,
        track_id: &str,
        update: &TallyUpdate,
        expected_version: Option<u64>,
    ) -> Result<u64, RepositoryError>;

    /// Atomically increments a track's play count and returns the new count.
    ///
    /// Does not touch the tally or the track version.
    async fn increment_plays(&self, track_id: &str) -> Result<u64, RepositoryError>;
}
