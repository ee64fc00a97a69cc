//! This module defines the `VoteStore` trait, which provides an interface for
//! the keyed store holding one vote record per (user, track) pair.
use async_trait::async_trait;
use radio_shared::types::{Ballot, Vote, VoteKey};

use crate::errors::RepositoryError;

/// A trait that defines the interface for interacting with the vote store.
///
/// Records are addressed by the deterministic [`VoteKey`] of their
/// (user, track) pair, so a store never holds two votes for the same pair.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Finds the vote a user holds on a track.
    ///
    /// Equality query on both `user_id` and `track_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vote))` - The user's current vote
    /// * `Ok(None)` - The user has not voted on the track
    /// * `Err(RepositoryError)` - If the lookup fails
    async fn find_vote(&self, user_id: &str, track_id: &str) -> Result<Option<Vote>, RepositoryError>;

    /// Writes a ballot under its vote key, overwriting any record stored there.
    ///
    /// The store stamps `voted_at` with its own clock and returns the stored vote.
    ///
    /// # Arguments
    ///
    /// * `ballot` - The user, track and vote direction to persist
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The vote as stored
    /// * `Err(RepositoryError)` - If the write fails
    async fn put_vote(&self, ballot: &Ballot) -> Result<Vote, RepositoryError>;

    /// Deletes the vote stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A vote existed and was deleted
    /// * `Ok(false)` - Nothing was stored under the key
    /// * `Err(RepositoryError)` - If the deletion fails
    async fn delete_vote(&self, key: &VoteKey) -> Result<bool, RepositoryError>;
}
