//! Tracks service implementation.
//!
//! This module provides the service that casts votes and serves track
//! listings. It owns no state of its own: votes and tallies live behind the
//! injected [`VoteStore`] and [`TrackStore`].
//!
//! # Vote flow
//!
//! A cast first confirms the track exists, then retracts the user's previous
//! vote (if any) from the tally, writes the new vote and records it in the
//! tally. Each tally change is a version-checked write that is re-read and
//! retried when another writer got there first.

use std::sync::Arc;

use radio_repository::{RepositoryError, TrackStore, VoteStore};
use radio_shared::types::{
    Ballot, OrderDirection, TallyOverflow, TallyUpdate, Track, TrackOrder, TrackQuery, TrackTally,
    Vote, VoteType,
};
use tracing::{debug, info, warn};

use crate::config::TracksServiceConfig;
use crate::errors::TracksError;

/// A single adjustment to a track's tally.
#[derive(Clone, Copy, Debug)]
enum TallyChange {
    Record(VoteType),
    Retract(VoteType),
}

impl TallyChange {
    fn apply(self, tally: &TrackTally) -> Result<TrackTally, TallyOverflow> {
        match self {
            TallyChange::Record(vote_type) => tally.record(vote_type),
            TallyChange::Retract(vote_type) => tally.retract(vote_type),
        }
    }
}

/// The main service for voting on tracks and reading them back.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use radio_repository::{InMemoryTrackStore, InMemoryVoteStore};
/// use radio_service::TracksService;
/// use radio_shared::types::{Track, VoteType};
///
/// # async fn example() -> Result<(), radio_service::TracksError> {
/// let tracks = InMemoryTrackStore::with_tracks([Track::new("track-1", "Night Drive", "Vela", "artist-1")]);
/// let service = TracksService::new(Arc::new(InMemoryVoteStore::new()), Arc::new(tracks));
///
/// let vote = service.cast_vote("alice", "track-1", VoteType::Up).await?;
/// assert_eq!(vote.vote_type, VoteType::Up);
/// # Ok(())
/// # }
/// ```
pub struct TracksService {
    votes: Arc<dyn VoteStore>,
    tracks: Arc<dyn TrackStore>,
    config: TracksServiceConfig,
}

impl TracksService {
    /// Create a new TracksService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `votes` - Store holding the live vote of each (user, track) pair
    /// * `tracks` - Store holding track metadata and tallies
    pub fn new(votes: Arc<dyn VoteStore>, tracks: Arc<dyn TrackStore>) -> Self {
        Self::with_config(votes, tracks, TracksServiceConfig::default())
    }

    /// Create a new TracksService with custom configuration.
    pub fn with_config(
        votes: Arc<dyn VoteStore>,
        tracks: Arc<dyn TrackStore>,
        config: TracksServiceConfig,
    ) -> Self {
        Self {
            votes,
            tracks,
            config,
        }
    }

    fn validate_id(field_name: &str, value: &str) -> Result<(), TracksError> {
        if value.trim().is_empty() {
            return Err(TracksError::validation(format!("{} is required", field_name)));
        }
        Ok(())
    }

    /// User ids form the first half of the vote key, so they may not contain `_`.
    fn validate_user_id(user_id: &str) -> Result<(), TracksError> {
        Self::validate_id("user_id", user_id)?;
        if user_id.contains('_') {
            return Err(TracksError::validation(format!(
                "user_id must not contain '_': {}",
                user_id
            )));
        }
        Ok(())
    }

    /// Cast a user's vote on a track, replacing any vote they already hold there.
    ///
    /// Repeating the same vote type refreshes `voted_at` without changing the
    /// tally; switching type moves the user's single vote from one counter to
    /// the other.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The voter
    /// * `track_id` - The track being voted on
    /// * `vote_type` - Up or down
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The vote as stored, carrying the store's timestamp
    /// * `Err(TracksError::TrackNotFound)` - The track does not exist; nothing was changed
    /// * `Err(TracksError::Persistence)` - A store call failed; the user holds at most one vote
    /// * `Err(TracksError::Conflict)` - The tally kept changing concurrently
    pub async fn cast_vote(
        &self,
        user_id: &str,
        track_id: &str,
        vote_type: VoteType,
    ) -> Result<Vote, TracksError> {
        Self::validate_user_id(user_id)?;
        Self::validate_id("track_id", track_id)?;

        if self.tracks.get_track(track_id).await?.is_none() {
            warn!(user_id, track_id, "Vote rejected for unknown track");
            return Err(TracksError::track_not_found(track_id));
        }

        if let Some(previous) = self.votes.find_vote(user_id, track_id).await? {
            self.votes.delete_vote(&previous.key()).await?;
            let tally = self
                .apply_tally_change(track_id, TallyChange::Retract(previous.vote_type))
                .await?;
            debug!(
                user_id,
                track_id,
                previous = %previous.vote_type,
                upvotes = tally.upvotes,
                downvotes = tally.downvotes,
                "Previous vote retracted"
            );
        }

        let vote = self
            .votes
            .put_vote(&Ballot::new(user_id, track_id, vote_type))
            .await?;
        let tally = self
            .apply_tally_change(track_id, TallyChange::Record(vote_type))
            .await?;

        info!(
            user_id,
            track_id,
            vote_type = %vote_type,
            upvotes = tally.upvotes,
            downvotes = tally.downvotes,
            heat_score = tally.heat_score,
            "Vote cast"
        );
        Ok(vote)
    }

    /// Applies one tally change as a version-checked write, re-reading the
    /// track after each conflict until the attempt budget is spent.
    async fn apply_tally_change(
        &self,
        track_id: &str,
        change: TallyChange,
    ) -> Result<TrackTally, TracksError> {
        let attempts = self.config.max_tally_attempts.max(1);

        for attempt in 1..=attempts {
            let track = self
                .tracks
                .get_track(track_id)
                .await?
                .ok_or_else(|| TracksError::track_not_found(track_id))?;

            let next = change.apply(&track.tally).map_err(RepositoryError::from)?;
            match self
                .tracks
                .update_tally(track_id, &TallyUpdate::from(&next), Some(track.version))
                .await
            {
                Ok(_) => return Ok(next),
                Err(err) if err.is_conflict() => {
                    warn!(track_id, attempt, ?change, error = %err, "Tally changed concurrently, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(TracksError::Conflict {
            track_id: track_id.to_string(),
            attempts,
        })
    }

    /// Get the vote a user currently holds on a track, if any.
    pub async fn get_user_vote(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> Result<Option<Vote>, TracksError> {
        Self::validate_id("user_id", user_id)?;
        Self::validate_id("track_id", track_id)?;
        Ok(self.votes.find_vote(user_id, track_id).await?)
    }

    pub async fn get_track(&self, track_id: &str) -> Result<Option<Track>, TracksError> {
        Self::validate_id("track_id", track_id)?;
        Ok(self.tracks.get_track(track_id).await?)
    }

    /// List tracks matching the query's filters, in its order.
    pub async fn get_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, TracksError> {
        Ok(self.tracks.list_tracks(query).await?)
    }

    /// All tracks of one artist, newest upload first.
    pub async fn get_tracks_by_artist(&self, artist_id: &str) -> Result<Vec<Track>, TracksError> {
        Self::validate_id("artist_id", artist_id)?;
        let query = TrackQuery {
            artist_id: Some(artist_id.to_string()),
            order_by: Some(TrackOrder::UploadedAt),
            direction: OrderDirection::Desc,
            ..Default::default()
        };
        self.get_tracks(&query).await
    }

    /// Count one play of a track and return the new play count.
    pub async fn increment_play_count(&self, track_id: &str) -> Result<u64, TracksError> {
        Self::validate_id("track_id", track_id)?;
        let plays = self.tracks.increment_plays(track_id).await?;
        debug!(track_id, plays, "Play counted");
        Ok(plays)
    }

    /// Case-insensitive search over track titles and artist names.
    ///
    /// Only the first `search_scan_limit` tracks are considered. An empty
    /// term matches every scanned track.
    pub async fn search_tracks(&self, term: &str) -> Result<Vec<Track>, TracksError> {
        let query = TrackQuery {
            limit: Some(self.config.search_scan_limit),
            ..Default::default()
        };
        let scanned = self.tracks.list_tracks(&query).await?;

        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(scanned);
        }

        Ok(scanned
            .into_iter()
            .filter(|track| {
                track.title.to_lowercase().contains(&needle)
                    || track.artist.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Tracks with the highest heat score, hottest first.
    ///
    /// Falls back to the configured `trending_limit` when no limit is given.
    pub async fn get_trending_tracks(&self, limit: Option<usize>) -> Result<Vec<Track>, TracksError> {
        let query = TrackQuery {
            order_by: Some(TrackOrder::HeatScore),
            direction: OrderDirection::Desc,
            limit: Some(limit.unwrap_or(self.config.trending_limit)),
            ..Default::default()
        };
        self.get_tracks(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use radio_repository::{InMemoryTrackStore, InMemoryVoteStore};
    use radio_shared::types::VoteKey;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn stores() -> (InMemoryVoteStore, InMemoryTrackStore) {
        let tracks = InMemoryTrackStore::with_tracks([
            Track::new("track-1", "Night Drive", "Vela", "artist-1").with_genres(["synthwave"]),
        ]);
        (InMemoryVoteStore::new(), tracks)
    }

    fn service_for(votes: &InMemoryVoteStore, tracks: &InMemoryTrackStore) -> TracksService {
        TracksService::new(Arc::new(votes.clone()), Arc::new(tracks.clone()))
    }

    async fn tally_of(tracks: &InMemoryTrackStore, track_id: &str) -> TrackTally {
        tracks.get_track(track_id).await.unwrap().unwrap().tally
    }

    /// Vote store whose writes can be made to fail.
    struct FailingVoteStore {
        inner: InMemoryVoteStore,
        fail_puts: bool,
        fail_deletes: bool,
    }

    #[async_trait]
    impl VoteStore for FailingVoteStore {
        async fn find_vote(&self, user_id: &str, track_id: &str) -> Result<Option<Vote>, RepositoryError> {
            self.inner.find_vote(user_id, track_id).await
        }

        async fn put_vote(&self, ballot: &Ballot) -> Result<Vote, RepositoryError> {
            if self.fail_puts {
                return Err(RepositoryError::InvalidValue { field: "vote", value: -1 });
            }
            self.inner.put_vote(ballot).await
        }

        async fn delete_vote(&self, key: &VoteKey) -> Result<bool, RepositoryError> {
            if self.fail_deletes {
                return Err(RepositoryError::InvalidValue { field: "vote", value: -1 });
            }
            self.inner.delete_vote(key).await
        }
    }

    /// Track store where another voter's upvote lands between our read and
    /// our write, for the first `races` tally writes.
    struct RacingTrackStore {
        inner: InMemoryTrackStore,
        races: AtomicUsize,
    }

    #[async_trait]
    impl TrackStore for RacingTrackStore {
        async fn get_track(&self, track_id: &str) -> Result<Option<Track>, RepositoryError> {
            self.inner.get_track(track_id).await
        }

        async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, RepositoryError> {
            self.inner.list_tracks(query).await
        }

        async fn update_tally(
            &self,
            track_id: &str,
            update: &TallyUpdate,
            expected_version: Option<u64>,
        ) -> Result<u64, RepositoryError> {
            if self.races.load(Ordering::SeqCst) > 0 {
                self.races.fetch_sub(1, Ordering::SeqCst);
                let track = self.inner.get_track(track_id).await?.unwrap();
                let bumped = track.tally.record(VoteType::Up).unwrap();
                self.inner
                    .update_tally(track_id, &TallyUpdate::from(&bumped), None)
                    .await?;
            }
            self.inner.update_tally(track_id, update, expected_version).await
        }

        async fn increment_plays(&self, track_id: &str) -> Result<u64, RepositoryError> {
            self.inner.increment_plays(track_id).await
        }
    }

    /// Track store whose tally writes fail with a database error.
    struct BrokenTrackStore {
        inner: InMemoryTrackStore,
        tally_writes: AtomicUsize,
    }

    #[async_trait]
    impl TrackStore for BrokenTrackStore {
        async fn get_track(&self, track_id: &str) -> Result<Option<Track>, RepositoryError> {
            self.inner.get_track(track_id).await
        }

        async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>, RepositoryError> {
            self.inner.list_tracks(query).await
        }

        async fn update_tally(
            &self,
            _track_id: &str,
            _update: &TallyUpdate,
            _expected_version: Option<u64>,
        ) -> Result<u64, RepositoryError> {
            self.tally_writes.fetch_add(1, Ordering::SeqCst);
            Err(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut))
        }

        async fn increment_plays(&self, track_id: &str) -> Result<u64, RepositoryError> {
            self.inner.increment_plays(track_id).await
        }
    }

    #[tokio::test]
    async fn test_voting_scenario() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);

        assert_eq!(tally_of(&tracks, "track-1").await, TrackTally::from_counts(0, 0).unwrap());
        assert_eq!(tally_of(&tracks, "track-1").await.heat_score, 70);

        service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap();
        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!((tally.upvotes, tally.downvotes, tally.total_votes), (1, 0, 1));
        assert_eq!(tally.heat_score, 110);

        service.cast_vote("bob", "track-1", VoteType::Down).await.unwrap();
        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!((tally.upvotes, tally.downvotes, tally.total_votes), (1, 1, 2));
        assert_eq!(tally.heat_score, 70);

        service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap();
        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!((tally.upvotes, tally.downvotes, tally.total_votes), (0, 2, 2));
        assert_eq!(tally.heat_score, 30);

        let vote = service.get_user_vote("alice", "track-1").await.unwrap().unwrap();
        assert_eq!(vote.user_id, "alice");
        assert_eq!(vote.track_id, "track-1");
        assert_eq!(vote.vote_type, VoteType::Down);

        service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap();
        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!((tally.upvotes, tally.downvotes, tally.total_votes), (0, 2, 2));
        assert_eq!(tally.heat_score, 30);
        assert_eq!(votes.len().await, 2);
    }

    #[tokio::test]
    async fn test_single_vote_follows_latest_cast() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);
        let sequence = [
            VoteType::Up,
            VoteType::Up,
            VoteType::Down,
            VoteType::Up,
            VoteType::Down,
            VoteType::Down,
        ];

        for vote_type in sequence {
            service.cast_vote("alice", "track-1", vote_type).await.unwrap();

            let vote = service.get_user_vote("alice", "track-1").await.unwrap().unwrap();
            assert_eq!(vote.vote_type, vote_type);
            assert_eq!(votes.votes_for_track("track-1").await.len(), 1);

            let tally = tally_of(&tracks, "track-1").await;
            assert!(tally.is_consistent());
            assert_eq!(tally.total_votes, 1);
        }
    }

    #[tokio::test]
    async fn test_switch_moves_single_vote() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);
        for user in ["u1", "u2", "u3"] {
            service.cast_vote(user, "track-1", VoteType::Up).await.unwrap();
        }
        service.cast_vote("u4", "track-1", VoteType::Down).await.unwrap();
        let baseline = tally_of(&tracks, "track-1").await;

        service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap();
        service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap();

        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!(tally.upvotes, baseline.upvotes);
        assert_eq!(tally.downvotes, baseline.downvotes + 1);
        assert_eq!(tally.total_votes, baseline.total_votes + 1);
        assert_eq!(tally.heat_score, 78);
    }

    #[tokio::test]
    async fn test_repeat_vote_refreshes_timestamp_only() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);

        let first = service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap();
        let after_first = tally_of(&tracks, "track-1").await;
        let second = service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap();
        let after_second = tally_of(&tracks, "track-1").await;

        assert_eq!(after_first, after_second);
        assert!(second.voted_at > first.voted_at);
        let stored = service.get_user_vote("alice", "track-1").await.unwrap().unwrap();
        assert_eq!(stored.voted_at, second.voted_at);
    }

    #[tokio::test]
    async fn test_unknown_track_leaves_existing_vote() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);
        votes.put_vote(&Ballot::new("alice", "ghost", VoteType::Up)).await.unwrap();

        let err = service.cast_vote("alice", "ghost", VoteType::Down).await.unwrap_err();
        assert!(matches!(err, TracksError::TrackNotFound(id) if id == "ghost"));

        let vote = service.get_user_vote("alice", "ghost").await.unwrap().unwrap();
        assert_eq!(vote.vote_type, VoteType::Up);
    }

    #[tokio::test]
    async fn test_invalid_identifiers_rejected() {
        let (votes, tracks) = stores();
        let service = service_for(&votes, &tracks);

        for (user_id, track_id) in [("", "track-1"), ("alice", ""), ("  ", "track-1"), ("al_ice", "track-1")] {
            let err = service.cast_vote(user_id, track_id, VoteType::Up).await.unwrap_err();
            assert!(matches!(err, TracksError::ValidationError(_)), "{user_id:?}/{track_id:?}");
        }
        assert!(matches!(
            service.get_user_vote("", "track-1").await.unwrap_err(),
            TracksError::ValidationError(_)
        ));
        assert!(votes.is_empty().await);
        assert_eq!(tally_of(&tracks, "track-1").await.total_votes, 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_at_most_one_vote() {
        let (votes, tracks) = stores();
        service_for(&votes, &tracks)
            .cast_vote("alice", "track-1", VoteType::Up)
            .await
            .unwrap();

        let failing = FailingVoteStore {
            inner: votes.clone(),
            fail_puts: true,
            fail_deletes: false,
        };
        let service = TracksService::new(Arc::new(failing), Arc::new(tracks.clone()));

        let err = service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap_err();
        assert!(matches!(err, TracksError::Persistence(_)));
        assert!(votes.len().await <= 1);
        assert!(service.get_user_vote("alice", "track-1").await.unwrap().is_none());

        let tally = tally_of(&tracks, "track-1").await;
        assert!(tally.is_consistent());
        assert_eq!(tally.total_votes, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_changes_nothing() {
        let (votes, tracks) = stores();
        service_for(&votes, &tracks)
            .cast_vote("alice", "track-1", VoteType::Up)
            .await
            .unwrap();

        let failing = FailingVoteStore {
            inner: votes.clone(),
            fail_puts: false,
            fail_deletes: true,
        };
        let service = TracksService::new(Arc::new(failing), Arc::new(tracks.clone()));

        let err = service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap_err();
        assert!(matches!(err, TracksError::Persistence(_)));
        assert_eq!(votes.len().await, 1);
        assert_eq!(tally_of(&tracks, "track-1").await, TrackTally::from_counts(1, 0).unwrap());
    }

    #[tokio::test]
    async fn test_conflicting_write_is_retried() {
        let (votes, tracks) = stores();
        let racing = RacingTrackStore {
            inner: tracks.clone(),
            races: AtomicUsize::new(2),
        };
        let service = TracksService::new(Arc::new(votes.clone()), Arc::new(racing));

        service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap();

        // Both concurrent upvotes and ours survive
        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!(tally, TrackTally::from_counts(2, 1).unwrap());
        assert_eq!(tally.heat_score, 83);
    }

    #[tokio::test]
    async fn test_conflict_after_attempt_budget() {
        let (votes, tracks) = stores();
        let racing = RacingTrackStore {
            inner: tracks.clone(),
            races: AtomicUsize::new(usize::MAX),
        };
        let config = TracksServiceConfig::default().with_max_tally_attempts(3);
        let service = TracksService::with_config(Arc::new(votes.clone()), Arc::new(racing), config);

        let err = service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap_err();
        assert!(matches!(
            err,
            TracksError::Conflict { ref track_id, attempts: 3 } if track_id == "track-1"
        ));
        assert!(tally_of(&tracks, "track-1").await.is_consistent());
    }

    #[tokio::test]
    async fn test_tally_write_failure_is_not_retried() {
        let (votes, tracks) = stores();
        let broken = Arc::new(BrokenTrackStore {
            inner: tracks.clone(),
            tally_writes: AtomicUsize::new(0),
        });
        let service = TracksService::new(Arc::new(votes.clone()), broken.clone());

        let err = service.cast_vote("alice", "track-1", VoteType::Up).await.unwrap_err();
        assert!(matches!(
            err,
            TracksError::Persistence(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut))
        ));
        assert_eq!(broken.tally_writes.load(Ordering::SeqCst), 1);
        assert!(votes.len().await <= 1);
        assert_eq!(tally_of(&tracks, "track-1").await, TrackTally::default());
    }

    #[tokio::test]
    async fn test_retraction_write_failure_is_not_retried() {
        let (votes, tracks) = stores();
        service_for(&votes, &tracks)
            .cast_vote("alice", "track-1", VoteType::Up)
            .await
            .unwrap();

        let broken = Arc::new(BrokenTrackStore {
            inner: tracks.clone(),
            tally_writes: AtomicUsize::new(0),
        });
        let service = TracksService::new(Arc::new(votes.clone()), broken.clone());

        let err = service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap_err();
        assert!(matches!(err, TracksError::Persistence(RepositoryError::DatabaseError(_))));
        assert_eq!(broken.tally_writes.load(Ordering::SeqCst), 1);
        assert!(votes.len().await <= 1);
        assert!(votes.votes_for_track("track-1").await.iter().all(|v| v.vote_type != VoteType::Down));
    }

    #[tokio::test]
    async fn test_full_counter_fails_without_wrapping() {
        let mut track = Track::new("track-1", "Night Drive", "Vela", "artist-1");
        track.tally = TrackTally::from_counts(u64::MAX, 0).unwrap();
        let tracks = InMemoryTrackStore::with_tracks([track]);
        let votes = InMemoryVoteStore::new();
        let service = service_for(&votes, &tracks);

        let err = service.cast_vote("alice", "track-1", VoteType::Down).await.unwrap_err();
        assert!(matches!(err, TracksError::Persistence(RepositoryError::TallyOverflow(_))));

        let stored = tracks.get_track("track-1").await.unwrap().unwrap();
        assert_eq!(stored.tally.upvotes, u64::MAX);
        assert_eq!(stored.tally.downvotes, 0);
        assert_eq!(stored.version, 0);
        assert!(votes.len().await <= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_keep_exact_counts() {
        let (votes, tracks) = stores();
        let config = TracksServiceConfig::default().with_max_tally_attempts(1_000);
        let service = Arc::new(TracksService::with_config(
            Arc::new(votes.clone()),
            Arc::new(tracks.clone()),
            config,
        ));

        let mut handles = Vec::new();
        for i in 0..40 {
            let service = service.clone();
            let vote_type = if i % 4 == 0 { VoteType::Down } else { VoteType::Up };
            handles.push(tokio::spawn(async move {
                service.cast_vote(&format!("user{i}"), "track-1", vote_type).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let tally = tally_of(&tracks, "track-1").await;
        assert_eq!(tally, TrackTally::from_counts(30, 10).unwrap());
        assert_eq!(tally.heat_score, 90);
        assert_eq!(votes.len().await, 40);
    }

    #[tokio::test]
    async fn test_read_paths() {
        let tracks = InMemoryTrackStore::new();
        let mut older = Track::new("t1", "Slow Burn", "Vela", "artist-1");
        older.uploaded_at = older.uploaded_at - chrono::TimeDelta::days(1);
        tracks.insert_track(older).await;
        tracks.insert_track(Track::new("t2", "Night Drive", "Vela", "artist-1")).await;
        tracks.insert_track(Track::new("t3", "Daylight", "Nightcrawler", "artist-2")).await;
        let votes = InMemoryVoteStore::new();
        let service = service_for(&votes, &tracks);

        let by_artist = service.get_tracks_by_artist("artist-1").await.unwrap();
        assert_eq!(by_artist.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t2", "t1"]);

        let found = service.search_tracks("NIGHT").await.unwrap();
        assert_eq!(found.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t2", "t3"]);
        assert_eq!(service.search_tracks("").await.unwrap().len(), 3);

        service.cast_vote("alice", "t3", VoteType::Up).await.unwrap();
        service.cast_vote("alice", "t1", VoteType::Down).await.unwrap();
        let trending = service.get_trending_tracks(Some(2)).await.unwrap();
        assert_eq!(trending.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t3", "t2"]);
        assert_eq!(service.get_trending_tracks(None).await.unwrap().len(), 3);

        assert_eq!(service.increment_play_count("t2").await.unwrap(), 1);
        assert_eq!(service.get_track("t2").await.unwrap().unwrap().plays, 1);
        assert!(matches!(
            service.increment_play_count("missing").await.unwrap_err(),
            TracksError::TrackNotFound(_)
        ));
        assert!(service.get_track("missing").await.unwrap().is_none());
    }
}
