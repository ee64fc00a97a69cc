use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use radio_shared::types::{Ballot, Vote, VoteKey};
use tokio::sync::RwLock;

use crate::{RepositoryError, VoteStore};

#[derive(Default)]
struct VoteState {
    votes: HashMap<VoteKey, Vote>,
    last_stamp: Option<DateTime<Utc>>,
}

impl VoteState {
    /// Store clock: UTC now, but always strictly after the previous stamp.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// In-memory vote store keyed by [`VoteKey`].
#[derive(Clone, Default)]
pub struct InMemoryVoteStore {
    state: Arc<RwLock<VoteState>>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of votes currently stored.
    pub async fn len(&self) -> usize {
        self.state.read().await.votes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All live votes on a track.
    pub async fn votes_for_track(&self, track_id: &str) -> Vec<Vote> {
        self.state
            .read()
            .await
            .votes
            .values()
            .filter(|vote| vote.track_id == track_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VoteStore for InMemoryVoteStore {
    async fn find_vote(&self, user_id: &str, track_id: &str) -> Result<Option<Vote>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .get(&VoteKey::new(user_id, track_id))
            .filter(|vote| vote.user_id == user_id && vote.track_id == track_id)
            .cloned())
    }

    async fn put_vote(&self, ballot: &Ballot) -> Result<Vote, RepositoryError> {
        let mut state = self.state.write().await;
        let vote = Vote {
            user_id: ballot.user_id.clone(),
            track_id: ballot.track_id.clone(),
            vote_type: ballot.vote_type,
            voted_at: state.next_stamp(),
        };
        state.votes.insert(ballot.key(), vote.clone());
        Ok(vote)
    }

    async fn delete_vote(&self, key: &VoteKey) -> Result<bool, RepositoryError> {
        Ok(self.state.write().await.votes.remove(key).is_some())
    }
}
