use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the direction of a vote cast by a user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic key of the single vote a user may hold on a track.
///
/// The key is `{user_id}_{track_id}`. User ids never contain `_` (the service
/// rejects them), so the first `_` always separates the two parts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoteKey(String);

impl VoteKey {
    pub fn new(user_id: &str, track_id: &str) -> Self {
        Self(format!("{}_{}", user_id, track_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vote that is about to be written.
///
/// The vote store stamps `voted_at` when it persists a ballot, turning it into
/// a [`Vote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub user_id: String,
    pub track_id: String,
    pub vote_type: VoteType,
}

impl Ballot {
    pub fn new(user_id: impl Into<String>, track_id: impl Into<String>, vote_type: VoteType) -> Self {
        Self {
            user_id: user_id.into(),
            track_id: track_id.into(),
            vote_type,
        }
    }

    pub fn key(&self) -> VoteKey {
        VoteKey::new(&self.user_id, &self.track_id)
    }
}

/// Represents a user's current vote on a track.
///
/// At most one `Vote` exists per (user, track) pair. Changing a vote replaces
/// the record stored under the same [`VoteKey`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: String,
    pub track_id: String,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    pub fn key(&self) -> VoteKey {
        VoteKey::new(&self.user_id, &self.track_id)
    }
}
