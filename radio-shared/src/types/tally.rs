use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::VoteType;

/// Heat score of a track where every vote is a downvote.
pub const MIN_HEAT_SCORE: u32 = 30;
/// Heat score of a track where every vote is an upvote.
pub const MAX_HEAT_SCORE: u32 = 110;
/// Heat score of a track without votes.
pub const NEUTRAL_HEAT_SCORE: u32 = 70;

const HEAT_SCORE_SPAN: u128 = (MAX_HEAT_SCORE - MIN_HEAT_SCORE) as u128;

/// Computes the heat score of a track from its vote counts.
///
/// `round(30 + ratio * 80)` where `ratio = up / (up + down)`, or `0.5` when the
/// track has no votes. Evaluated in integer arithmetic with a single
/// round-half-up step, so the result only depends on `(upvotes, downvotes)`
/// and always lies in `[MIN_HEAT_SCORE, MAX_HEAT_SCORE]`.
pub fn heat_score(upvotes: u64, downvotes: u64) -> u32 {
    let total = upvotes as u128 + downvotes as u128;
    if total == 0 {
        return NEUTRAL_HEAT_SCORE;
    }

    let scaled = (2 * HEAT_SCORE_SPAN * upvotes as u128 + total) / (2 * total);
    MIN_HEAT_SCORE + scaled as u32
}

/// Vote counts whose total does not fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Vote counts out of range: {upvotes} up, {downvotes} down")]
pub struct TallyOverflow {
    pub upvotes: u64,
    pub downvotes: u64,
}

/// Aggregated voting state of a single track.
///
/// `total_votes` always equals `upvotes + downvotes` and `heat_score` is always
/// `heat_score(upvotes, downvotes)`; the constructors are the only way the
/// aggregator builds a tally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackTally {
    pub upvotes: u64,
    pub downvotes: u64,
    pub total_votes: u64,
    pub heat_score: u32,
}

impl Default for TrackTally {
    fn default() -> Self {
        Self {
            upvotes: 0,
            downvotes: 0,
            total_votes: 0,
            heat_score: NEUTRAL_HEAT_SCORE,
        }
    }
}

impl TrackTally {
    /// Builds a tally from its counts, deriving the total and the heat score.
    pub fn from_counts(upvotes: u64, downvotes: u64) -> Result<Self, TallyOverflow> {
        let total_votes = upvotes
            .checked_add(downvotes)
            .ok_or(TallyOverflow { upvotes, downvotes })?;

        Ok(Self {
            upvotes,
            downvotes,
            total_votes,
            heat_score: heat_score(upvotes, downvotes),
        })
    }

    /// Returns the tally with one more vote of the given type.
    pub fn record(&self, vote_type: VoteType) -> Result<Self, TallyOverflow> {
        let overflow = TallyOverflow {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        };
        match vote_type {
            VoteType::Up => Self::from_counts(self.upvotes.checked_add(1).ok_or(overflow)?, self.downvotes),
            VoteType::Down => Self::from_counts(self.upvotes, self.downvotes.checked_add(1).ok_or(overflow)?),
        }
    }

    /// Returns the tally with one vote of the given type removed.
    ///
    /// Counts never go below zero, even if the stored tally was already out
    /// of step with the live votes.
    pub fn retract(&self, vote_type: VoteType) -> Result<Self, TallyOverflow> {
        match vote_type {
            VoteType::Up => Self::from_counts(self.upvotes.saturating_sub(1), self.downvotes),
            VoteType::Down => Self::from_counts(self.upvotes, self.downvotes.saturating_sub(1)),
        }
    }

    /// Whether the derived fields agree with the counts.
    pub fn is_consistent(&self) -> bool {
        self.upvotes.checked_add(self.downvotes) == Some(self.total_votes)
            && self.heat_score == heat_score(self.upvotes, self.downvotes)
    }
}

/// Merge-style partial update of a track tally.
///
/// Only fields that are `Some` are written; `None` fields keep their stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyUpdate {
    pub upvotes: Option<u64>,
    pub downvotes: Option<u64>,
    pub total_votes: Option<u64>,
    pub heat_score: Option<u32>,
}

impl TallyUpdate {
    pub fn apply_to(&self, tally: &mut TrackTally) {
        if let Some(upvotes) = self.upvotes {
            tally.upvotes = upvotes;
        }
        if let Some(downvotes) = self.downvotes {
            tally.downvotes = downvotes;
        }
        if let Some(total_votes) = self.total_votes {
            tally.total_votes = total_votes;
        }
        if let Some(heat_score) = self.heat_score {
            tally.heat_score = heat_score;
        }
    }
}

impl From<&TrackTally> for TallyUpdate {
    fn from(tally: &TrackTally) -> Self {
        Self {
            upvotes: Some(tally.upvotes),
            downvotes: Some(tally.downvotes),
            total_votes: Some(tally.total_votes),
            heat_score: Some(tally.heat_score),
        }
    }
}
