mod tally;
mod track;
mod track_query;
mod vote;

pub use tally::{
    MAX_HEAT_SCORE, MIN_HEAT_SCORE, NEUTRAL_HEAT_SCORE, TallyOverflow, TallyUpdate, TrackTally, heat_score,
};
pub use track::Track;
pub use track_query::{OrderDirection, TrackOrder, TrackQuery};
pub use vote::{Ballot, Vote, VoteKey, VoteType};
