//! This module defines and re-exports the store interfaces consumed by the
//! heat score engine.
//! It serves as a central point for accessing traits related to data interaction.
mod track_store;
mod vote_store;

pub use track_store::TrackStore;
pub use vote_store::VoteStore;
