//! In-memory vote and track stores.
//!
//! HashMap-backed implementations of the store interfaces for tests and local
//! development. Both are clone-friendly; clones share the same state.
mod track_store;
mod vote_store;

pub use track_store::InMemoryTrackStore;
pub use vote_store::InMemoryVoteStore;
