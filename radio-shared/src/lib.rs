//! # Radio Shared
//! This crate defines the data structures shared across the radio heat score
//! engine: tracks and their vote tallies, user votes, track queries, and the
//! heat score formula itself.
pub mod types;
