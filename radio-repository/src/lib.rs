//! # Radio Repository
//! This crate provides the store capabilities consumed by the heat score
//! engine: a vote store holding one vote per (user, track) pair and a track
//! store holding per-track tallies. It includes the error type, the store
//! interfaces, an in-memory implementation and a PostgreSQL implementation.
//!
//! ## Testing
//!
//! The in-memory stores are covered by unit tests. The PostgreSQL stores are
//! covered by `tests/postgres_integration.rs`, whose `#[sqlx::test]` cases are
//! marked `#[ignore]` so a plain `cargo test` passes without a database. Run
//! them with `DATABASE_URL` set and `cargo test -- --ignored`.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{TrackStore, VoteStore};
pub use memory::{InMemoryTrackStore, InMemoryVoteStore};
pub use postgres::{PostgresTrackStore, PostgresVoteStore};
