//! # Radio Service
//!
//! This crate provides the heat score voting engine and the track read paths
//! of the radio app. [`TracksService`] enforces one vote per user per track,
//! keeps each track's tally in step with the live votes and derives the heat
//! score from it. It depends only on the store interfaces from
//! `radio-repository`, which are injected at construction.

pub mod config;
pub mod errors;
pub mod service;

pub use config::TracksServiceConfig;
pub use errors::TracksError;
pub use service::TracksService;
