//! Error types for the tracks service.
mod tracks_error;

pub use tracks_error::TracksError;
