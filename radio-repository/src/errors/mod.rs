//! Error types for the radio repository.
//! Consolidates and re-exports error types related to vote and track store operations.
mod repository;

pub use repository::RepositoryError;
