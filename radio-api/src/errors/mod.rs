//! Error types for the radio API.
//!
//! `ServerError` covers everything that can stop the server from starting or
//! serving; `ApiError` is what a single request handler returns.
mod api;

pub use api::ApiError;

use radio_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Seed data error: {0}")]
    Seed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a seed data error.
    pub fn seed(msg: impl Into<String>) -> Self {
        Self::Seed(msg.into())
    }
}
