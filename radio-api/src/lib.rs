//! Radio API Library
//!
//! This library provides the HTTP surface of the radio heat score engine,
//! including configuration management, error handling, dependency wiring and
//! the Axum router.

pub mod config;
pub mod errors;
pub mod server;

pub use config::{ApiConfig, Dependencies};
pub use errors::{ApiError, ServerError};
