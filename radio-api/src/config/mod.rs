//! Configuration module for the radio API.
//! Reads settings from the environment and wires stores into the service.
mod dependencies;
mod seed;
mod settings;

pub use dependencies::Dependencies;
pub use seed::{SeedTrack, load_seed_tracks};
pub use settings::{ApiConfig, StorageBackend};

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Create CORS layer for the local web frontend
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"), // Vite default
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
