// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use radio_service::TracksService;
use tracing::info;

use self::state::AppState;
use crate::config::create_cors_layer;
use crate::errors::ServerError;

/// Path segments under `/tracks` taken by fixed routes. A track with one of
/// these ids would be unreachable through `GET /tracks/:track_id`.
pub const RESERVED_TRACK_IDS: &[&str] = &["trending", "search"];

/// Create the Axum application router with all routes and middleware
pub fn create_app(service: Arc<TracksService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/tracks", get(handlers::list_tracks))
        .route("/tracks/trending", get(handlers::trending_tracks))
        .route("/tracks/search", get(handlers::search_tracks))
        .route("/tracks/:track_id", get(handlers::get_track))
        .route("/tracks/:track_id/plays", post(handlers::record_play))
        .route("/tracks/:track_id/votes", post(handlers::cast_vote))
        .route("/tracks/:track_id/votes/:user_id", get(handlers::get_user_vote))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Server listening on {}", addr);
    info!("- Tracks endpoint: http://{}/tracks", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
