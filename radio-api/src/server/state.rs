// App state for Axum server
use std::sync::Arc;

use radio_service::TracksService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TracksService>,
}
