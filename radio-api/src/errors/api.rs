use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use radio_service::TracksError;
use thiserror::Error;
use tracing::error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tracks(#[from] TracksError),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("No vote from {user_id} on track {track_id}")]
    VoteNotFound { user_id: String, track_id: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tracks(TracksError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::Tracks(TracksError::TrackNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Tracks(TracksError::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Tracks(TracksError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TrackNotFound(_) | ApiError::VoteNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (
            status,
            Json(serde_json::json!({
                "status": "error",
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
