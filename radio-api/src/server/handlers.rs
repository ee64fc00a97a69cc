// HTTP request handlers
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use radio_shared::types::{Track, TrackQuery, Vote, VoteType};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCount {
    pub track_id: String,
    pub plays: u64,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "radio-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Tracks filtered by genre or artist, optionally ordered and limited
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Vec<Track>>, ApiError> {
    Ok(Json(state.service.get_tracks(&query).await?))
}

pub async fn trending_tracks(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<Vec<Track>>, ApiError> {
    Ok(Json(state.service.get_trending_tracks(params.limit).await?))
}

pub async fn search_tracks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Track>>, ApiError> {
    Ok(Json(state.service.search_tracks(&params.q).await?))
}

pub async fn get_track(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<Track>, ApiError> {
    let track = state.service.get_track(&track_id).await?;
    track.map(Json).ok_or(ApiError::TrackNotFound(track_id))
}

pub async fn record_play(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<PlayCount>, ApiError> {
    let plays = state.service.increment_play_count(&track_id).await?;
    Ok(Json(PlayCount { track_id, plays }))
}

/// Vote endpoint - casts or replaces the user's vote and returns it as stored
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    Json(payload): Json<CastVoteRequest>,
) -> Result<Json<Vote>, ApiError> {
    info!(
        user_id = %payload.user_id,
        track_id = %track_id,
        vote_type = %payload.vote_type,
        "Received vote"
    );

    let vote = state
        .service
        .cast_vote(&payload.user_id, &track_id, payload.vote_type)
        .await?;
    Ok(Json(vote))
}

pub async fn get_user_vote(
    State(state): State<AppState>,
    Path((track_id, user_id)): Path<(String, String)>,
) -> Result<Json<Vote>, ApiError> {
    let vote = state.service.get_user_vote(&user_id, &track_id).await?;
    vote.map(Json).ok_or(ApiError::VoteNotFound { user_id, track_id })
}
