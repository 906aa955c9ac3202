//! Vote endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pawgram_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Request to toggle a vote.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleVoteRequest {
    pub photo_id: String,
}

/// New vote state after a toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleVoteResponse {
    pub voted: bool,
}

/// Toggle the requesting user's vote on a photo.
async fn toggle_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleVoteRequest>,
) -> AppResult<ApiResponse<ToggleVoteResponse>> {
    let voted = state.vote_service.toggle_vote(&user.id, &req.photo_id).await?;
    Ok(ApiResponse::ok(ToggleVoteResponse { voted }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/toggle", post(toggle_vote))
}
