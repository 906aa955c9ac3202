//! Contest endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pawgram_common::{AppError, AppResult};
use pawgram_core::{CreateContestInput, Leaderboard};
use pawgram_db::entities::photo::Privacy;
use pawgram_db::entities::{contest, contest_entry};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Request to join a contest with a photo.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinContestRequest {
    pub contest_id: String,
    pub photo_id: String,
}

/// Request to compute the leaderboard.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRequest {
    #[serde(default = "default_leaderboard_limit")]
    pub limit: u64,
}

const fn default_leaderboard_limit() -> u64 {
    10
}

/// Request to deactivate a contest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateContestRequest {
    pub contest_id: String,
}

/// Result of a rotation pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationResponse {
    pub rotated: u64,
}

/// Create a contest with an explicit prompt.
async fn create_contest(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateContestInput>,
) -> AppResult<ApiResponse<contest::Model>> {
    let contest = state.contest_service.create_contest(input).await?;
    Ok(ApiResponse::ok(contest))
}

/// Ensure an active contest exists, creating one from the theme catalog
/// if necessary.
async fn ensure_active(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<contest::Model>> {
    let contest = state.contest_service.ensure_active_contest().await?;
    Ok(ApiResponse::ok(contest))
}

/// Deactivate contests whose end date has elapsed.
async fn rotate_expired(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<RotationResponse>> {
    let rotated = state.contest_service.rotate_expired_contests().await?;
    Ok(ApiResponse::ok(RotationResponse { rotated }))
}

/// List contests whose end date is still in the future.
async fn active_contests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<contest::Model>>> {
    let contests = state.contest_service.fetch_active_contests().await?;
    Ok(ApiResponse::ok(contests))
}

/// The current contest, if any.
async fn current_contest(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Option<contest::Model>>> {
    let contest = state.contest_service.fetch_current_contest().await?;
    Ok(ApiResponse::ok(contest))
}

/// Submit a photo into a contest.
///
/// The photo must belong to the submitting user and be public; the
/// lifecycle manager itself does not re-check privacy, so the precondition
/// is enforced here at the boundary.
async fn join_contest(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<JoinContestRequest>,
) -> AppResult<ApiResponse<contest_entry::Model>> {
    let photo = state.photo_repo.get_by_id(&req.photo_id).await?;

    if photo.uploaded_by != user.id {
        return Err(AppError::Forbidden(
            "You can only enter your own photos".to_string(),
        ));
    }
    if photo.privacy != Privacy::Public {
        return Err(AppError::Validation(
            "Only public photos can enter contests".to_string(),
        ));
    }

    let entry = state
        .contest_service
        .join_contest(&req.contest_id, &req.photo_id)
        .await?;
    Ok(ApiResponse::ok(entry))
}

/// Compute the leaderboard for the current contest.
async fn leaderboard(
    State(state): State<AppState>,
    Json(req): Json<LeaderboardRequest>,
) -> AppResult<ApiResponse<Leaderboard>> {
    let board = state
        .leaderboard_service
        .compute_leaderboard(req.limit)
        .await?;
    Ok(ApiResponse::ok(board))
}

/// Manually deactivate a contest.
async fn deactivate_contest(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeactivateContestRequest>,
) -> AppResult<ApiResponse<()>> {
    state.contest_service.deactivate(&req.contest_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_contest))
        .route("/ensure", post(ensure_active))
        .route("/rotate", post(rotate_expired))
        .route("/active", post(active_contests))
        .route("/current", post(current_contest))
        .route("/join", post(join_contest))
        .route("/leaderboard", post(leaderboard))
        .route("/deactivate", post(deactivate_contest))
}
