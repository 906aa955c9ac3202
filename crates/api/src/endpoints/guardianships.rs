//! Guardianship endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pawgram_common::AppResult;
use pawgram_db::entities::guardian_request;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Request to ask for guardianship of a pet.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuardianshipRequest {
    pub pet_id: String,
}

/// Request targeting an existing guardian request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianshipIdRequest {
    pub request_id: String,
}

/// Ask to become a guardian of a pet.
async fn request_guardianship(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateGuardianshipRequest>,
) -> AppResult<ApiResponse<guardian_request::Model>> {
    let request = state
        .guardianship_service
        .request(&user.id, &req.pet_id)
        .await?;
    Ok(ApiResponse::ok(request))
}

/// Approve a pending guardian request.
async fn approve_guardianship(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GuardianshipIdRequest>,
) -> AppResult<ApiResponse<guardian_request::Model>> {
    let request = state
        .guardianship_service
        .approve(&req.request_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(request))
}

/// Reject a pending guardian request.
async fn reject_guardianship(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GuardianshipIdRequest>,
) -> AppResult<ApiResponse<guardian_request::Model>> {
    let request = state
        .guardianship_service
        .reject(&req.request_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(request))
}

/// All guardian requests sent by the requesting user.
async fn list_guardianships(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<guardian_request::Model>>> {
    let requests = state
        .guardianship_service
        .fetch_for_subject(&user.id)
        .await?;
    Ok(ApiResponse::ok(requests))
}

/// Pending guardian requests for the requesting user's pets.
async fn pending_guardianships(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<guardian_request::Model>>> {
    let requests = state
        .guardianship_service
        .fetch_pending_for_recipient(&user.id)
        .await?;
    Ok(ApiResponse::ok(requests))
}

/// Guardianships the requesting user holds.
async fn approved_guardianships(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<guardian_request::Model>>> {
    let requests = state
        .guardianship_service
        .fetch_approved_for_subject(&user.id)
        .await?;
    Ok(ApiResponse::ok(requests))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(request_guardianship))
        .route("/approve", post(approve_guardianship))
        .route("/reject", post(reject_guardianship))
        .route("/list", post(list_guardianships))
        .route("/pending", post(pending_guardianships))
        .route("/approved", post(approved_guardianships))
}
