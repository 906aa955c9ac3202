//! Connection endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pawgram_common::AppResult;
use pawgram_db::entities::connection;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Request to create a friend request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    pub recipient_id: String,
}

/// Request targeting an existing connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionIdRequest {
    pub connection_id: String,
}

/// Send a friend request.
async fn request_connection(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateConnectionRequest>,
) -> AppResult<ApiResponse<connection::Model>> {
    let connection = state
        .connection_service
        .request(&user.id, &req.recipient_id)
        .await?;
    Ok(ApiResponse::ok(connection))
}

/// Approve a pending friend request.
async fn approve_connection(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ConnectionIdRequest>,
) -> AppResult<ApiResponse<connection::Model>> {
    let connection = state
        .connection_service
        .approve(&req.connection_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(connection))
}

/// Reject a pending friend request.
async fn reject_connection(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ConnectionIdRequest>,
) -> AppResult<ApiResponse<connection::Model>> {
    let connection = state
        .connection_service
        .reject(&req.connection_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(connection))
}

/// Remove an approved connection.
async fn remove_connection(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ConnectionIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .connection_service
        .remove(&req.connection_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// All connection records involving the requesting user.
async fn list_connections(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<connection::Model>>> {
    let connections = state.connection_service.fetch_for_subject(&user.id).await?;
    Ok(ApiResponse::ok(connections))
}

/// Pending requests awaiting the requesting user's decision.
async fn pending_connections(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<connection::Model>>> {
    let connections = state
        .connection_service
        .fetch_pending_for_recipient(&user.id)
        .await?;
    Ok(ApiResponse::ok(connections))
}

/// Approved connections involving the requesting user.
async fn approved_connections(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<connection::Model>>> {
    let connections = state
        .connection_service
        .fetch_approved_for_subject(&user.id)
        .await?;
    Ok(ApiResponse::ok(connections))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(request_connection))
        .route("/approve", post(approve_connection))
        .route("/reject", post(reject_connection))
        .route("/remove", post(remove_connection))
        .route("/list", post(list_connections))
        .route("/pending", post(pending_connections))
        .route("/approved", post(approved_connections))
}
