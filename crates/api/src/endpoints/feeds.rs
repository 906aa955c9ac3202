//! Feed endpoints.
//!
//! Each feed excludes the photos the requesting user has already voted
//! for; the exclusion set comes from the vote ledger at request time.

use axum::{extract::State, routing::post, Json, Router};
use pawgram_common::AppResult;
use pawgram_core::{ContestFeedItem, FriendsFeedItem, GlobalFeedItem, Leaderboard};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Request for a contest feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestFeedRequest {
    pub contest_id: String,
}

/// Friends feed for the requesting user.
async fn friends_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FriendsFeedItem>>> {
    let exclude = state.vote_service.voted_photo_ids(&user.id).await?;
    let feed = state.feed_service.build_friends_feed(&user.id, &exclude).await?;
    Ok(ApiResponse::ok(feed))
}

/// Feed of a contest's entries.
async fn contest_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ContestFeedRequest>,
) -> AppResult<ApiResponse<Vec<ContestFeedItem>>> {
    let exclude = state.vote_service.voted_photo_ids(&user.id).await?;
    let feed = state
        .feed_service
        .build_contest_feed(&user.id, &req.contest_id, &exclude)
        .await?;
    Ok(ApiResponse::ok(feed))
}

/// Global feed of public photos.
async fn global_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<GlobalFeedItem>>> {
    let exclude = state.vote_service.voted_photo_ids(&user.id).await?;
    let feed = state.feed_service.build_global_feed(&user.id, &exclude).await?;
    Ok(ApiResponse::ok(feed))
}

/// Current contest's top ten, in the shape older clients expect.
async fn legacy_leaderboard(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Leaderboard>> {
    let board = state.leaderboard_service.legacy_leaderboard_response().await?;
    Ok(ApiResponse::ok(board))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/friends", post(friends_feed))
        .route("/contest", post(contest_feed))
        .route("/global", post(global_feed))
        .route("/leaderboard", post(legacy_leaderboard))
}
